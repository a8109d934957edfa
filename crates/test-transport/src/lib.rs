//! A local scripted transport for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use bytes::Bytes;
use qanouni_model::{
    ErrorKind, QuestionRequest, ResponseBody, Transport, TransportError,
    TransportResponse,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl StdError for Error {}

impl TransportError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct ScriptedBody {
    slices: VecDeque<Bytes>,
    ending: PresetEnding,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
    finished: bool,
}

impl ResponseBody for ScriptedBody {
    type Error = crate::Error;

    fn poll_next_slice(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<Bytes>, Self::Error>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(Ok(None));
        }

        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            if let Some(slice) = this.slices.pop_front() {
                return Poll::Ready(Ok(Some(slice)));
            }
            this.finished = true;
            return Poll::Ready(match this.ending {
                PresetEnding::Close => Ok(None),
                PresetEnding::Interrupted => Err(Error {
                    message: "connection reset by peer",
                    kind: ErrorKind::Interrupted,
                }),
            });
        }
        this.sleep = Some(Box::pin(sleep(this.delay)));
        Pin::new(this).poll_next_slice(cx)
    }
}

/// A local scripted transport for testing purpose.
///
/// Each question consumes the next preset response in the order they were
/// added. If there are no presets left, sending fails. Questions are
/// recorded so that tests can check what would have gone on the wire.
///
/// Clones share the same script and records.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<PresetResponse>>>,
    requests: Arc<Mutex<Vec<QuestionRequest>>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    #[inline]
    pub fn add_response(&self, preset: PresetResponse) {
        self.script.lock().unwrap().push_back(preset);
    }

    /// Sets the delay before each body read.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the questions received so far.
    #[inline]
    pub fn requests(&self) -> Vec<QuestionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Debug for ScriptedTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("remaining", &self.script.lock().unwrap().len())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Transport for ScriptedTransport {
    type Error = crate::Error;
    type Body = ScriptedBody;

    fn send_question(
        &self,
        req: &QuestionRequest,
    ) -> impl Future<Output = Result<TransportResponse<Self::Body>, Self::Error>>
    + Send
    + 'static {
        self.requests.lock().unwrap().push(req.clone());

        let result = match self.script.lock().unwrap().pop_front() {
            None => Err(Error {
                message: "no preset response left",
                kind: ErrorKind::Other,
            }),
            Some(PresetResponse { status: None, .. }) => Err(Error {
                message: "connection refused",
                kind: ErrorKind::Connect,
            }),
            Some(PresetResponse {
                status: Some(status),
                slices,
                ending,
            }) => Ok(TransportResponse {
                status,
                body: ScriptedBody {
                    slices: slices.into_iter().map(Bytes::from).collect(),
                    ending,
                    delay: self.delay.unwrap_or(Duration::from_millis(1)),
                    sleep: None,
                    finished: false,
                },
            }),
        };
        ready(result)
    }
}
