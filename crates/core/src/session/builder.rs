use qanouni_model::Transport;
use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use super::state::{SessionState, run_session};
use super::{Session, SessionSnapshot, SessionStrings};
use crate::answer_client::AnswerClient;

/// [`Session`] builder.
pub struct SessionBuilder {
    client: AnswerClient,
    strings: SessionStrings,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    on_chunk: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl SessionBuilder {
    /// Creates a new builder that asks questions through `transport`.
    #[inline]
    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        Self {
            client: AnswerClient::new(transport),
            strings: SessionStrings::default(),
            on_idle: None,
            on_chunk: None,
        }
    }

    /// Sets the user-facing texts.
    #[inline]
    pub fn with_strings(mut self, strings: SessionStrings) -> Self {
        self.strings = strings;
        self
    }

    /// Attaches a callback to be invoked when the session settles after
    /// a submission, i.e. it was refused or its answer ended.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Attaches a callback to be invoked with every chunk applied to the
    /// transcript.
    #[inline]
    pub fn on_chunk(
        mut self,
        on_chunk: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_chunk = Some(Box::new(on_chunk));
        self
    }

    /// Builds the session and spawns its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn build(self) -> Session {
        let Self {
            client,
            strings,
            on_idle,
            on_chunk,
        } = self;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) =
            watch::channel(SessionSnapshot::default());
        let state = SessionState::new(
            client,
            strings,
            snapshot_tx,
            on_idle,
            on_chunk,
        );
        tokio::spawn(
            run_session(state, command_rx).instrument(trace_span!("session")),
        );

        Session {
            commands: command_tx,
            snapshot: snapshot_rx,
        }
    }
}
