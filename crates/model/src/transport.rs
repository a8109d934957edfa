use std::pin::Pin;
use std::task::{self, Poll};

use bytes::Bytes;

use crate::error::TransportError;
use crate::request::QuestionRequest;

/// A type that carries questions to the answering service.
///
/// Once created, a transport should behave like a stateless object.
/// Every call to [`Transport::send_question`] is an independent exchange.
pub trait Transport: Send + Sync {
    /// The error type that may be returned by the transport.
    type Error: TransportError;

    /// The body type of the responses.
    type Body: ResponseBody<Error = Self::Error>;

    /// Sends a question and resolves once the response head has arrived.
    ///
    /// A non-success status is not an error at this level, the response
    /// is returned as is so that the caller can read the error body.
    fn send_question(
        &self,
        req: &QuestionRequest,
    ) -> impl Future<Output = Result<TransportResponse<Self::Body>, Self::Error>>
    + Send
    + 'static;
}

/// The response head plus a body that has not been read yet.
#[derive(Debug)]
pub struct TransportResponse<B> {
    /// The status code, using HTTP semantics.
    pub status: u16,
    /// The response body.
    pub body: B,
}

impl<B> TransportResponse<B> {
    /// Returns `true` if the status is in the `2xx` range.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The body of a response, read as a sequence of byte slices.
pub trait ResponseBody: Sized + Send + 'static {
    /// The error type that may be returned while reading.
    type Error: TransportError;

    /// Attempts to pull out the next slice of the body.
    ///
    /// # Return value
    ///
    /// - `Poll::Pending` means that the next slice has not arrived yet.
    ///   Implementations will ensure that the current task will be
    ///   notified when it may be ready.
    /// - `Poll::Ready(Ok(Some(bytes)))` means a slice is available. Slice
    ///   boundaries are arbitrary, they may even split a character.
    /// - `Poll::Ready(Ok(None))` means the remote side closed the body.
    /// - `Poll::Ready(Err(error))` means the body could not be read.
    ///
    /// Calling this method after completion should always return `None`.
    fn poll_next_slice(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<Bytes>, Self::Error>>;
}
