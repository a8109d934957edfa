use std::error::Error;
use std::fmt;

use qanouni_model::{ErrorKind, TransportError};

/// Why an answer stream did not complete.
#[derive(Debug)]
pub enum StreamError {
    /// The service answered with a non-success status.
    Rejected {
        /// The status code.
        status: u16,
        /// The full error body, as text.
        body: String,
    },
    /// The exchange failed before or while the answer was streaming.
    Transport(Box<dyn TransportError>),
}

impl StreamError {
    /// Returns the transport error kind, if the transport failed.
    #[inline]
    pub fn transport_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Rejected { .. } => None,
            Self::Transport(err) => Some(err.kind()),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, body } => {
                write!(f, "Status {status}: {body}")
            }
            Self::Transport(err) => write!(f, "transport failure: {err}"),
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected { .. } => None,
            Self::Transport(err) => Some(&**err),
        }
    }
}

/// A type of error which can be returned whenever commands are sent to
/// a session whose task has died.
///
/// A live [`Session`](crate::Session) handle keeps its task running, so
/// this only happens after the task panicked, e.g. in a user callback.
pub struct SessionClosedError;

impl fmt::Debug for SessionClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClosedError").finish()
    }
}

impl fmt::Display for SessionClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the session task has died".fmt(f)
    }
}

impl Error for SessionClosedError {}
