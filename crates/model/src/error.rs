use std::error::Error;

/// The kind of error that occurred in a transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote service could not be reached.
    Connect,
    /// The exchange took longer than allowed.
    Timeout,
    /// The response body was cut off while being read.
    Interrupted,
    /// Any other errors.
    Other,
}

/// The error type for a transport.
pub trait TransportError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}
