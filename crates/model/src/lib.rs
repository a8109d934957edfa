//! The boundary between the conversation core and the answering service.
//!
//! This crate only describes the exchange: a question goes out as a
//! [`QuestionRequest`], and a [`TransportResponse`] comes back with a
//! status code and a body that is read slice by slice. How the bytes
//! actually travel is up to the implementors, e.g. an HTTP client or a
//! scripted fake used in tests.
//!
//! Types in this crate don't interpret the body. Decoding slices into
//! text and applying them to a conversation is done by the callers.

#![deny(missing_docs)]

mod error;
mod request;
mod transport;

pub use error::*;
pub use request::*;
pub use transport::*;
