//! The conversation core: validating questions, keeping the transcript,
//! and streaming answers into it.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod answer_client;
mod decoder;
mod error;
mod session;
pub mod transcript;
mod validation;

pub use answer_client::AnswerClient;
pub use error::{SessionClosedError, StreamError};
pub use session::{Session, SessionBuilder, SessionSnapshot, SessionStrings};
pub use validation::{MIN_QUESTION_TOKENS, ValidationError, validate};
