mod builder;
mod state;
mod strings;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::error::SessionClosedError;
use crate::transcript::Message;
use crate::validation::validate;
pub use builder::SessionBuilder;
use state::Command;
pub use strings::SessionStrings;

/// Everything a renderer needs to draw the conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// All messages in display order.
    pub transcript: Arc<[Arc<Message>]>,
    /// The input that has not been submitted yet.
    pub draft: String,
    /// Whether an answer is streaming right now.
    pub is_streaming: bool,
    /// The last validation or transport failure, for display.
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// Returns `true` if submitting now would start a new answer.
    ///
    /// Renderers should use this to enable their submit control, so that
    /// it agrees with what [`Session::submit`] accepts.
    #[inline]
    pub fn can_submit(&self) -> bool {
        !self.is_streaming && validate(&self.draft).is_ok()
    }
}

/// A conversation with the answering service.
///
/// The transcript and the session state are owned by a single task, and
/// all methods here only send commands to it. Commands are handled in
/// the order they were sent, and every handled command publishes a new
/// [`SessionSnapshot`] to the subscribers.
///
/// Only one answer streams at a time. Submitting while an answer is
/// streaming is ignored and the draft is kept.
#[derive(Clone)]
pub struct Session {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<SessionSnapshot>,
}

impl Session {
    /// Replaces the draft. This also clears the displayed error.
    #[inline]
    pub fn set_draft<S: Into<String>>(
        &self,
        draft: S,
    ) -> Result<(), SessionClosedError> {
        self.send(Command::SetDraft(draft.into()))
    }

    /// Submits the current draft.
    #[inline]
    pub fn submit(&self) -> Result<(), SessionClosedError> {
        self.send(Command::Submit(self.commands.clone()))
    }

    /// Replaces the draft with `question` and submits it.
    pub fn ask<S: Into<String>>(
        &self,
        question: S,
    ) -> Result<(), SessionClosedError> {
        self.set_draft(question)?;
        self.submit()
    }

    /// Returns a receiver that is updated after every state change.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Returns the latest published state.
    #[inline]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    #[inline]
    fn send(&self, command: Command) -> Result<(), SessionClosedError> {
        self.commands.send(command).map_err(|_| SessionClosedError)
    }
}
