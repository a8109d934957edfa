//! The ordered list of messages shown to the user.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The person asking.
    User,
    /// The answering service.
    Assistant,
}

/// A message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub(crate) origin: Origin,
    pub(crate) body: String,
}

impl Message {
    /// Returns who wrote this message.
    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns the text of this message.
    ///
    /// For the newest assistant message this may still be growing while
    /// its answer is streaming.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Identifies a message in a [`Transcript`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(usize);

impl MessageId {
    /// Returns the position of the message in the transcript.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A refused transcript mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranscriptError {
    /// No message has this id.
    UnknownMessage(MessageId),
    /// The message was written by the user.
    NotAssistant(MessageId),
    /// The message is not the newest one anymore.
    NotNewest(MessageId),
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMessage(id) => {
                write!(f, "no message at index {}", id.0)
            }
            Self::NotAssistant(id) => {
                write!(f, "message at index {} is not an assistant one", id.0)
            }
            Self::NotNewest(id) => {
                write!(f, "message at index {} is not the newest", id.0)
            }
        }
    }
}

impl Error for TranscriptError {}

/// An append-only conversation.
///
/// Insertion order is display order. The only mutation allowed on an
/// existing message is appending text to the newest assistant message.
///
/// Messages are shared with the snapshots taken from the transcript, so
/// taking a snapshot never copies message bodies. Appending to a message
/// that a snapshot still holds copies that one message only.
#[derive(Clone, Default, Debug)]
pub struct Transcript {
    messages: Vec<Arc<Message>>,
}

impl Transcript {
    /// Appends a user message.
    pub fn append_user<S: Into<String>>(&mut self, text: S) -> MessageId {
        self.push(Origin::User, text.into())
    }

    /// Appends an empty assistant message to be filled by a stream.
    pub fn append_assistant_placeholder(&mut self) -> MessageId {
        self.push(Origin::Assistant, String::new())
    }

    /// Appends `chunk` to the body of the assistant message `id`.
    ///
    /// Fails without any change if `id` is not the newest message or
    /// not an assistant message.
    pub fn append_to_assistant(
        &mut self,
        id: MessageId,
        chunk: &str,
    ) -> Result<(), TranscriptError> {
        let newest = self.messages.len().checked_sub(1);
        let Some(message) = self.messages.get_mut(id.0) else {
            return Err(TranscriptError::UnknownMessage(id));
        };
        if message.origin != Origin::Assistant {
            return Err(TranscriptError::NotAssistant(id));
        }
        if newest != Some(id.0) {
            return Err(TranscriptError::NotNewest(id));
        }
        Arc::make_mut(message).body.push_str(chunk);
        Ok(())
    }

    /// Returns all messages in order, as they are right now.
    #[inline]
    pub fn snapshot(&self) -> Arc<[Arc<Message>]> {
        self.messages.iter().cloned().collect()
    }

    /// Returns the messages without taking a snapshot.
    #[inline]
    pub fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if nothing was asked yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, origin: Origin, body: String) -> MessageId {
        let id = MessageId(self.messages.len());
        self.messages.push(Arc::new(Message { origin, body }));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order() {
        let mut transcript = Transcript::default();
        let user = transcript.append_user("ما هي حقوقي");
        let assistant = transcript.append_assistant_placeholder();
        assert_eq!(user.index(), 0);
        assert_eq!(assistant.index(), 1);

        transcript.append_to_assistant(assistant, "الإ").unwrap();
        transcript.append_to_assistant(assistant, "جابة").unwrap();

        let messages = transcript.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].origin(), Origin::User);
        assert_eq!(messages[0].body(), "ما هي حقوقي");
        assert_eq!(messages[1].origin(), Origin::Assistant);
        assert_eq!(messages[1].body(), "الإجابة");
    }

    #[test]
    fn test_tail_only() {
        let mut transcript = Transcript::default();
        let user = transcript.append_user("first question here");
        let old = transcript.append_assistant_placeholder();
        transcript.append_user("second question here");
        let new = transcript.append_assistant_placeholder();

        assert_eq!(
            transcript.append_to_assistant(user, "x"),
            Err(TranscriptError::NotAssistant(user))
        );
        assert_eq!(
            transcript.append_to_assistant(old, "x"),
            Err(TranscriptError::NotNewest(old))
        );
        let missing = MessageId(10);
        assert_eq!(
            transcript.append_to_assistant(missing, "x"),
            Err(TranscriptError::UnknownMessage(missing))
        );
        transcript.append_to_assistant(new, "ok").unwrap();

        let bodies: Vec<_> =
            transcript.messages().iter().map(|m| m.body()).collect();
        assert_eq!(
            bodies,
            ["first question here", "", "second question here", "ok"]
        );
    }

    #[test]
    fn test_snapshot_idempotent() {
        let mut transcript = Transcript::default();
        assert!(transcript.is_empty());
        transcript.append_user("ما هي حقوقي");
        let id = transcript.append_assistant_placeholder();
        transcript.append_to_assistant(id, "طبقًا").unwrap();

        assert_eq!(transcript.snapshot(), transcript.snapshot());

        let before = transcript.snapshot();
        transcript.append_to_assistant(id, " للمادة").unwrap();
        let after = transcript.snapshot();
        assert_ne!(before, after);
        assert_eq!(before[1].body(), "طبقًا");
        assert_eq!(after[1].body(), "طبقًا للمادة");
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_snapshot_shares_finished_messages() {
        let mut transcript = Transcript::default();
        transcript.append_user("ما هي حقوقي");
        let id = transcript.append_assistant_placeholder();

        let before = transcript.snapshot();
        transcript.append_to_assistant(id, "الإجابة").unwrap();
        let after = transcript.snapshot();

        // The question is shared, only the growing answer was copied.
        assert!(Arc::ptr_eq(&before[0], &after[0]));
        assert!(!Arc::ptr_eq(&before[1], &after[1]));
        assert!(Arc::ptr_eq(&after[1], &transcript.messages()[1]));
    }

    #[test]
    fn test_serialize() {
        let mut transcript = Transcript::default();
        transcript.append_user("ما هي حقوقي");
        transcript.append_assistant_placeholder();
        let messages: Vec<&Message> =
            transcript.messages().iter().map(|m| m.as_ref()).collect();
        let json = serde_json::to_string(&messages).unwrap();
        assert_eq!(
            json,
            r#"[{"origin":"user","body":"ما هي حقوقي"},{"origin":"assistant","body":""}]"#
        );
    }
}
