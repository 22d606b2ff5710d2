//! Transcript-related types.

use std::slice;

use little_chat_model::{ModelMessage, ModelRequest, Role};

/// A message stored in the transcript.
///
/// Messages are immutable: once created, neither the role nor the content
/// can change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Creates a message.
    #[inline]
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns who wrote this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl From<&Message> for ModelMessage {
    #[inline]
    fn from(msg: &Message) -> Self {
        ModelMessage {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// The ordered history of one chat session, oldest first.
///
/// Only the owning session appends to it. Entries are never edited or
/// removed individually.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Returns all messages in chronological order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns an iterator over the messages.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if nothing has been exchanged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the most recent message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(crate) fn push(&mut self, message: Message) -> &Message {
        let idx = self.messages.len();
        self.messages.push(message);
        &self.messages[idx]
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }

    /// Builds a request replaying the whole history.
    pub(crate) fn to_request(&self) -> ModelRequest {
        ModelRequest {
            messages: self.messages.iter().map(ModelMessage::from).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
