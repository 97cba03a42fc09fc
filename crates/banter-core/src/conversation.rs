//! In-memory conversation store.
//!
//! Holds the ordered message transcript for one chat session. The store is
//! append-only for the lifetime of the widget: no deletion, no edits, no
//! persistence across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting shown before any user interaction.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm a to-do agent. Talk with me to manage your tasks.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person at the keyboard.
    User,
    /// Reply from the agent server (or a local fallback standing in for one).
    Bot,
}

/// Identifier for a message within one conversation.
///
/// Minted from a monotonic counter rather than wall-clock time, so two
/// messages created in the same instant can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Raw counter value, usable as a list key.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A single entry in the transcript. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique, insertion-ordered identifier.
    pub id: MessageId,
    /// Message content.
    pub text: String,
    /// Message author.
    pub sender: Sender,
    /// When the message was minted.
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only sequence of messages.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a conversation seeded with a single greeting bot message.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push_bot(greeting);
        conversation
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user message, returning its id.
    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        self.push(text, Sender::User)
    }

    /// Append a bot message, returning its id.
    pub fn push_bot(&mut self, text: impl Into<String>) -> MessageId {
        self.push(text, Sender::Bot)
    }

    fn push(&mut self, text: impl Into<String>, sender: Sender) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        });
        id
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}
