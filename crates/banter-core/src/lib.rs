//! banter-core: Headless conversation core for the banter chat client
//!
//! This crate provides the non-terminal logic for banter, including:
//! - The append-only conversation store and message model
//! - The per-turn state machine (pending flag, generation tokens)
//! - The HTTP transport to the agent server

pub mod conversation;
pub mod transport;
pub mod turn;

// Re-export commonly used types
pub use conversation::{Conversation, Message, MessageId, Sender, DEFAULT_GREETING};
pub use transport::{
    reply_or_fallback, AgentClient, TransportError, DEFAULT_SERVER_URL, EMPTY_REPLY_FALLBACK,
    ERROR_FALLBACK,
};
pub use turn::{TurnToken, TurnTracker};
