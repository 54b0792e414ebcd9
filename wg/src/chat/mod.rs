//! Trip assistant chat

mod message;
mod session;

pub use message::{ChatMessage, MessageId};
pub use session::{ChatSession, FALLBACK_REPLY, SUGGESTED_QUESTIONS, SendOutcome, greeting};
