//! Message module - Chat messages and content parts
//!
//! Shared message types used by the relay, the reducer and the client.

mod chat_message;
mod content;

pub use chat_message::{Message, Role};
pub use content::MessagePart;
