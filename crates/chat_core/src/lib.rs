//! chat_core - Core types shared by the transcript assistant crates
//!
//! This crate provides the foundational types used across the workspace:
//! - `message` - Chat messages and their typed content parts
//! - `library` - Prompt templates and transcripts
//! - `ui_stream` - Chunks of the streamed UI message protocol
//! - `config` - Provider and server configuration

pub mod config;
pub mod library;
pub mod message;
pub mod paths;
pub mod ui_stream;

// Re-export commonly used types
pub use config::Config;
pub use library::{Prompt, Transcript, TRANSCRIPT_PLACEHOLDER};
pub use message::{Message, MessagePart, Role};
pub use ui_stream::{UiStreamChunk, UI_STREAM_DONE, UI_STREAM_HEADER};
