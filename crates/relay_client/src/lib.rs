//! relay_client - Talks to the completion relay and drives the assistant
//!
//! [`RelayClient`] posts the message log to `/api/chat` and decodes the UI
//! message stream. [`AssistantController`] feeds user actions and reply
//! events through the reducer and carries out the effects it returns.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod relay;

pub use controller::AssistantController;
pub use error::GatewayError;
pub use gateway::{CompletionGateway, ReplyEvent, ReplyStream};
pub use relay::RelayClient;
