use std::pin::Pin;

use async_trait::async_trait;
use chat_core::Message;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::GatewayError;

/// One step of a streamed assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyEvent {
    Started { message_id: String },
    Delta(String),
    Finished,
}

pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<ReplyEvent, GatewayError>> + Send>>;

/// Where generations are sent.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the full message log. The returned stream ends early once `cancel` fires.
    async fn stream_reply(
        &self,
        messages: &[Message],
        cancel: CancellationToken,
    ) -> Result<ReplyStream, GatewayError>;
}
