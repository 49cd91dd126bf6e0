//! Provider stream to UI message stream frames.
//!
//! Frame order: `start`, `start-step`, then for the text `text-start`,
//! `text-delta`... `text-end`, then `finish-step`, `finish`. A failure or the
//! deadline replaces the closing frames with a single `error` frame. The
//! `[DONE]` marker always comes last.

use std::time::Duration;

use bytes::Bytes;
use chat_core::UiStreamChunk;
use futures_util::StreamExt;
use llm_gateway::{LLMChunk, LLMError, LLMStream};
use tokio::sync::mpsc;
use tokio::time::Instant;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 32;

/// Deadline for one response, from request entry to the last frame.
#[derive(Debug, Clone, Copy)]
pub struct ResponseBudget {
    deadline: Instant,
    max_duration: Duration,
}

impl ResponseBudget {
    pub fn start(max_duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + max_duration,
            max_duration,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    pub fn exceeded_message(&self) -> String {
        format!(
            "Response exceeded the maximum duration of {} seconds",
            self.max_duration.as_secs()
        )
    }
}

/// Outcome of pumping the provider stream.
enum PumpError {
    Upstream(LLMError),
    Disconnected,
}

struct UiStreamWriter {
    tx: mpsc::Sender<Bytes>,
    text_id: String,
    text_open: bool,
}

impl UiStreamWriter {
    async fn send(&self, chunk: UiStreamChunk) -> Result<(), PumpError> {
        self.tx
            .send(Bytes::from(chunk.to_sse_frame()))
            .await
            .map_err(|_| PumpError::Disconnected)
    }

    async fn delta(&mut self, delta: String) -> Result<(), PumpError> {
        if !self.text_open {
            self.send(UiStreamChunk::TextStart {
                id: self.text_id.clone(),
            })
            .await?;
            self.text_open = true;
        }
        self.send(UiStreamChunk::TextDelta {
            id: self.text_id.clone(),
            delta,
        })
        .await
    }

    async fn pump(&mut self, stream: &mut LLMStream) -> Result<(), PumpError> {
        while let Some(item) = stream.next().await {
            match item.map_err(PumpError::Upstream)? {
                LLMChunk::Token(token) => self.delta(token).await?,
                LLMChunk::Done => break,
            }
        }
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), PumpError> {
        if self.text_open {
            self.send(UiStreamChunk::TextEnd {
                id: self.text_id.clone(),
            })
            .await?;
            self.text_open = false;
        }
        self.send(UiStreamChunk::FinishStep).await?;
        self.send(UiStreamChunk::Finish).await
    }
}

/// Spawn a task that converts `stream` into SSE frames.
///
/// The task stops early when the receiver is dropped or the budget runs out.
pub fn spawn_ui_stream(mut stream: LLMStream, budget: ResponseBudget) -> mpsc::Receiver<Bytes> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let message_id = format!("msg-{}", Uuid::new_v4().simple());

    tokio::spawn(async move {
        let mut writer = UiStreamWriter {
            tx,
            text_id: "text-0".to_string(),
            text_open: false,
        };

        let opened = async {
            writer
                .send(UiStreamChunk::Start {
                    message_id: Some(message_id.clone()),
                })
                .await?;
            writer.send(UiStreamChunk::StartStep).await
        }
        .await;
        if opened.is_err() {
            return;
        }

        let outcome = match tokio::time::timeout_at(budget.deadline(), writer.pump(&mut stream)).await {
            Ok(Ok(())) => writer.finish().await,
            Ok(Err(PumpError::Upstream(e))) => {
                tracing::error!(message_id = %message_id, error = %e, "Upstream stream failed");
                writer
                    .send(UiStreamChunk::Error {
                        error_text: e.to_string(),
                    })
                    .await
            }
            Ok(Err(PumpError::Disconnected)) => Err(PumpError::Disconnected),
            Err(_) => {
                tracing::warn!(
                    message_id = %message_id,
                    max_duration_secs = budget.max_duration().as_secs(),
                    "Response exceeded the maximum duration"
                );
                writer
                    .send(UiStreamChunk::Error {
                        error_text: budget.exceeded_message(),
                    })
                    .await
            }
        };

        match outcome {
            Ok(()) => {
                let _ = writer.tx.send(Bytes::from(UiStreamChunk::done_frame())).await;
                tracing::debug!(message_id = %message_id, "UI stream completed");
            }
            Err(_) => tracing::info!(message_id = %message_id, "Client disconnected, dropping stream"),
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    async fn collect_frames(rx: mpsc::Receiver<Bytes>) -> Vec<String> {
        tokio_stream::wrappers::ReceiverStream::new(rx)
            .map(|b| String::from_utf8_lossy(&b).to_string())
            .collect()
            .await
    }

    fn frame_type(frame: &str) -> String {
        let data = frame.trim().strip_prefix("data: ").unwrap_or_default();
        if data == "[DONE]" {
            return data.to_string();
        }
        let value: serde_json::Value = serde_json::from_str(data).unwrap();
        value["type"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn emits_frames_in_protocol_order() {
        let upstream: LLMStream = Box::pin(stream::iter(vec![
            Ok::<_, LLMError>(LLMChunk::Token("Hel".to_string())),
            Ok(LLMChunk::Token("lo".to_string())),
            Ok(LLMChunk::Done),
        ]));

        let frames = collect_frames(spawn_ui_stream(upstream, ResponseBudget::start(Duration::from_secs(5)))).await;
        let types: Vec<_> = frames.iter().map(|f| frame_type(f)).collect();

        assert_eq!(
            types,
            vec![
                "start",
                "start-step",
                "text-start",
                "text-delta",
                "text-delta",
                "text-end",
                "finish-step",
                "finish",
                "[DONE]"
            ]
        );
        assert!(frames[3].contains(r#""delta":"Hel""#));
    }

    #[tokio::test]
    async fn empty_reply_has_no_text_block() {
        let upstream: LLMStream = Box::pin(stream::iter(vec![Ok::<_, LLMError>(LLMChunk::Done)]));

        let frames = collect_frames(spawn_ui_stream(upstream, ResponseBudget::start(Duration::from_secs(5)))).await;
        let types: Vec<_> = frames.iter().map(|f| frame_type(f)).collect();

        assert_eq!(types, vec!["start", "start-step", "finish-step", "finish", "[DONE]"]);
    }

    #[tokio::test]
    async fn upstream_error_becomes_error_frame() {
        let upstream: LLMStream = Box::pin(stream::iter(vec![
            Ok(LLMChunk::Token("partial".to_string())),
            Err(LLMError::Stream("connection reset".to_string())),
        ]));

        let frames = collect_frames(spawn_ui_stream(upstream, ResponseBudget::start(Duration::from_secs(5)))).await;
        let types: Vec<_> = frames.iter().map(|f| frame_type(f)).collect();

        assert_eq!(
            types,
            vec!["start", "start-step", "text-start", "text-delta", "error", "[DONE]"]
        );
        assert!(frames[4].contains("connection reset"));
    }

    #[tokio::test]
    async fn deadline_ends_stalled_stream() {
        let upstream: LLMStream = Box::pin(
            stream::iter(vec![Ok::<_, LLMError>(LLMChunk::Token("slow".to_string()))]).chain(stream::pending()),
        );

        let frames = collect_frames(spawn_ui_stream(upstream, ResponseBudget::start(Duration::from_millis(50)))).await;
        let types: Vec<_> = frames.iter().map(|f| frame_type(f)).collect();

        assert_eq!(
            types,
            vec!["start", "start-step", "text-start", "text-delta", "error", "[DONE]"]
        );
        assert!(frames[4].contains("maximum duration"));
    }
}
