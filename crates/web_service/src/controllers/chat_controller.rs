use std::time::Duration;

use actix_web::{post, web, HttpRequest, HttpResponse};
use chat_core::{Message, UI_STREAM_HEADER};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AppError;
use crate::middleware::extract_trace_id;
use crate::server::AppState;
use crate::services::{spawn_ui_stream, ResponseBudget};

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    messages: Option<Vec<Message>>,
}

/// Relay the message log to the model and stream the reply.
///
/// The credential is checked before the body is parsed.
#[post("/chat")]
pub async fn chat(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let budget = ResponseBudget::start(Duration::from_secs(app_state.config.max_duration_secs));
    let trace_id = extract_trace_id(&req).unwrap_or_default();

    let Some(provider) = app_state.provider.clone() else {
        log::error!("[{}] OPENAI_API_KEY is not configured", trace_id);
        return Err(AppError::MissingCredential);
    };

    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("[{}] Invalid chat request body: {}", trace_id, e);
        AppError::GenerationFailed(e.to_string())
    })?;

    let messages = request.messages.unwrap_or_default();
    if messages.is_empty() {
        return Err(AppError::MessagesRequired);
    }

    log::info!(
        "[{}] Relaying {} message(s) to model {}",
        trace_id,
        messages.len(),
        provider.default_model()
    );

    // The budget also bounds the wait for the upstream to answer.
    let stream = tokio::time::timeout_at(budget.deadline(), provider.chat_stream(&messages, None))
        .await
        .map_err(|_| {
            log::error!("[{}] {}", trace_id, budget.exceeded_message());
            AppError::GenerationFailed(budget.exceeded_message())
        })?
        .map_err(|e| {
            log::error!("[{}] Chat API error: {}", trace_id, e);
            AppError::GenerationFailed(e.to_string())
        })?;

    let frames = ReceiverStream::new(spawn_ui_stream(stream, budget)).map(Ok::<_, AppError>);

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(UI_STREAM_HEADER)
        .insert_header(("cache-control", "no-cache"))
        .streaming(frames))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(chat);
}
