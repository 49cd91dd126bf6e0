use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use transcript_store::StoreError;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("OpenAI API key is not configured. Please add OPENAI_API_KEY to your .env.local file.")]
    MissingCredential,

    #[error("Messages are required")]
    MessagesRequired,

    #[error("Failed to generate response: {0}")]
    GenerationFailed(String),

    #[error("Failed to load library: {0}")]
    Library(#[from] StoreError),
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MessagesRequired => StatusCode::BAD_REQUEST,
            AppError::MissingCredential
            | AppError::GenerationFailed(_)
            | AppError::Library(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(JsonError {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn error_body_carries_message() {
        let response = AppError::MessagesRequired.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Messages are required"}"#);
    }

    #[test]
    fn generation_failure_prefixes_detail() {
        let err = AppError::GenerationFailed("upstream down".to_string());
        assert_eq!(err.to_string(), "Failed to generate response: upstream down");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
