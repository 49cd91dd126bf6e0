use actix_web::{get, web, HttpResponse};

use crate::error::AppError;
use crate::server::AppState;

#[get("/transcripts")]
pub async fn list_transcripts(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let transcripts = app_state.library.list_transcripts().await.map_err(|e| {
        log::error!("Error fetching transcripts: {}", e);
        AppError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(transcripts))
}

#[get("/prompts")]
pub async fn list_prompts(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let prompts = app_state.library.list_prompts().await.map_err(|e| {
        log::error!("Error fetching prompts: {}", e);
        AppError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(prompts))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_transcripts).service(list_prompts);
}
