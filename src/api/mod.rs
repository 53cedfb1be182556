//! HTTP surface: three POST routes behind permissive CORS, shared by the
//! marketing site's tutor widget, application form and deck generator.

pub mod apply;
pub mod deck;
pub mod tutor;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::ai::ChatError;
use crate::config::AppConfig;
use crate::deckgen::DeckGenError;
use crate::mail::MailError;

/// Bodies above this size are rejected before the handlers run.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct ApiState {
    pub config: AppConfig,
    pub http: reqwest::Client,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/tutor", post(tutor::handle))
        .route("/api/apply", post(apply::handle))
        .route("/api/deck", post(deck::handle))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Route failure, rendered as `{"error": "..."}` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("server configuration incomplete: set {0}")]
    Config(&'static str),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error(transparent)]
    Deck(#[from] DeckGenError),
}

fn chat_status(err: &ChatError) -> StatusCode {
    match err {
        // Forward the provider's own auth status so the frontend can tell
        // a bad key apart from an outage.
        ChatError::Auth(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ChatError::NoModels | ChatError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Chat(err) => chat_status(err),
            ApiError::Mail(_) => StatusCode::BAD_GATEWAY,
            ApiError::Deck(DeckGenError::Chat(err)) => chat_status(err),
            ApiError::Deck(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {self}");
        } else {
            log::debug!("request rejected: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
