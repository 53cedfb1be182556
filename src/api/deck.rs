use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::ai::ChatClient;
use crate::api::{ApiError, ApiState};
use crate::deckgen;
use crate::lesson::slides::SlideDeck;

/// Anything shorter carries too little signal to personalise a deck.
pub const MIN_RESUME_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRequest {
    #[serde(default)]
    pub resume_text: String,
}

/// Builds a personalised preview deck from pasted resume text.
pub async fn handle(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<DeckRequest>, JsonRejection>,
) -> Result<Json<SlideDeck>, ApiError> {
    let Json(request) = payload.map_err(|err| ApiError::Validation(err.body_text()))?;
    if request.resume_text.chars().count() < MIN_RESUME_CHARS {
        return Err(ApiError::Validation(format!(
            "resumeText must be at least {MIN_RESUME_CHARS} characters"
        )));
    }
    let api_key = state
        .config
        .openrouter_api_key
        .clone()
        .ok_or(ApiError::Config("OPENROUTER_API_KEY"))?;
    let client = ChatClient::new(
        state.http.clone(),
        api_key,
        state.config.openrouter_base_url.clone(),
    );
    let deck = deckgen::generate(&client, &request.resume_text).await?;
    Ok(Json(deck))
}
