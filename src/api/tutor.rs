use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::ai::ChatClient;
use crate::api::{ApiError, ApiState};
use crate::lesson::prompts;
use crate::lesson::Message;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub adaptive_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TutorResponse {
    pub message: String,
}

/// Forwards a quiz transcript to the model cascade and returns the reply.
pub async fn handle(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<TutorRequest>, JsonRejection>,
) -> Result<Json<TutorResponse>, ApiError> {
    let Json(request) = payload.map_err(|err| ApiError::Validation(err.body_text()))?;
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
    let system = prompts::tutor_system_prompt(request.adaptive_context.as_deref());
    let message = client.complete(&system, &request.messages).await?;
    Ok(Json(TutorResponse { message }))
}
