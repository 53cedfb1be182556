//! Chat completion client with a ranked free-model fallback list.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lesson::prompts;
use crate::lesson::session::TutorBackend;
use crate::lesson::Message;

/// Models tried in order until one produces a usable reply.
pub const DEFAULT_MODELS: [&str; 3] = [
    "meta-llama/llama-3.3-70b-instruct:free",
    "google/gemma-3-27b-it:free",
    "mistralai/mistral-7b-instruct:free",
];

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Error)]
pub enum ChatError {
    /// The provider rejected our key. Trying other models cannot help.
    #[error("chat provider rejected the API key (status {0})")]
    Auth(u16),
    #[error("no models available")]
    NoModels,
    #[error("chat provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct ChatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    models: Vec<String>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage<'a>],
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<UpstreamError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct UpstreamError {
    #[serde(default)]
    message: String,
}

impl ChatClient {
    pub fn new(http: reqwest::Client, api_key: String, base_url: String) -> Self {
        ChatClient {
            http,
            api_key,
            base_url,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Asks each model in turn for the next reply.
    ///
    /// Auth rejections are terminal since no other model will fare better
    /// under the same key. Any other upstream failure (rejected model,
    /// malformed payload, embedded error object, empty reply) moves on to
    /// the next model; an exhausted list is [`ChatError::NoModels`].
    pub async fn complete(&self, system: &str, history: &[Message]) -> Result<String, ChatError> {
        let mut wire = Vec::with_capacity(history.len() + 1);
        wire.push(WireMessage {
            role: "system",
            content: system,
        });
        wire.extend(history.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        for model in &self.models {
            let body = ChatRequest {
                model,
                messages: &wire,
            };
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;
            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ChatError::Auth(status.as_u16()));
            }
            let text = response.text().await?;
            if !status.is_success() {
                log::warn!("model {model} rejected ({status}), trying next");
                continue;
            }
            let completion: ChatCompletion = match serde_json::from_str(&text) {
                Ok(completion) => completion,
                Err(err) => {
                    log::warn!("model {model} returned malformed JSON: {err}");
                    continue;
                }
            };
            if let Some(err) = completion.error {
                log::warn!("model {model} returned an error payload: {}", err.message);
                continue;
            }
            let content = completion
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .unwrap_or_default();
            if content.trim().is_empty() {
                log::warn!("model {model} returned an empty reply, trying next");
                continue;
            }
            log::debug!("model {model} replied with {} chars", content.len());
            return Ok(content);
        }
        Err(ChatError::NoModels)
    }
}

#[async_trait::async_trait]
impl TutorBackend for ChatClient {
    async fn reply(&self, messages: &[Message]) -> Result<String, ChatError> {
        self.complete(&prompts::tutor_system_prompt(None), messages)
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn client_for(server: &mockito::ServerGuard, models: &[&str]) -> ChatClient {
        ChatClient::new(reqwest::Client::new(), "test-key".to_string(), server.url())
            .with_models(models.iter().map(|m| m.to_string()).collect())
    }

    fn completion_body(content: &str) -> String {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
            .to_string()
    }

    #[tokio::test]
    async fn first_working_model_wins() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "model": "alpha",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello there!"))
            .create_async()
            .await;

        let client = client_for(&server, &["alpha", "beta"]);
        let reply = client
            .complete("be brief", &[Message::user("hi")])
            .await
            .unwrap();
        assert_eq!(reply, "Hello there!");
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_model_falls_through_to_the_next() {
        let mut server = mockito::Server::new_async().await;
        let rejected = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "alpha" })))
            .with_status(404)
            .with_body(r#"{"error":{"message":"No endpoints found"}}"#)
            .create_async()
            .await;
        let ok = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "beta" })))
            .with_status(200)
            .with_body(completion_body("Fallback reply"))
            .create_async()
            .await;

        let client = client_for(&server, &["alpha", "beta"]);
        let reply = client.complete("sys", &[Message::user("hi")]).await.unwrap();
        assert_eq!(reply, "Fallback reply");
        rejected.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn auth_rejection_stops_the_cascade() {
        let mut server = mockito::Server::new_async().await;
        let denied = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"invalid key"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, &["alpha", "beta"]);
        let err = client.complete("sys", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::Auth(401)));
        denied.assert_async().await;
    }

    #[tokio::test]
    async fn exhausted_list_reports_no_models() {
        let mut server = mockito::Server::new_async().await;
        let broken = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server, &["alpha", "beta"]);
        let err = client.complete("sys", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::NoModels));
        broken.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_and_empty_payloads_are_skipped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "alpha" })))
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;
        server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "beta" })))
            .with_status(200)
            .with_body(completion_body("   "))
            .create_async()
            .await;
        let real = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "gamma" })))
            .with_status(200)
            .with_body(completion_body("Real answer"))
            .create_async()
            .await;

        let client = client_for(&server, &["alpha", "beta", "gamma"]);
        let reply = client.complete("sys", &[]).await.unwrap();
        assert_eq!(reply, "Real answer");
        real.assert_async().await;
    }

    #[tokio::test]
    async fn embedded_error_object_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "alpha" })))
            .with_status(200)
            .with_body(r#"{"error":{"message":"rate limited"}}"#)
            .create_async()
            .await;
        let ok = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "beta" })))
            .with_status(200)
            .with_body(completion_body("Moving on"))
            .create_async()
            .await;

        let client = client_for(&server, &["alpha", "beta"]);
        let reply = client.complete("sys", &[]).await.unwrap();
        assert_eq!(reply, "Moving on");
        ok.assert_async().await;
    }
}
