//! Resume-to-deck generation: one strict-JSON completion, defensively parsed.

use thiserror::Error;

use crate::ai::{ChatClient, ChatError};
use crate::lesson::prompts::{deck_user_prompt, DECK_SYSTEM_PROMPT};
use crate::lesson::slides::SlideDeck;
use crate::lesson::Message;

#[derive(Debug, Error)]
pub enum DeckGenError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("model reply contained no JSON object")]
    NoJson,
    #[error("model reply was not valid deck JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model reply parsed to a deck with no slides")]
    Empty,
}

/// Asks the model for a personalised deck and parses its reply.
pub async fn generate(client: &ChatClient, resume_text: &str) -> Result<SlideDeck, DeckGenError> {
    let request = [Message::user(deck_user_prompt(resume_text))];
    let raw = client.complete(DECK_SYSTEM_PROMPT, &request).await?;
    extract_deck(&raw)
}

/// Parses a deck out of a reply that should be pure JSON. Models still wrap
/// it in prose or markdown fences now and then, so anything before the first
/// `{` and after the last `}` is dropped before parsing.
pub fn extract_deck(raw: &str) -> Result<SlideDeck, DeckGenError> {
    let start = raw.find('{').ok_or(DeckGenError::NoJson)?;
    let end = raw.rfind('}').ok_or(DeckGenError::NoJson)?;
    if end < start {
        return Err(DeckGenError::NoJson);
    }
    let deck: SlideDeck = serde_json::from_str(&raw[start..=end])?;
    if deck.slides.is_empty() {
        return Err(DeckGenError::Empty);
    }
    Ok(deck)
}
