pub mod classifier;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod slides;

use serde::{Deserialize, Serialize};

/// XP awarded for each answer the tutor confirms as correct.
pub const XP_PER_CORRECT: u32 = 25;

/// Number of tutor replies after which lesson progress reads as complete.
pub const PROGRESS_HORIZON: usize = 20;

/// Letters a quiz option line may start with.
pub fn is_option_letter(c: char) -> bool {
    matches!(c, 'A'..='F')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the tutor conversation, in the shape the chat API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
