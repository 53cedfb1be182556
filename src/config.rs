//! Environment-driven configuration, read once at startup.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub resend_api_key: Option<String>,
    pub resend_base_url: String,
    pub apply_to_email: Option<String>,
    pub apply_from_email: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Reads every setting from the environment. A missing key is not an
    /// error at load time; each route checks for what it needs when hit.
    pub fn from_env() -> Self {
        AppConfig {
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            openrouter_base_url: non_empty_var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| crate::ai::DEFAULT_BASE_URL.to_string()),
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            resend_base_url: non_empty_var("RESEND_BASE_URL")
                .unwrap_or_else(|| crate::mail::DEFAULT_BASE_URL.to_string()),
            apply_to_email: non_empty_var("APPLY_TO_EMAIL"),
            apply_from_email: non_empty_var("APPLY_FROM_EMAIL")
                .unwrap_or_else(|| "APEX Applications <onboarding@resend.dev>".to_string()),
        }
    }
}
