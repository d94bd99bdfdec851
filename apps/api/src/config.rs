use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODELS;

/// Application configuration loaded from environment variables.
/// Every variable is optional; AI generation is enabled only when an API key is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_models: Vec<String>,
    pub llm_timeout_secs: u64,
    pub questions_per_tech: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GOOGLE_API_KEY").or_else(|| optional_env("GEMINI_API_KEY")),
            gemini_models: optional_env("GEMINI_MODELS")
                .map(|raw| parse_model_list(&raw))
                .filter(|models| !models.is_empty())
                .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            questions_per_tech: std::env::var("QUESTIONS_PER_TECH")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .context("QUESTIONS_PER_TECH must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn llm_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.llm_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini_api_key: None,
            gemini_models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            llm_timeout_secs: 30,
            questions_per_tech: 4,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

/// Blank values count as unset so an empty `GEMINI_API_KEY=` line disables AI.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().trim_start_matches("models/").to_string())
        .filter(|m| !m.is_empty())
        .collect()
}
