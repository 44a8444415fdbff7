use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_FUNCTION_NAME: &str = "analyze-resume";
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the function host, e.g. `https://<project>.supabase.co`.
    pub analysis_function_url: String,
    pub analysis_function_name: String,
    pub analysis_function_key: String,
    /// Bearer token required to read feedback. `None` disables reads entirely.
    pub feedback_read_token: Option<String>,
    /// Sessions not touched for this long are evicted.
    pub session_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            analysis_function_url: require_env("ANALYSIS_FUNCTION_URL")?,
            analysis_function_name: std::env::var("ANALYSIS_FUNCTION_NAME")
                .unwrap_or_else(|_| DEFAULT_FUNCTION_NAME.to_string()),
            analysis_function_key: require_env("ANALYSIS_FUNCTION_KEY")?,
            feedback_read_token: std::env::var("FEEDBACK_READ_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            session_idle_ttl: Duration::from_secs(
                std::env::var("SESSION_IDLE_TTL_SECS")
                    .unwrap_or_else(|_| DEFAULT_SESSION_IDLE_TTL_SECS.to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
