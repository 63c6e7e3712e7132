use anyhow::{Context, Result};

/// Identity Toolkit endpoint that resolves an ID token to its account.
pub const DEFAULT_IDENTITY_LOOKUP_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL document store. When unset the in-memory store is used.
    pub database_url: Option<String>,
    pub identity_api_key: String,
    pub identity_lookup_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            identity_api_key: require_env("IDENTITY_API_KEY")?,
            identity_lookup_url: optional_env("IDENTITY_LOOKUP_URL")
                .unwrap_or_else(|| DEFAULT_IDENTITY_LOOKUP_URL.to_string()),
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

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
