use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_base_url: String,
    /// Deployment secret for the upstream `Authenticate` header. Never
    /// logged and never echoed to clients.
    pub api_auth_token: String,
    /// Feedback page size; fixed per deployment, not user-configurable.
    pub per_page: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            api_base_url: require_env("FEEDBACK_API_BASE_URL")?,
            api_auth_token: require_env("FEEDBACK_API_AUTH_TOKEN")?,
            per_page: std::env::var("FEEDBACK_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("FEEDBACK_PER_PAGE must be a positive integer")?,
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
