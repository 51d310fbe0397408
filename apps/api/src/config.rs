use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub classifier_url: String,
    /// Remote similarity service. When unset the local TF-IDF backend is used.
    pub vectorizer_url: Option<String>,
    /// Blend weight for learned pattern boosts in career ranking.
    /// 0.0 disables the learned layer entirely; the classifier then decides alone.
    pub blend_weight: f64,
    pub upstream_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let blend_weight = std::env::var("LEARNED_BLEND_WEIGHT")
            .unwrap_or_else(|_| "0.25".to_string())
            .parse::<f64>()
            .context("LEARNED_BLEND_WEIGHT must be a number")?;
        if !(0.0..=1.0).contains(&blend_weight) {
            bail!("LEARNED_BLEND_WEIGHT must be within [0.0, 1.0], got {blend_weight}");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            classifier_url: require_env("CLASSIFIER_URL")?,
            vectorizer_url: std::env::var("VECTORIZER_URL").ok(),
            blend_weight,
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a number of seconds")?,
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
