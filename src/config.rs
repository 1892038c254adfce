use crate::error::{Error, Result};
use crate::models::exam_center::RegisteredCenter;
use dotenvy::dotenv;
use std::env;

/// Process configuration, built once in `main` and injected into `AppState`.
/// Deliberately not a process-wide singleton so tests can construct configs
/// directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// Exam window length. Elapsed time past this without a recorded
    /// completion marks a session as stale.
    pub exam_duration_minutes: i64,
    /// Registered exam centers, keyed by admission token. Empty means the
    /// registry falls back to the built-in default center.
    pub exam_centers: Vec<RegisteredCenter>,
    pub public_rps: u32,
    pub integration_rps: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let exam_centers = match env::var("EXAM_CENTERS") {
            Ok(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|e| Error::Config(format!("Invalid EXAM_CENTERS: {}", e)))?,
            _ => Vec::new(),
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            exam_duration_minutes: get_env_parse("EXAM_DURATION_MINUTES")?,
            exam_centers,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            integration_rps: get_env_parse("INTEGRATION_RPS")?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
