// src/config.rs
use std::time::Duration;

use anyhow::Context;

/// Deployment mode; development relaxes the origin policy entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Absent means demo mode: no upstream calls, fixed replies.
    pub gemini_api_key: Option<String>,
    pub environment: Environment,
    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,
    pub allowed_origins: Vec<String>,
}

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5500",
    "http://localhost:5501",
    "http://localhost:5502",
    "http://127.0.0.1:5500",
    "http://127.0.0.1:5501",
    "http://127.0.0.1:5502",
    "https://www.mirasens.com",
];

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => 3001,
        };

        // A placeholder key left over from an .env template counts as
        // unconfigured.
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty() && key != "your_gemini_api_key_here");

        let environment = match std::env::var("ENVIRONMENT").as_deref() {
            Ok("development") => Environment::Development,
            _ => Environment::Production,
        };

        let window_ms: u64 = match std::env::var("RATE_LIMIT_WINDOW_MS") {
            Ok(raw) => raw
                .parse()
                .context("RATE_LIMIT_WINDOW_MS must be milliseconds")?,
            Err(_) => 15 * 60 * 1000,
        };

        let rate_limit_max_requests: u32 = match std::env::var("RATE_LIMIT_MAX_REQUESTS") {
            Ok(raw) => raw
                .parse()
                .context("RATE_LIMIT_MAX_REQUESTS must be a count")?,
            Err(_) => 100,
        };

        let mut allowed_origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Ok(extra) = std::env::var("ALLOWED_ORIGINS") {
            allowed_origins.extend(
                extra
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }

        Ok(Self {
            port,
            gemini_api_key,
            environment,
            rate_limit_window: Duration::from_millis(window_ms),
            rate_limit_max_requests,
            allowed_origins,
        })
    }

    pub fn is_permissive(&self) -> bool {
        self.environment == Environment::Development
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            gemini_api_key: None,
            environment: Environment::Production,
            rate_limit_window: Duration::from_secs(15 * 60),
            rate_limit_max_requests: 100,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
