// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::gemini::GenerativeClient;
use crate::services::knowledge::KnowledgeBase;
use crate::services::rate_limit::RateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub knowledge: KnowledgeBase,
    pub generative: GenerativeClient,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let knowledge = KnowledgeBase::load()?;
        let generative = GenerativeClient::new(config.gemini_api_key.clone())?;
        let limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max_requests);
        Ok(Self { config, knowledge, generative, limiter })
    }
}
