// src/services/gemini.rs
use std::fmt::Write as _;
use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::knowledge::LanguageTable;
use super::language::Language;
use crate::message::Turn;

const GEMINI_MODEL: &str = "gemini-1.5-flash";
const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Shorter than the widget's 30 s client-side abort so the server never
/// outlives the caller.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

/// Only the trailing turns go into the grounding prompt.
const PROMPT_HISTORY_TURNS: usize = 6;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to generative service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generative service returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("generative service returned no usable candidate")]
    EmptyCompletion,
}

/// Wrapper around the Gemini `generateContent` endpoint. Without an API key
/// the client runs in demo mode: `complete` returns the fixed per-language
/// reply from the knowledge asset and never touches the network.
#[derive(Clone, Debug)]
pub struct GenerativeClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GenerativeClient {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        match &api_key {
            Some(_) => info!(model = GEMINI_MODEL, "generative client initialized"),
            None => warn!("no GEMINI_API_KEY configured, running in demo mode"),
        }

        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self { http, api_key, endpoint: GEMINI_ENDPOINT.to_string() })
    }

    pub fn is_demo(&self) -> bool {
        self.api_key.is_none()
    }

    /// Produce the fallback answer for a message no scenario covered.
    pub async fn complete(
        &self,
        message: &str,
        language: Language,
        history: &[Turn],
        table: &LanguageTable,
    ) -> Result<String, UpstreamError> {
        let Some(api_key) = &self.api_key else {
            return Ok(table.demo.clone());
        };

        let prompt = build_prompt(message, language, history, &table.company);
        let payload = GenerateRequest::from_prompt(&prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, detail });
        }

        let body: GenerateResponse = response.json().await?;
        body.into_text().ok_or(UpstreamError::EmptyCompletion)
    }
}

/// Assemble the grounding prompt: language-fixing preamble, soft length
/// cap, company knowledge, the trailing history turns as `role: content`
/// lines, and the current message.
pub fn build_prompt(
    message: &str,
    language: Language,
    history: &[Turn],
    company_knowledge: &str,
) -> String {
    let mut prompt = format!(
        "You are MIRASENS AI Assistant, a helpful chatbot for MIRASENS company.\n\n\
         IMPORTANT INSTRUCTIONS:\n\
         - Always respond in {}\n\
         - Be professional, helpful, and knowledgeable about IoT solutions\n\
         - Keep responses concise but informative (max 300 words)\n\
         - Always offer to connect the user with experts for detailed discussions\n\
         - Focus on MIRASENS solutions and expertise\n\n\
         COMPANY KNOWLEDGE:\n{}\n\n\
         USER MESSAGE: {}",
        language.name_in_english(),
        company_knowledge,
        message,
    );

    if !history.is_empty() {
        prompt.push_str("\n\nPrevious conversation:");
        let start = history.len().saturating_sub(PROMPT_HISTORY_TURNS);
        for turn in &history[start..] {
            let _ = write!(prompt, "\n{}: {}", turn.role.as_str(), turn.content);
        }
    }

    prompt.push_str(
        "\n\nProvide a helpful response about MIRASENS IoT solutions. \
         If you don't have specific information, offer to connect them with our experts.",
    );
    prompt
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn from_prompt(text: &'a str) -> Self {
        Self {
            contents: [Content { role: "user", parts: [Part { text }] }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts.unwrap_or_default())
            .find_map(|part| part.text.filter(|t| !t.is_empty()))
    }
}
