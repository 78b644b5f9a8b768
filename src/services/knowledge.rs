// src/services/knowledge.rs
use anyhow::Context;
use serde::Deserialize;

use super::language::Language;

/// One canned scenario: lowercase trigger keywords plus the pre-written
/// reply. Matching is substring containment, first entry in table order
/// wins.
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioEntry {
    pub keywords: Vec<String>,
    pub response: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LanguageTable {
    /// Company grounding text injected into the generative prompt.
    pub company: String,
    /// Fixed reply returned when no API key is configured.
    pub demo: String,
    /// Generic user-facing message for internal failures.
    pub apology: String,
    pub scenarios: Vec<ScenarioEntry>,
}

/// Static per-language knowledge tables, loaded once at startup from the
/// bundled asset and read-only afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct KnowledgeBase {
    pub fr: LanguageTable,
    pub en: LanguageTable,
}

const KNOWLEDGE_ASSET: &str = include_str!("../../data/knowledge.json");

impl KnowledgeBase {
    pub fn load() -> anyhow::Result<Self> {
        serde_json::from_str(KNOWLEDGE_ASSET).context("failed to parse data/knowledge.json")
    }

    pub fn table(&self, language: Language) -> &LanguageTable {
        match language {
            Language::Fr => &self.fr,
            Language::En => &self.en,
        }
    }

    /// Scenario lookup: lowercase the message and return the response of
    /// the first entry (declaration order) with any keyword contained in
    /// it. No ranking, no multi-match scoring.
    pub fn find_scenario(&self, message: &str, language: Language) -> Option<&str> {
        let lower = message.to_lowercase();
        self.table(language)
            .scenarios
            .iter()
            .find(|entry| entry.keywords.iter().any(|kw| lower.contains(kw.as_str())))
            .map(|entry| entry.response.as_str())
    }
}
