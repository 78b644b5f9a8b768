// src/session.rs
//! Client-side conversation state: the widget's transcript, the open/closed
//! flag and the persisted language preference. Nothing here touches the
//! network or any rendering layer; the widget renders from this model and
//! serializes `OutboundChat` to talk to the relay.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;

use crate::message::Turn;
use crate::services::language::Language;

/// Trailing turns included in an outbound request.
pub const HISTORY_WINDOW: usize = 10;

/// Fixed key under which the language preference is persisted.
pub const LANGUAGE_STORAGE_KEY: &str = "userLanguage";

const DEFAULT_LANGUAGE: Language = Language::Fr;

/// String key/value persistence, the localStorage seam. The widget plugs
/// the browser store in; tests use [`MemoryStore`].
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

/// The persisted language choice with change notification. There is exactly
/// one setter; observers (other tabs, the page translator) follow through
/// the watch channel instead of polling.
pub struct LanguagePreference {
    store: Arc<dyn PreferenceStore>,
    current: watch::Sender<Language>,
}

impl LanguagePreference {
    /// Reads the stored preference; absent or unrecognized values fall back
    /// to the default without being rewritten.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let initial = store
            .get(LANGUAGE_STORAGE_KEY)
            .as_deref()
            .and_then(Language::from_hint)
            .unwrap_or(DEFAULT_LANGUAGE);
        let (current, _) = watch::channel(initial);
        Self { store, current }
    }

    pub fn language(&self) -> Language {
        *self.current.borrow()
    }

    /// The single authoritative setter: persists and notifies subscribers.
    pub fn set(&self, language: Language) {
        self.store.set(LANGUAGE_STORAGE_KEY, language.as_str());
        self.current.send_replace(language);
    }

    /// Storage-change signal for other widget instances.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.current.subscribe()
    }
}

/// What the widget shows when a send fails. The failed user turn stays in
/// the transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendFailure {
    Network,
    Timeout,
    Generic,
}

pub fn failure_message(language: Language, failure: SendFailure) -> &'static str {
    match (language, failure) {
        (Language::Fr, SendFailure::Network) => "Erreur de connexion. Veuillez réessayer.",
        (Language::Fr, SendFailure::Timeout) => "Délai d'attente dépassé. Veuillez réessayer.",
        (Language::Fr, SendFailure::Generic) => "Une erreur s'est produite. Veuillez réessayer.",
        (Language::En, SendFailure::Network) => "Connection error. Please try again.",
        (Language::En, SendFailure::Timeout) => "Request timeout. Please try again.",
        (Language::En, SendFailure::Generic) => "An error occurred. Please try again.",
    }
}

/// Request body the widget sends to `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct OutboundChat<'a> {
    pub message: &'a str,
    #[serde(rename = "conversationHistory")]
    pub conversation_history: &'a [Turn],
    pub language: Language,
}

/// One page-lifetime conversation: append-only transcript plus UI state.
pub struct ChatSession {
    history: Vec<Turn>,
    preference: LanguagePreference,
    open: bool,
}

impl ChatSession {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            history: Vec::new(),
            preference: LanguagePreference::load(store),
            open: false,
        }
    }

    pub fn language(&self) -> Language {
        self.preference.language()
    }

    pub fn change_language(&self, language: Language) {
        self.preference.set(language);
    }

    pub fn subscribe_language(&self) -> watch::Receiver<Language> {
        self.preference.subscribe()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Turn::assistant(content));
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Trailing window sent to the relay.
    pub fn window(&self) -> &[Turn] {
        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        &self.history[start..]
    }

    /// Build the outbound request for `message`. The caller appends the
    /// user turn first so a failed send leaves it visible; the window
    /// therefore already contains the message being sent.
    pub fn request<'a>(&'a self, message: &'a str) -> OutboundChat<'a> {
        OutboundChat {
            message,
            conversation_history: self.window(),
            language: self.language(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }
}
