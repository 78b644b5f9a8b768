use std::sync::Arc;

use mirasens_chatbot::message::Role;
use mirasens_chatbot::services::language::Language;
use mirasens_chatbot::session::{
    ChatSession, HISTORY_WINDOW, LANGUAGE_STORAGE_KEY, MemoryStore, PreferenceStore, SendFailure,
    failure_message,
};

#[test]
fn language_change_round_trips_through_the_store() {
    let store = Arc::new(MemoryStore::new());
    let session = ChatSession::new(store.clone());

    session.change_language(Language::En);
    assert_eq!(store.get(LANGUAGE_STORAGE_KEY).as_deref(), Some("en"));
    assert_eq!(session.language(), Language::En);
}

#[test]
fn reload_reinitializes_from_the_stored_preference() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());

    {
        let session = ChatSession::new(store.clone());
        assert_eq!(session.language(), Language::Fr, "default before any choice");
        session.change_language(Language::En);
    }

    // A new session over the same store is the page-reload analog.
    let reloaded = ChatSession::new(store);
    assert_eq!(reloaded.language(), Language::En);
}

#[test]
fn garbage_in_the_store_falls_back_to_the_default() {
    let store = Arc::new(MemoryStore::new());
    store.set(LANGUAGE_STORAGE_KEY, "klingon");
    let session = ChatSession::new(store);
    assert_eq!(session.language(), Language::Fr);
}

#[tokio::test]
async fn subscribers_see_the_language_change() {
    let session = ChatSession::new(Arc::new(MemoryStore::new()));
    let mut rx = session.subscribe_language();
    assert_eq!(*rx.borrow(), Language::Fr);

    session.change_language(Language::En);
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), Language::En);
}

#[test]
fn outbound_window_keeps_only_the_trailing_turns() {
    let mut session = ChatSession::new(Arc::new(MemoryStore::new()));
    for i in 0..15 {
        session.push_user(format!("q{i}"));
        session.push_assistant(format!("a{i}"));
    }

    assert_eq!(session.history().len(), 30);
    let window = session.window();
    assert_eq!(window.len(), HISTORY_WINDOW);
    // The transcript itself is never truncated, only the outbound view.
    assert_eq!(window.first().unwrap().content, "q10");
    assert_eq!(window.last().unwrap().content, "a14");
}

#[test]
fn request_carries_window_language_and_wire_names() {
    let mut session = ChatSession::new(Arc::new(MemoryStore::new()));
    session.change_language(Language::En);
    session.push_user("hello");
    session.push_assistant("hi there");
    session.push_user("what about pricing?");

    let request = session.request("what about pricing?");
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["message"], "what about pricing?");
    assert_eq!(json["language"], "en");
    let history = json["conversationHistory"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");
}

#[test]
fn failed_send_leaves_the_user_turn_in_the_transcript() {
    let mut session = ChatSession::new(Arc::new(MemoryStore::new()));
    session.push_user("are you there?");
    let _request = session.request("are you there?");

    // Simulated failure: the widget appends the localized error as an
    // assistant turn; the user's message stays.
    let error = failure_message(session.language(), SendFailure::Timeout);
    session.push_assistant(error);

    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[0].role, Role::User);
    assert_eq!(session.history()[0].content, "are you there?");
}

#[test]
fn failure_messages_are_language_appropriate() {
    assert_ne!(
        failure_message(Language::Fr, SendFailure::Network),
        failure_message(Language::En, SendFailure::Network)
    );
    assert_ne!(
        failure_message(Language::En, SendFailure::Network),
        failure_message(Language::En, SendFailure::Timeout)
    );
    assert!(failure_message(Language::Fr, SendFailure::Timeout).contains("Délai"));
}

#[test]
fn widget_starts_closed_and_toggles() {
    let mut session = ChatSession::new(Arc::new(MemoryStore::new()));
    assert!(!session.is_open());
    assert!(session.toggle_open());
    assert!(!session.toggle_open());
}
