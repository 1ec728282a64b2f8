//! Integration tests for the JSON file store
//!
//! Uses a temporary directory per test to check persistence of the saved
//! endpoint configs and conversations.

use chatline::adapters::FileStore;
use chatline::config::{ApiConfig, ApiConfigState, API_CONFIGS_KEY};
use chatline::error::StoreError;
use chatline::history::{ChatHistory, CHAT_HISTORY_KEY};
use chatline::models::{Message, MessageStatus};
use chatline::traits::{KeyValueStore, StoreExt};
use serde_json::json;
use tempfile::TempDir;

fn store() -> (TempDir, FileStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path().join("data"));
    (dir, store)
}

#[test]
fn test_missing_key_loads_none() {
    let (_dir, store) = store();
    assert_eq!(store.load("nothing-here").unwrap(), None);
}

#[test]
fn test_save_creates_directory_and_file() {
    let (_dir, store) = store();
    let value = json!({"answer": 42});

    store.save("numbers", &value).unwrap();

    assert!(store.path_for("numbers").exists());
    assert!(!store.path_for("numbers").with_extension("json.tmp").exists());
    assert_eq!(store.load("numbers").unwrap(), Some(value));
}

#[test]
fn test_save_overwrites_previous_value() {
    let (_dir, store) = store();

    store.save("key", &json!([1, 2, 3])).unwrap();
    store.save("key", &json!([4])).unwrap();

    assert_eq!(store.load("key").unwrap(), Some(json!([4])));
}

#[test]
fn test_corrupt_file_is_serialization_error() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(store.path_for("broken"), "{not json").unwrap();

    let err = store.load("broken").unwrap_err();
    assert!(matches!(err, StoreError::Serialization { ref key, .. } if key == "broken"));
}

#[test]
fn test_typed_round_trip_through_store_ext() {
    let (_dir, store) = store();
    let names = vec!["a".to_string(), "b".to_string()];

    store.save_json("names", &names).unwrap();
    let loaded: Option<Vec<String>> = store.load_json("names").unwrap();

    assert_eq!(loaded, Some(names));
}

#[test]
fn test_api_config_state_persists() {
    let (_dir, store) = store();

    let mut state = ApiConfigState::load(&store).unwrap();
    assert_eq!(state, ApiConfigState::default());

    let id = state.add_config(
        ApiConfig::new("Remote", "https://api.example.com/")
            .with_api_key("sk-remote")
            .with_models(vec!["gpt-x".to_string(), "gpt-y".to_string()]),
    );
    state.select_config(&id).unwrap();
    state.save(&store).unwrap();

    let reloaded = ApiConfigState::load(&store).unwrap();
    assert_eq!(reloaded, state);
    assert_eq!(reloaded.selected_model.as_deref(), Some("gpt-x"));

    // Field names on disk are camelCase
    let raw = store.load(API_CONFIGS_KEY).unwrap().unwrap();
    assert_eq!(raw["selectedConfigId"], json!(id));
    assert_eq!(raw["configs"][1]["baseURL"], "https://api.example.com/");
}

#[test]
fn test_chat_history_persists() {
    let (_dir, store) = store();

    let mut history = ChatHistory::load(&store).unwrap();
    assert!(history.sessions.is_empty());

    let id = history.create_session(None);
    let mut reply = Message::streaming_assistant();
    reply.content = "Half a sen".to_string();
    assert!(history.update_session(&id, vec![Message::user("Write a sentence"), reply]));
    history.save(&store).unwrap();

    let reloaded = ChatHistory::load(&store).unwrap();
    assert_eq!(reloaded, history);
    assert_eq!(reloaded.current().unwrap().title, "Write a sentence");
    assert_eq!(
        reloaded.current().unwrap().messages[1].status,
        MessageStatus::Streaming
    );
    assert!(store.path_for(CHAT_HISTORY_KEY).exists());
}

#[test]
fn test_corrupt_saved_state_falls_back_to_defaults() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(store.path_for(CHAT_HISTORY_KEY), "{ truncated").unwrap();
    std::fs::write(store.path_for(API_CONFIGS_KEY), "not json").unwrap();

    let mut history = ChatHistory::load(&store).unwrap();
    let state = ApiConfigState::load(&store).unwrap();
    assert!(history.sessions.is_empty());
    assert_eq!(state, ApiConfigState::default());

    // The next save replaces the corrupt file
    history.create_session(Some("Fresh"));
    history.save(&store).unwrap();
    let reloaded = ChatHistory::load(&store).unwrap();
    assert_eq!(reloaded.sessions.len(), 1);
    assert_eq!(reloaded.sessions[0].title, "Fresh");
}
