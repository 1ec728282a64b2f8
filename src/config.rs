//! API endpoint configuration.
//!
//! [`ApiConfigState`] holds the saved endpoints and the current selection;
//! [`ClientSettings`] holds request tuning. [`Endpoint::resolve`] turns both
//! into everything a [`crate::client::CompletionClient`] needs, failing with
//! a [`ConfigError`] before any I/O.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigError, StoreError};
use crate::traits::{KeyValueStore, StoreExt};

/// Store key of the persisted [`ApiConfigState`].
pub const API_CONFIGS_KEY: &str = "api-configs";

/// Base URL of the built-in config.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Id of the built-in config.
pub const LOCAL_CONFIG_ID: &str = "local";

pub const DEFAULT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_SUGGESTION_MAX_TOKENS: u32 = 200;

/// Environment variable overriding the active config's base URL.
pub const BASE_URL_ENV: &str = "CHATLINE_BASE_URL";
/// Environment variable overriding the active config's API key.
pub const API_KEY_ENV: &str = "CHATLINE_API_KEY";
/// Environment variable overriding the selected model.
pub const MODEL_ENV: &str = "CHATLINE_MODEL";

/// One saved endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: String,
    /// Bearer token; empty means no `Authorization` header
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl ApiConfig {
    /// Create a config with a fresh id.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            base_url: base_url.into(),
            api_key: String::new(),
            models: Vec::new(),
            is_active: true,
        }
    }

    /// The built-in config pointing at a local server.
    pub fn local() -> Self {
        Self {
            id: LOCAL_CONFIG_ID.to_string(),
            ..Self::new("Local", DEFAULT_BASE_URL)
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }
}

/// Partial update of an [`ApiConfig`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfigUpdate {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub models: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl ApiConfigUpdate {
    fn apply(self, config: &mut ApiConfig) {
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }
        if let Some(models) = self.models {
            config.models = models;
        }
        if let Some(is_active) = self.is_active {
            config.is_active = is_active;
        }
    }
}

/// Saved endpoints plus the current selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigState {
    #[serde(default)]
    pub configs: Vec<ApiConfig>,
    #[serde(default)]
    pub selected_config_id: Option<String>,
    #[serde(default)]
    pub selected_model: Option<String>,
}

impl Default for ApiConfigState {
    fn default() -> Self {
        Self {
            configs: vec![ApiConfig::local()],
            selected_config_id: Some(LOCAL_CONFIG_ID.to_string()),
            selected_model: None,
        }
    }
}

impl ApiConfigState {
    /// Load the persisted state.
    ///
    /// Missing or unreadable saved state yields the default, so a corrupt
    /// file is replaced on the next save.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        store.load_json_or_default(API_CONFIGS_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        store.save_json(API_CONFIGS_KEY, self)
    }

    /// Add a config under a fresh id and return that id.
    pub fn add_config(&mut self, mut config: ApiConfig) -> String {
        config.id = Uuid::new_v4().to_string();
        let id = config.id.clone();
        self.configs.push(config);
        id
    }

    pub fn update_config(&mut self, id: &str, update: ApiConfigUpdate) -> Result<(), ConfigError> {
        let config = self
            .configs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ConfigError::UnknownConfig { id: id.to_string() })?;
        update.apply(config);
        Ok(())
    }

    /// Remove a config. Clears the selection when it was selected.
    ///
    /// Returns whether a config was removed.
    pub fn delete_config(&mut self, id: &str) -> bool {
        let before = self.configs.len();
        self.configs.retain(|c| c.id != id);
        if self.selected_config_id.as_deref() == Some(id) {
            self.selected_config_id = None;
        }
        self.configs.len() != before
    }

    /// Select a config and its first model.
    pub fn select_config(&mut self, id: &str) -> Result<(), ConfigError> {
        let config = self
            .configs
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ConfigError::UnknownConfig { id: id.to_string() })?;
        self.selected_model = config.models.first().cloned();
        self.selected_config_id = Some(id.to_string());
        Ok(())
    }

    pub fn select_model(&mut self, model: impl Into<String>) {
        self.selected_model = Some(model.into());
    }

    /// The selected config, if it exists.
    pub fn active_config(&self) -> Option<&ApiConfig> {
        let id = self.selected_config_id.as_deref()?;
        self.configs.iter().find(|c| c.id == id)
    }

    /// Apply `CHATLINE_BASE_URL`, `CHATLINE_API_KEY` and `CHATLINE_MODEL`.
    ///
    /// URL and key overrides go to the active config, falling back to the
    /// built-in one. A model override is also added to that config's list.
    pub fn apply_env_overrides(&mut self) {
        let base_url = env_value(BASE_URL_ENV);
        let api_key = env_value(API_KEY_ENV);
        let model = env_value(MODEL_ENV);
        if base_url.is_none() && api_key.is_none() && model.is_none() {
            return;
        }

        let config = self.ensure_active();
        if let Some(base_url) = base_url {
            config.base_url = base_url;
        }
        if let Some(api_key) = api_key {
            config.api_key = api_key;
        }
        if let Some(model) = model {
            if !config.models.contains(&model) {
                config.models.push(model.clone());
            }
            self.selected_model = Some(model);
        }
    }

    fn ensure_active(&mut self) -> &mut ApiConfig {
        let selected = self
            .selected_config_id
            .as_ref()
            .and_then(|id| self.configs.iter().position(|c| &c.id == id));

        let index = match selected {
            Some(index) => index,
            None => {
                let index = match self.configs.iter().position(|c| c.id == LOCAL_CONFIG_ID) {
                    Some(index) => index,
                    None => {
                        self.configs.push(ApiConfig::local());
                        self.configs.len() - 1
                    }
                };
                self.selected_config_id = Some(self.configs[index].id.clone());
                index
            }
        };
        &mut self.configs[index]
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Request tuning shared by all requests of a client.
///
/// # Example
///
/// ```ignore
/// let settings = ClientSettings::default()
///     .with_max_tokens(512)
///     .with_temperature(0.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Path of the completion endpoint, appended to the base URL
    pub completions_path: String,
    /// Token limit of chat replies
    pub max_tokens: u32,
    /// Sampling temperature of chat replies
    pub temperature: f64,
    /// Token limit of the suggestion request
    pub suggestion_max_tokens: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            completions_path: DEFAULT_COMPLETIONS_PATH.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            suggestion_max_tokens: DEFAULT_SUGGESTION_MAX_TOKENS,
        }
    }
}

impl ClientSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completions_path(mut self, path: impl Into<String>) -> Self {
        self.completions_path = path.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_suggestion_max_tokens(mut self, max_tokens: u32) -> Self {
        self.suggestion_max_tokens = max_tokens;
        self
    }
}

/// A fully resolved target: where to send requests, with which key and model.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub settings: ClientSettings,
}

impl Endpoint {
    /// Resolve the selected config and model.
    pub fn resolve(state: &ApiConfigState, settings: &ClientSettings) -> Result<Self, ConfigError> {
        let id = state
            .selected_config_id
            .as_deref()
            .ok_or(ConfigError::NoEndpointSelected)?;
        let config = state
            .active_config()
            .ok_or_else(|| ConfigError::UnknownConfig { id: id.to_string() })?;

        if config.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl { id: id.to_string() });
        }

        let model = state
            .selected_model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or(ConfigError::NoModelSelected)?;

        Ok(Self {
            base_url: config.base_url.trim().to_string(),
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
            model: model.to_string(),
            settings: settings.clone(),
        })
    }

    pub fn completions_url(&self) -> String {
        join_url(&self.base_url, &self.settings.completions_path)
    }
}

/// Join a base URL and a path with exactly one `/` between them.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
