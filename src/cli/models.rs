//! `--models`: list the models of the active endpoint.

use color_eyre::Result;

use crate::adapters::{FileStore, ReqwestHttpClient};
use crate::client::fetch_models;
use crate::config::{ApiConfigState, ApiConfigUpdate};
use crate::error::ConfigError;

/// Fetch and print the model ids, remembering them on the active config.
///
/// When no model is selected yet, the first one is selected.
pub async fn handle_models_command() -> Result<()> {
    let store = FileStore::from_env()?;
    let mut state = ApiConfigState::load(&store)?;
    state.apply_env_overrides();

    let config = state
        .active_config()
        .cloned()
        .ok_or(ConfigError::NoEndpointSelected)?;
    let api_key = Some(config.api_key.as_str()).filter(|k| !k.is_empty());

    let models = fetch_models(&ReqwestHttpClient::new(), &config.base_url, api_key)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e.user_message()))?;

    if models.is_empty() {
        println!("{} offers no models.", config.base_url);
        return Ok(());
    }

    for model in &models {
        let marker = if state.selected_model.as_deref() == Some(model.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, model);
    }

    if state.selected_model.is_none() {
        state.select_model(models[0].clone());
    }
    state.update_config(
        &config.id,
        ApiConfigUpdate {
            models: Some(models),
            ..Default::default()
        },
    )?;
    state.save(&store)?;
    Ok(())
}
