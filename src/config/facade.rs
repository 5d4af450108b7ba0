//! Settings loader: builds the layered config and extracts [`ClientSettings`].

use super::merge::merge_policy::{builder_with_defaults, non_empty};
use super::sources::{environment, explicit_file, user_file};
use super::{setting_key, ClientSettings, DEFAULT_ENDPOINT_URL};
use crate::error::CliError;
use config::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from the environment, `~/.softlayer` and an optional explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<ClientSettings, CliError> {
        Self::load_layers(user_file::default_config_path(), explicit)
    }

    /// Load settings with an explicit user file location.
    pub fn load_layers(
        user_path: Option<PathBuf>,
        explicit: Option<&Path>,
    ) -> Result<ClientSettings, CliError> {
        let builder = builder_with_defaults()?;
        let builder = environment::add_to_builder(builder)?;
        let builder = user_file::add_to_builder(builder, user_path.as_ref());
        let builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path),
            None => builder,
        };
        let config = builder.build()?;
        let settings = Self::extract(&config)?;
        debug!(
            endpoint_url = %settings.endpoint_url,
            username = ?settings.username,
            "Resolved client settings"
        );
        Ok(settings)
    }

    fn extract(config: &Config) -> Result<ClientSettings, CliError> {
        // a blank file value falls back to the environment instead of masking it
        let get = |name: &str| -> Option<String> {
            non_empty(config.get_string(&setting_key(name)).ok()).or_else(|| {
                environment::ENV_VARS
                    .iter()
                    .find(|(key, _)| *key == name)
                    .and_then(|(_, var)| non_empty(std::env::var(var).ok()))
            })
        };

        let timeout = match get("timeout") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                CliError::Config(format!("Invalid timeout '{}': expected whole seconds", raw))
            })?),
            None => None,
        };

        Ok(ClientSettings {
            username: get("username"),
            api_key: get("api_key"),
            endpoint_url: get("endpoint_url").unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string()),
            timeout,
        })
    }
}
