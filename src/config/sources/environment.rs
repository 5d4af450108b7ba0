//! Environment source: SL_USERNAME, SL_API_KEY, SL_ENDPOINT_URL, SL_TIMEOUT.

use super::super::setting_key;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;

/// Environment variable for each settings key.
pub const ENV_VARS: [(&str, &str); 4] = [
    ("username", "SL_USERNAME"),
    ("api_key", "SL_API_KEY"),
    ("endpoint_url", "SL_ENDPOINT_URL"),
    ("timeout", "SL_TIMEOUT"),
];

/// Install non-empty environment values as defaults (below every file source).
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (key, var) in ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                builder = builder.set_default(setting_key(key), value)?;
            }
        }
    }
    Ok(builder)
}
