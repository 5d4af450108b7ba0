//! Merge rules: defaults, override order, conflict handling.
//!
//! Environment values are installed as defaults so that any file source added
//! afterwards overrides them; files are layered user file first, explicit file last.

use super::super::{setting_key, DEFAULT_ENDPOINT_URL};
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in endpoint as the lowest layer.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default(setting_key("endpoint_url"), DEFAULT_ENDPOINT_URL)
}

/// Treat empty values as unset so a blank line in a file never masks a lower layer.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
