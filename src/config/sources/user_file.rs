//! User config file source: ~/.softlayer

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use config::FileFormat;
use directories::BaseDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to the per-user config file.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".softlayer"))
}

/// Add the user config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&PathBuf>,
) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) if path.is_file() => {
            debug!(config_path = %path.display(), "Loading user config file");
            builder.add_source(File::from(path.as_path()).format(FileFormat::Ini).required(false))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "No user config file");
            builder
        }
        None => builder,
    }
}
