//! Explicit config file source from `--config`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use config::FileFormat;
use std::path::Path;
use tracing::warn;

/// Add the explicit config file on top of every other source.
///
/// A missing file is skipped with a warning so that `config setup --config NEW`
/// can create it.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    if path.is_file() {
        builder.add_source(File::from(path).format(FileFormat::Ini).required(true))
    } else {
        warn!(config_path = %path.display(), "Config file not found; ignoring");
        builder
    }
}
