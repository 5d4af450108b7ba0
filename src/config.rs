//! Configuration System
//!
//! Client settings for the remote API: credentials, endpoint and timeout. Layered
//! with the `config` crate, lowest precedence first: built-in endpoint, `SL_*`
//! environment variables, `~/.softlayer`, then the file named by `--config`.
//! Files are INI with a single `[softlayer]` section.

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::user_file::default_config_path;

/// Endpoint used when no layer names one.
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.softlayer.com/rest/v3.1/";

/// Private network endpoint offered by `config setup`.
pub const PRIVATE_ENDPOINT_URL: &str = "https://api.service.softlayer.com/rest/v3.1/";

/// INI section holding the settings.
pub const CONFIG_SECTION: &str = "softlayer";

pub(crate) fn setting_key(name: &str) -> String {
    format!("{}.{}", CONFIG_SECTION, name)
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub username: Option<String>,
    pub api_key: Option<String>,
    pub endpoint_url: String,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            username: None,
            api_key: None,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientSettings {
    /// API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let visible = key.len().saturating_sub(4);
            let tail: String = key.chars().skip(visible).collect();
            format!("{}{}", "*".repeat(visible.min(12)), tail)
        })
    }

    /// INI text for this settings set.
    pub fn to_ini(&self) -> String {
        let mut out = format!("[{}]\n", CONFIG_SECTION);
        if let Some(username) = &self.username {
            out.push_str(&format!("username = {}\n", username));
        }
        if let Some(api_key) = &self.api_key {
            out.push_str(&format!("api_key = {}\n", api_key));
        }
        out.push_str(&format!("endpoint_url = {}\n", self.endpoint_url));
        if let Some(timeout) = self.timeout {
            out.push_str(&format!("timeout = {}\n", timeout));
        }
        out
    }

    /// Write the settings file, readable only by the owner on unix.
    pub fn write_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CliError::local_io(parent, e))?;
        }
        std::fs::write(path, self.to_ini()).map_err(|e| CliError::local_io(path, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| CliError::local_io(path, e))?;
        }
        Ok(())
    }
}
