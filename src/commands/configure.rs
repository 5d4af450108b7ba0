//! `config setup` and `config show`.

use crate::cli::{CliCommand, Environment, ParsedArgs};
use crate::config::{
    default_config_path, ClientSettings, DEFAULT_ENDPOINT_URL, PRIVATE_ENDPOINT_URL,
};
use crate::error::CliError;
use crate::formatting::{KeyValueTable, Output};
use tracing::info;

const NOT_SET: &str = "not set";

/// Prompt for credentials and write them to the config file.
pub struct Setup;

impl CliCommand for Setup {
    fn name(&self) -> Option<&'static str> {
        Some("setup")
    }

    fn summary(&self) -> &'static str {
        "Set username, API key and endpoint URL"
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        _args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let path = match env.config_path.clone().or_else(default_config_path) {
            Some(path) => path,
            None => return Err(CliError::Config("Unable to locate the home directory".to_string())),
        };
        let current = env.settings.clone();

        let username = prompt_with_default(env, "Username", current.username.as_deref(), false)?;
        let api_key = prompt_with_default(env, "API Key", current.api_key.as_deref(), true)?;
        let endpoint =
            prompt_with_default(env, "Endpoint URL", Some(&current.endpoint_url), false)?;

        let settings = ClientSettings {
            username,
            api_key,
            endpoint_url: expand_endpoint(endpoint.as_deref()),
            timeout: current.timeout,
        };

        let question = format!(
            "Are you sure you want to write settings to \"{}\"?",
            path.display()
        );
        if !env.confirm(&question, true)? {
            return Err(CliError::aborted());
        }
        settings.write_to(&path)?;
        info!(path = %path.display(), "Wrote client settings");
        Ok(Some(Output::text("Configuration Updated Successfully")))
    }
}

/// Empty answers keep the current value.
fn prompt_with_default(
    env: &mut Environment<'_>,
    label: &str,
    current: Option<&str>,
    secret: bool,
) -> Result<Option<String>, CliError> {
    let message = match current {
        Some(value) if !secret => format!("{} [{}]: ", label, value),
        _ => format!("{}: ", label),
    };
    let answer = if secret {
        env.prompt_secret(&message)?
    } else {
        env.prompt(&message)?
    };
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(current.map(str::to_string))
    } else {
        Ok(Some(answer.to_string()))
    }
}

/// `public` and `private` name the two well-known endpoints.
fn expand_endpoint(answer: Option<&str>) -> String {
    match answer {
        None | Some("") | Some("public") => DEFAULT_ENDPOINT_URL.to_string(),
        Some("private") => PRIVATE_ENDPOINT_URL.to_string(),
        Some(url) => url.to_string(),
    }
}

/// Print the resolved settings.
pub struct Show;

impl CliCommand for Show {
    fn name(&self) -> Option<&'static str> {
        Some("show")
    }

    fn summary(&self) -> &'static str {
        "Show current configuration"
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        _args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let settings = &env.settings;
        let mut table = KeyValueTable::new();
        table
            .add("Username", settings.username.as_deref().unwrap_or(NOT_SET))
            .add("API Key", settings.masked_api_key().unwrap_or_else(|| NOT_SET.to_string()))
            .add("Endpoint URL", settings.endpoint_url.as_str())
            .add(
                "Timeout",
                settings
                    .timeout
                    .map(|t| format!("{}s", t))
                    .unwrap_or_else(|| NOT_SET.to_string()),
            );
        Ok(Some(table.into()))
    }
}
