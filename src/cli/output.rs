//! CLI output: error mapping from the error taxonomy to the printed surface.

use crate::error::CliError;
use owo_colors::OwoColorize;

/// Message printed for a failed command, without the `Error:` prefix.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Remote(remote) if remote.is_invalid_token() => format!(
            "{}\n\nInvalid API token. Run 'slcli config setup' to update your credentials.",
            remote
        ),
        other => other.to_string(),
    }
}

/// Full stderr line: `Error: <message>`, prefix in red when `color` is set.
pub fn error_line(e: &CliError, color: bool) -> String {
    let message = map_error(e);
    if color {
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}
