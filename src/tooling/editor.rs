//! Editor Integration
//!
//! Long free-text input (ticket bodies) is collected by opening the user's
//! `$EDITOR` on a scratch file. [`CannedEditor`] stands in for it in tests.

use crate::error::CliError;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Editor used when neither `VISUAL` nor `EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "vi";

/// Something that turns seed text into user-edited text.
pub trait TextEditor {
    fn edit(&self, seed: &str) -> Result<String, CliError>;
}

/// Opens `$VISUAL`/`$EDITOR` on a temporary file and reads it back.
#[derive(Debug, Clone, Default)]
pub struct ExternalEditor {
    command: Option<String>,
}

impl ExternalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `command` instead of the environment's editor.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    fn editor_command(&self) -> String {
        self.command
            .clone()
            .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.trim().is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}

impl TextEditor for ExternalEditor {
    fn edit(&self, seed: &str) -> Result<String, CliError> {
        let mut file = tempfile::Builder::new()
            .prefix("slcli-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| CliError::local_io(std::env::temp_dir(), e))?;
        file.write_all(seed.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| CliError::local_io(file.path(), e))?;

        // EDITOR may carry arguments, e.g. "code --wait"
        let command = self.editor_command();
        let mut parts = command.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_EDITOR);
        debug!(editor = %command, path = %file.path().display(), "Launching editor");

        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .status()
            .map_err(|e| CliError::local_io(program, e))?;
        if !status.success() {
            return Err(CliError::Aborted(format!(
                "Editor '{}' exited with {}",
                command, status
            )));
        }

        std::fs::read_to_string(file.path()).map_err(|e| CliError::local_io(file.path(), e))
    }
}

/// Returns fixed text regardless of the seed.
#[derive(Debug, Clone, Default)]
pub struct CannedEditor {
    text: String,
}

impl CannedEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextEditor for CannedEditor {
    fn edit(&self, _seed: &str) -> Result<String, CliError> {
        Ok(self.text.clone())
    }
}
