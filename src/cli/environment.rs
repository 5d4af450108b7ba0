//! Per-invocation environment handed to a command body.

use super::prompt::{self, Prompter};
use crate::config::ClientSettings;
use crate::error::CliError;
use crate::formatting::OutputFormat;
use crate::tooling::TextEditor;
use crate::transport::{ApiRequest, RemoteCall};
use serde_json::Value;
use std::path::PathBuf;
use std::rc::Rc;

/// Everything a command may touch besides its arguments.
pub struct Environment<'a> {
    pub format: OutputFormat,
    /// `--really`: skip confirmation prompts
    pub really: bool,
    pub settings: ClientSettings,
    /// Explicit `--config` path, if any
    pub config_path: Option<PathBuf>,
    client: Rc<dyn RemoteCall>,
    prompter: &'a mut dyn Prompter,
    editor: &'a dyn TextEditor,
}

impl<'a> Environment<'a> {
    pub fn new(
        format: OutputFormat,
        really: bool,
        settings: ClientSettings,
        client: Box<dyn RemoteCall>,
        prompter: &'a mut dyn Prompter,
        editor: &'a dyn TextEditor,
    ) -> Self {
        Self {
            format,
            really,
            settings,
            config_path: None,
            client: Rc::from(client),
            prompter,
            editor,
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Shared handle, so a manager can outlive a later `&mut self` prompt.
    pub fn client(&self) -> Rc<dyn RemoteCall> {
        Rc::clone(&self.client)
    }

    /// Issue one remote call.
    pub fn call(&self, request: &ApiRequest) -> Result<Value, CliError> {
        Ok(self.client.call(request)?)
    }

    pub fn prompt(&mut self, message: &str) -> Result<String, CliError> {
        self.prompter.prompt(message)
    }

    pub fn prompt_secret(&mut self, message: &str) -> Result<String, CliError> {
        self.prompter.prompt_secret(message)
    }

    /// Yes/no question; always true under `--really`.
    pub fn confirm(&mut self, message: &str, default: bool) -> Result<bool, CliError> {
        if self.really {
            return Ok(true);
        }
        prompt::confirm(&mut *self.prompter, message, default)
    }

    /// Typed-token guard for irreversible actions; always true under `--really`.
    pub fn no_going_back(&mut self, token: Option<&str>) -> Result<bool, CliError> {
        if self.really {
            return Ok(true);
        }
        prompt::no_going_back(&mut *self.prompter, token)
    }

    /// Open the editor on `seed` and return the edited text.
    pub fn edit(&self, seed: &str) -> Result<String, CliError> {
        self.editor.edit(seed)
    }
}
