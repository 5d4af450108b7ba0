//! Interactive input and the confirmation guard.
//!
//! All reads go through [`Prompter`]; [`ConsolePrompter`] uses dialoguer on a
//! terminal and a plain line read otherwise, [`ScriptedPrompter`] replays answers.

use crate::error::CliError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal, Write};
use std::rc::Rc;

/// Words accepted as "yes" by [`confirm`].
const AFFIRMATIVE: [&str; 5] = ["y", "yes", "yeah", "yup", "yolo"];

/// Source of interactive answers.
pub trait Prompter {
    /// Show `message` and read one line (without the trailing newline).
    fn prompt(&mut self, message: &str) -> Result<String, CliError>;

    /// Like [`Prompter::prompt`] but without echo where supported.
    fn prompt_secret(&mut self, message: &str) -> Result<String, CliError> {
        self.prompt(message)
    }
}

/// Prompter bound to the process stdin/stderr.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl ConsolePrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_plain(message: &str) -> Result<String, CliError> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", message).map_err(|e| CliError::local_io("<stderr>", e))?;
        stderr.flush().map_err(|e| CliError::local_io("<stderr>", e))?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::Interrupted => CliError::Interrupted,
                _ => CliError::local_io("<stdin>", e),
            })?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// dialoguer appends its own `: ` after the prompt.
fn dialoguer_prompt(message: &str) -> &str {
    message.trim_end().trim_end_matches(':')
}

impl Prompter for ConsolePrompter {
    fn prompt(&mut self, message: &str) -> Result<String, CliError> {
        if !std::io::stdin().is_terminal() {
            return Self::read_plain(message);
        }
        let answer: String = dialoguer::Input::new()
            .with_prompt(dialoguer_prompt(message))
            .allow_empty(true)
            .report(false)
            .interact_text()?;
        Ok(answer)
    }

    fn prompt_secret(&mut self, message: &str) -> Result<String, CliError> {
        if !std::io::stdin().is_terminal() {
            return Self::read_plain(message);
        }
        let answer = dialoguer::Password::new()
            .with_prompt(dialoguer_prompt(message))
            .allow_empty_password(true)
            .report(false)
            .interact()?;
        Ok(answer)
    }
}

/// Replays canned answers and records every prompt shown.
///
/// Running out of answers reads as an interrupt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Rc::default(),
        }
    }

    /// Shared handle to the prompts shown so far.
    pub fn transcript(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.transcript)
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, message: &str) -> Result<String, CliError> {
        self.transcript.borrow_mut().push(message.to_string());
        self.answers.pop_front().ok_or(CliError::Interrupted)
    }
}

/// Ask a yes/no question. An empty answer selects `default`.
pub fn confirm(prompter: &mut dyn Prompter, prompt: &str, default: bool) -> Result<bool, CliError> {
    let choices = if default { "[Y/n]" } else { "[y/N]" };
    let answer = prompter.prompt(&format!("{} {}: ", prompt, choices))?;
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return Ok(default);
    }
    Ok(AFFIRMATIVE.contains(&answer.as_str()))
}

/// Require the user to type `token` (default `yes`) before an irreversible action.
pub fn no_going_back(prompter: &mut dyn Prompter, token: Option<&str>) -> Result<bool, CliError> {
    let token = token.filter(|t| !t.is_empty()).unwrap_or("yes");
    let answer = prompter.prompt(&format!(
        "This action cannot be undone! Type \"{}\" or press Enter to abort: ",
        token
    ))?;
    Ok(answer.trim().eq_ignore_ascii_case(token))
}
