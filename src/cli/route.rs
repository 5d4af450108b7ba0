//! CLI route: the registration table and the dispatcher that turns raw tokens into
//! one command invocation.

use super::command::CliCommand;
use super::environment::Environment;
use super::help::{namespace_help, root_help};
use super::parse::{build_command, ParsedArgs, PrimaryParse};
use super::prompt::{ConsolePrompter, Prompter};
use super::template::Template;
use crate::config::{default_config_path, ClientSettings, ConfigLoader};
use crate::error::CliError;
use crate::formatting::{format_output, OutputFormat, Rendered};
use crate::tooling::{ExternalEditor, TextEditor};
use crate::transport::{FixtureTransport, RemoteCall, RestTransport};
use clap::error::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// A resource namespace (`vs`, `sshkey`, ...) and its actions.
pub struct Namespace {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub summary: &'static str,
    commands: Vec<Box<dyn CliCommand>>,
}

impl Namespace {
    pub fn new(name: &'static str, summary: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            summary,
            commands: Vec::new(),
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn command(mut self, command: impl CliCommand + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    pub fn commands(&self) -> impl Iterator<Item = &dyn CliCommand> {
        self.commands.iter().map(|c| c.as_ref())
    }

    /// Named action lookup.
    pub fn find(&self, action: &str) -> Option<&dyn CliCommand> {
        self.commands().find(|c| c.name() == Some(action))
    }

    /// The unnamed action, if the namespace has one.
    pub fn default_command(&self) -> Option<&dyn CliCommand> {
        self.commands().find(|c| c.name().is_none())
    }

    fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.aliases.contains(&token)
    }
}

/// Immutable table of namespaces, sorted by name.
pub struct Registry {
    namespaces: Vec<Namespace>,
}

impl Registry {
    pub fn new(mut namespaces: Vec<Namespace>) -> Self {
        namespaces.sort_by_key(|ns| ns.name);
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn find(&self, token: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.answers_to(token))
    }

    fn resolve(&self, token: &str) -> Result<&Namespace, CliError> {
        self.find(token).ok_or_else(|| {
            CliError::usage(format!(
                "Invalid module: '{}'\n\n{}",
                token,
                root_help(self)
            ))
        })
    }
}

/// Builds the remote client once arguments have parsed; the flag is `--demo`.
pub type ClientFactory =
    Box<dyn Fn(&ClientSettings, bool) -> Result<Box<dyn RemoteCall>, CliError>>;

/// REST transport, or built-in fixtures under `--demo`.
pub fn default_client_factory(
    settings: &ClientSettings,
    demo: bool,
) -> Result<Box<dyn RemoteCall>, CliError> {
    if demo {
        debug!("Using demo fixtures");
        return Ok(Box::new(FixtureTransport::demo()));
    }
    Ok(Box::new(RestTransport::new(settings)?))
}

/// Resolves resource and action, parses flags, builds the environment and runs
/// the command body.
pub struct Dispatcher {
    registry: Registry,
    client_factory: ClientFactory,
    prompter: Box<dyn Prompter>,
    editor: Box<dyn TextEditor>,
    user_config: Option<PathBuf>,
    default_format: OutputFormat,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            client_factory: Box::new(default_client_factory),
            prompter: Box::new(ConsolePrompter::new()),
            editor: Box::new(ExternalEditor::new()),
            user_config: default_config_path(),
            default_format: OutputFormat::default_for_stdout(),
        }
    }

    pub fn with_client_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ClientSettings, bool) -> Result<Box<dyn RemoteCall>, CliError> + 'static,
    {
        self.client_factory = Box::new(factory);
        self
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    pub fn with_editor(mut self, editor: impl TextEditor + 'static) -> Self {
        self.editor = Box::new(editor);
        self
    }

    /// Override the `~/.softlayer` location; `None` disables the user file.
    pub fn with_user_config(mut self, path: Option<PathBuf>) -> Self {
        self.user_config = path;
        self
    }

    /// Format used when `--format` is absent.
    pub fn with_default_format(mut self, format: OutputFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one invocation. `tokens` excludes the program name.
    pub fn run<I, S>(&mut self, tokens: I) -> Result<Option<Rendered>, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(|t| t.as_ref().to_string()).collect();
        let primary = PrimaryParse::scan(&tokens);
        let help_code = if primary.globals.help { 0 } else { 1 };

        let Some(resource) = primary.positional(&tokens, 0) else {
            return Err(CliError::Help {
                text: root_help(&self.registry),
                code: help_code,
            });
        };

        if resource == "help" {
            let text = match primary.positional(&tokens, 1) {
                Some(name) => namespace_help(self.registry.resolve(name)?),
                None => root_help(&self.registry),
            };
            return Err(CliError::Help { text, code: 0 });
        }

        let namespace = self.registry.resolve(resource)?;
        let action = primary.positional(&tokens, 1);
        let (command, consumed) = match action.and_then(|a| namespace.find(a)) {
            Some(command) => (command, 2),
            None => match (namespace.default_command(), action) {
                (Some(command), _) => (command, 1),
                (None, Some(action)) => {
                    return Err(CliError::usage(format!(
                        "Invalid action: '{}'\n\n{}",
                        action,
                        namespace_help(namespace)
                    )))
                }
                (None, None) => {
                    return Err(CliError::Help {
                        text: namespace_help(namespace),
                        code: help_code,
                    })
                }
            },
        };

        let consumed = &primary.positionals[..consumed];
        let mut argv: Vec<String> = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| !consumed.contains(i))
            .map(|(_, t)| t.clone())
            .collect();

        let params = command.params();
        if let Some(path) = &primary.globals.template {
            debug!(template = %path.display(), "Applying template");
            argv = Template::load(path)?.apply(&argv, &params)?;
        }

        let bin_name = match command.name() {
            Some(action) => format!("slcli {} {}", namespace.name, action),
            None => format!("slcli {}", namespace.name),
        };
        let matches = build_command(
            bin_name.clone(),
            command.summary(),
            &params,
            &command.exclusive_groups(),
        )
        .try_get_matches_from(std::iter::once(bin_name).chain(argv))
        .map_err(map_clap_error)?;
        let args = ParsedArgs::from_matches(&matches, &params, self.default_format)?;

        info!(
            resource = namespace.name,
            action = command.name().unwrap_or("-"),
            format = %args.format,
            "Dispatching command"
        );

        let settings = ConfigLoader::load_layers(self.user_config.clone(), args.config.as_deref())?;
        let client = (self.client_factory)(&settings, args.demo)?;
        let mut env = Environment::new(
            args.format,
            args.really,
            settings,
            client,
            self.prompter.as_mut(),
            self.editor.as_ref(),
        )
        .with_config_path(args.config.clone());

        match command.execute(&mut env, &args)? {
            Some(output) => Ok(Some(format_output(&output, args.format)?)),
            None => Ok(None),
        }
    }
}

fn map_clap_error(err: clap::Error) -> CliError {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            CliError::Help {
                text: err.to_string().trim_end().to_string(),
                code: 0,
            }
        }
        _ => CliError::usage(
            err.to_string()
                .trim_start_matches("error: ")
                .trim_end()
                .to_string(),
        ),
    }
}
