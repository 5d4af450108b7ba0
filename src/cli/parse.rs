//! CLI parse: parameter declarations, global flags, the raw-token scan that finds
//! resource and action, and the typed values a command body reads.

use crate::error::CliError;
use crate::formatting::OutputFormat;
use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Value shape of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Int,
    /// Presence flag, no value
    Bool,
    Choice(&'static [&'static str]),
    /// May be given several times; a value may also hold a comma separated list
    Repeated,
}

/// One declared flag or positional argument.
///
/// `name` is the long flag without dashes (`subject-id` → `--subject-id`) and the
/// key under which the parsed value is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub help: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
    pub short: Option<char>,
    pub positional: bool,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamKind, help: &'static str) -> Self {
        Self {
            name,
            kind,
            help,
            required: false,
            default: None,
            short: None,
            positional: false,
        }
    }

    pub fn text(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Text, help)
    }

    pub fn int(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Int, help)
    }

    pub fn flag(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Bool, help)
    }

    pub fn choice(
        name: &'static str,
        choices: &'static [&'static str],
        help: &'static str,
    ) -> Self {
        Self::new(name, ParamKind::Choice(choices), help)
    }

    pub fn repeated(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Repeated, help)
    }

    /// Required positional text argument.
    pub fn positional(name: &'static str, help: &'static str) -> Self {
        Self {
            positional: true,
            required: true,
            ..Self::new(name, ParamKind::Text, help)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// A non-empty declared default; such flags are never filled from a template.
    pub fn has_truthy_default(&self) -> bool {
        self.default.map_or(false, |d| !d.is_empty())
    }

    /// Whether the flag appears in `argv`, long or short form.
    pub fn is_present_in(&self, argv: &[String]) -> bool {
        let long = format!("--{}", self.name);
        let long_eq = format!("{}=", long);
        argv.iter().take_while(|t| t.as_str() != "--").any(|token| {
            if token == &long || token.starts_with(&long_eq) {
                return true;
            }
            match self.short {
                Some(short) => {
                    let mut chars = token.chars();
                    chars.next() == Some('-') && chars.next() == Some(short)
                }
                None => false,
            }
        })
    }

    pub(crate) fn to_arg(&self, index: usize) -> Arg {
        let mut arg = Arg::new(self.name).help(self.help).required(self.required);
        if self.positional {
            arg = arg.index(index);
        } else {
            arg = arg.long(self.name);
            if let Some(short) = self.short {
                arg = arg.short(short);
            }
        }
        arg = match self.kind {
            ParamKind::Text => arg.action(ArgAction::Set),
            ParamKind::Int => arg.action(ArgAction::Set).value_parser(value_parser!(i64)),
            ParamKind::Bool => arg.action(ArgAction::SetTrue),
            ParamKind::Choice(choices) => arg
                .action(ArgAction::Set)
                .value_parser(PossibleValuesParser::new(choices.iter().copied())),
            ParamKind::Repeated => arg.action(ArgAction::Append).value_delimiter(','),
        };
        match (self.default, self.kind) {
            (Some(default), kind) if kind != ParamKind::Bool => arg.default_value(default),
            _ => arg,
        }
    }
}

/// Flags of which at most one (or, when `required`, exactly one) may be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveGroup {
    pub name: &'static str,
    pub members: &'static [&'static str],
    pub required: bool,
}

impl ExclusiveGroup {
    pub fn one_of(name: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            name,
            members,
            required: true,
        }
    }

    pub fn at_most_one(name: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            name,
            members,
            required: false,
        }
    }

    pub(crate) fn to_group(&self) -> ArgGroup {
        ArgGroup::new(self.name)
            .args(self.members.iter().copied())
            .required(self.required)
            .multiple(false)
    }
}

/// Parsed value of one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl ArgValue {
    /// Whether the value counts as "given": non-empty text or list, true flag.
    pub fn is_set(&self) -> bool {
        match self {
            ArgValue::Text(s) => !s.is_empty(),
            ArgValue::Int(_) => true,
            ArgValue::Bool(b) => *b,
            ArgValue::List(items) => !items.is_empty(),
        }
    }
}

/// Typed arguments handed to a command body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    values: BTreeMap<String, ArgValue>,
    pub really: bool,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub demo: bool,
}

impl Default for ParsedArgs {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            really: false,
            format: OutputFormat::Table,
            config: None,
            template: None,
            demo: false,
        }
    }
}

impl ParsedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and by commands that re-dispatch.
    pub fn with(mut self, name: &str, value: ArgValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub(crate) fn from_matches(
        matches: &ArgMatches,
        params: &[ParamSpec],
        default_format: OutputFormat,
    ) -> Result<Self, CliError> {
        let mut values = BTreeMap::new();
        for spec in params {
            let value = match spec.kind {
                ParamKind::Bool => Some(ArgValue::Bool(matches.get_flag(spec.name))),
                ParamKind::Int => matches.get_one::<i64>(spec.name).copied().map(ArgValue::Int),
                ParamKind::Text | ParamKind::Choice(_) => matches
                    .get_one::<String>(spec.name)
                    .cloned()
                    .map(ArgValue::Text),
                ParamKind::Repeated => matches
                    .get_many::<String>(spec.name)
                    .map(|items| ArgValue::List(items.cloned().collect())),
            };
            if let Some(value) = value {
                values.insert(spec.name.to_string(), value);
            }
        }

        let format = match matches.get_one::<String>("format") {
            Some(raw) => raw.parse()?,
            None => default_format,
        };

        Ok(Self {
            values,
            really: matches.get_flag("really"),
            format,
            config: matches.get_one::<PathBuf>("config").cloned(),
            template: matches.get_one::<PathBuf>("template").cloned(),
            demo: matches.get_flag("demo"),
        })
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Bool(true)))
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ArgValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn require_text(&self, name: &str) -> Result<&str, CliError> {
        self.text(name)
            .ok_or_else(|| CliError::usage(format!("Missing required argument: {}", name)))
    }

    pub fn require_int(&self, name: &str) -> Result<i64, CliError> {
        self.int(name)
            .ok_or_else(|| CliError::usage(format!("Missing required argument: --{}", name)))
    }

    /// All parsed command parameters in name order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Canonical boolean rule for text-supplied flags.
pub fn parse_bool(value: &str) -> Result<bool, CliError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" | "" => Ok(false),
        other => Err(CliError::usage(format!("Invalid boolean value: '{}'", other))),
    }
}

/// Flags accepted by every command.
pub fn global_args() -> Vec<Arg> {
    vec![
        Arg::new("format")
            .long("format")
            .value_parser(PossibleValuesParser::new(OutputFormat::ALL))
            .help("Output format [default: table on a terminal, raw otherwise]"),
        Arg::new("config")
            .long("config")
            .short('C')
            .value_parser(value_parser!(PathBuf))
            .help("Config file location [default: ~/.softlayer]"),
        Arg::new("really")
            .long("really")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Confirm all prompt actions"),
        Arg::new("template")
            .long("template")
            .value_parser(value_parser!(PathBuf))
            .help("INI file with default flag values"),
        Arg::new("verbose")
            .long("verbose")
            .short('v')
            .action(ArgAction::Count)
            .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        Arg::new("log-level")
            .long("log-level")
            .help("Log level (trace, debug, info, warn, error, off)"),
        Arg::new("log-format")
            .long("log-format")
            .value_parser(["text", "json"])
            .help("Log format (text, json)"),
        Arg::new("demo")
            .long("demo")
            .action(ArgAction::SetTrue)
            .help("Answer from built-in fixtures instead of the API"),
    ]
}

/// Build the per-invocation clap command: global flags plus the command's own.
pub(crate) fn build_command(
    bin_name: String,
    about: &'static str,
    params: &[ParamSpec],
    groups: &[ExclusiveGroup],
) -> Command {
    let mut command = Command::new("slcli")
        .bin_name(bin_name)
        .about(about)
        .disable_version_flag(true)
        .args(global_args());
    let mut index = 0;
    for spec in params {
        if spec.positional {
            index += 1;
        }
        command = command.arg(spec.to_arg(index));
    }
    for group in groups {
        command = command.group(group.to_group());
    }
    command
}

/// Global flags as seen by a lenient scan of the raw tokens, before any command is
/// known. Used to set up logging and to locate resource and action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    pub format: Option<String>,
    pub config: Option<PathBuf>,
    pub really: bool,
    pub template: Option<PathBuf>,
    pub verbose: u8,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub demo: bool,
    pub help: bool,
}

/// Result of the primary parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryParse {
    pub globals: GlobalArgs,
    /// Indices of positional tokens, in order
    pub positionals: Vec<usize>,
}

impl PrimaryParse {
    /// Scan tokens; global flags and their values are skipped.
    pub fn scan(tokens: &[String]) -> Self {
        let mut globals = GlobalArgs::default();
        let mut positionals = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = tokens[i].as_str();
            if token == "--" {
                positionals.extend(i + 1..tokens.len());
                break;
            }
            if let Some(long) = token.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (long, None),
                };
                let mut take_value = || match inline.clone() {
                    Some(value) => Some(value),
                    None => {
                        i += 1;
                        tokens.get(i).cloned()
                    }
                };
                match name {
                    "format" => globals.format = take_value(),
                    "config" => globals.config = take_value().map(PathBuf::from),
                    "template" => globals.template = take_value().map(PathBuf::from),
                    "log-level" => globals.log_level = take_value(),
                    "log-format" => globals.log_format = take_value(),
                    "really" => globals.really = true,
                    "verbose" => globals.verbose = globals.verbose.saturating_add(1),
                    "demo" => globals.demo = true,
                    "help" => globals.help = true,
                    _ => {}
                }
            } else if let Some(short) = token.strip_prefix('-').filter(|s| !s.is_empty()) {
                if let Some(rest) = short.strip_prefix('C') {
                    globals.config = if rest.is_empty() {
                        i += 1;
                        tokens.get(i).map(PathBuf::from)
                    } else {
                        Some(PathBuf::from(rest.trim_start_matches('=')))
                    };
                } else if short.chars().all(|c| c == 'v') {
                    let count = u8::try_from(short.len()).unwrap_or(u8::MAX);
                    globals.verbose = globals.verbose.saturating_add(count);
                } else if short == "y" {
                    globals.really = true;
                } else if short == "h" {
                    globals.help = true;
                }
            } else {
                positionals.push(i);
            }
            i += 1;
        }

        Self {
            globals,
            positionals,
        }
    }

    pub fn positional<'a>(&self, tokens: &'a [String], n: usize) -> Option<&'a str> {
        self.positionals.get(n).map(|&i| tokens[i].as_str())
    }
}
