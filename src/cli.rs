//! CLI domain: parse, route, help, output, and the per-invocation environment.
//! Resource commands live in `crate::commands`; this module only dispatches to them.

mod command;
mod environment;
mod help;
mod output;
mod parse;
mod prompt;
mod resolve;
mod route;
mod template;

pub use command::CliCommand;
pub use environment::Environment;
pub use help::{namespace_help, root_help};
pub use output::{error_line, map_error};
pub use parse::{
    global_args, parse_bool, ArgValue, ExclusiveGroup, GlobalArgs, ParamKind, ParamSpec,
    ParsedArgs, PrimaryParse,
};
pub use prompt::{confirm, no_going_back, ConsolePrompter, Prompter, ScriptedPrompter};
pub use resolve::{resolve_id, resolve_ids};
pub use route::{default_client_factory, ClientFactory, Dispatcher, Namespace, Registry};
pub use template::{export_to_template, Template};
