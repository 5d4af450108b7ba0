//! slcli CLI Binary
//!
//! Entry point: set up logging, dispatch one command, print its output and turn
//! any failure into a message on stderr and an exit code.

use slcli::cli::{error_line, Dispatcher, GlobalArgs, PrimaryParse};
use slcli::commands::registry;
use slcli::error::CliError;
use slcli::formatting::Rendered;
use slcli::logging::{init_logging, level_for_verbosity, LoggingConfig};
use std::io::IsTerminal;
use std::process;
use tracing::{debug, error};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let globals = PrimaryParse::scan(&args).globals;

    let logging_config = build_logging_config(&globals);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("{}", error_line(&e, std::io::stderr().is_terminal()));
        process::exit(e.exit_code());
    }

    debug!("slcli starting");

    let mut dispatcher = Dispatcher::new(registry());
    match dispatcher.run(&args) {
        Ok(Some(rendered)) => print_rendered(&rendered),
        Ok(None) => {}
        Err(CliError::Help { text, code }) => {
            println!("{}", text);
            process::exit(code);
        }
        Err(e) => {
            error!(exit_code = e.exit_code(), "Command failed: {}", e);
            eprintln!("{}", error_line(&e, std::io::stderr().is_terminal()));
            process::exit(e.exit_code());
        }
    }
}

fn print_rendered(rendered: &Rendered) {
    match rendered {
        Rendered::Text(text) if text.is_empty() => {}
        Rendered::Text(text) => println!("{}", text),
        Rendered::Native(value) => println!("{:#}", value),
    }
}

/// Logging config from the global flags.
/// Precedence: `--log-level` over `-v`, both over `SLCLI_LOG` and the default.
fn build_logging_config(globals: &GlobalArgs) -> LoggingConfig {
    let mut config = LoggingConfig::default();
    if let Some(level) = level_for_verbosity(globals.verbose) {
        config.level = level.to_string();
    }
    if let Some(ref level) = globals.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = globals.log_format {
        config.format = format.clone();
    }
    config.color = std::io::stderr().is_terminal();
    config
}
