//! Help text for the resource list and for one namespace's actions.

use super::route::{Namespace, Registry};

const USAGE: &str = "\
usage: slcli <module> [<args>...]
       slcli help <module>
       slcli [-h | --help]";

const STANDARD_ARGUMENTS: &str = "\
Standard arguments:
  -C FILE, --config=FILE   Config file location [default: ~/.softlayer]
  --format=FORMAT          Output format: table, raw, json, python
                           [default: table on a terminal, raw otherwise]
  -y, --really             Confirm all prompt actions
  --template=FILE          INI file with default flag values
  -v, --verbose            Increase log verbosity (repeatable)
  --log-level=LEVEL        Log level (trace, debug, info, warn, error, off)
  --log-format=FORMAT      Log format (text, json)
  --demo                   Answer from built-in fixtures instead of the API
  -h, --help               Show this screen";

/// Resource list with one-line summaries.
pub fn root_help(registry: &Registry) -> String {
    let width = registry
        .namespaces()
        .iter()
        .map(|ns| ns.name.len())
        .max()
        .unwrap_or(0);
    let mut out = format!(
        "{}\n\nSoftLayer Command-line Client\n\nThe available modules are:\n",
        USAGE
    );
    for ns in registry.namespaces() {
        out.push_str(&format!("  {:<width$}  {}\n", ns.name, ns.summary, width = width));
    }
    out.push_str("\nSee 'slcli help <module>' for more information on a specific module.\n\n");
    out.push_str(STANDARD_ARGUMENTS);
    out
}

/// Action list for one namespace.
pub fn namespace_help(namespace: &Namespace) -> String {
    let mut out = format!(
        "usage: slcli {} [<command>] [<args>...] [options]\n\n{}\n",
        namespace.name, namespace.summary
    );
    if !namespace.aliases.is_empty() {
        out.push_str(&format!("\nAliases: {}\n", namespace.aliases.join(", ")));
    }

    let actions: Vec<(&str, &str)> = namespace
        .commands()
        .filter_map(|c| c.name().map(|name| (name, c.summary())))
        .collect();
    if !actions.is_empty() {
        let width = actions.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        out.push_str(&format!("\nThe available commands for {} are:\n", namespace.name));
        for (name, summary) in actions {
            out.push_str(&format!("  {:<width$}  {}\n", name, summary, width = width));
        }
    }
    out.push_str(&format!(
        "\nSee 'slcli {} <command> --help' for more information on a command.",
        namespace.name
    ));
    out
}
