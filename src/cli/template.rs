//! Template files: INI `key = value` lines with no section header, used to pre-fill
//! long flags (`--template`) and written back by `--export`.

use super::parse::{parse_bool, ArgValue, ParamKind, ParamSpec, ParsedArgs};
use crate::error::CliError;
use config::{Config, File, FileFormat};
use std::path::Path;
use tracing::debug;

const TEMPLATE_SECTION: &str = "settings";

/// Flags never written to an exported template.
const ALWAYS_EXCLUDED: [&str; 5] = ["config", "really", "format", "template", "demo"];

/// Parsed template: keys normalized to long-flag names, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    values: Vec<(String, String)>,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::local_io(path, e))?;
        Self::parse(&text).map_err(|e| match e {
            CliError::Usage(msg) => CliError::usage(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, CliError> {
        let ini = format!("[{}]\n{}", TEMPLATE_SECTION, text);
        let config = Config::builder()
            .add_source(File::from_str(&ini, FileFormat::Ini))
            .build()
            .map_err(|e| CliError::usage(format!("Invalid template: {}", e)))?;
        let table = match config.get_table(TEMPLATE_SECTION) {
            Ok(table) => table,
            // an empty template has no section at all
            Err(_) => return Ok(Self::default()),
        };

        let mut values = Vec::with_capacity(table.len());
        for (key, value) in table {
            let value = value
                .into_string()
                .map_err(|e| {
                    CliError::usage(format!("Invalid template value for {}: {}", key, e))
                })?;
            values.push((key.trim().replace('_', "-"), value.trim().to_string()));
        }
        values.sort();
        Ok(Self { values })
    }

    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Extend `argv` with `--key=value` for every template key that names a long
    /// flag of the command, is absent from `argv`, and has no truthy default.
    pub fn apply(&self, argv: &[String], params: &[ParamSpec]) -> Result<Vec<String>, CliError> {
        let mut injected = Vec::new();
        for (key, value) in &self.values {
            let Some(spec) = params.iter().find(|p| !p.positional && p.name == key.as_str()) else {
                debug!(key = %key, "Template key is not a flag of this command; ignoring");
                continue;
            };
            if spec.is_present_in(argv) || spec.has_truthy_default() {
                continue;
            }
            match spec.kind {
                ParamKind::Bool => {
                    if parse_bool(value)? {
                        injected.push(format!("--{}", spec.name));
                    }
                }
                _ if value.is_empty() => {}
                _ => injected.push(format!("--{}={}", spec.name, value)),
            }
        }

        // injected flags must stay ahead of a `--` separator
        let split = argv.iter().position(|t| t == "--").unwrap_or(argv.len());
        let mut out = argv[..split].to_vec();
        out.extend(injected);
        out.extend_from_slice(&argv[split..]);
        Ok(out)
    }
}

/// Write every set long-flag value as `key=value`, lists joined with `,`.
///
/// Positional arguments, global flags and `exclude` are skipped.
pub fn export_to_template(
    path: &Path,
    args: &ParsedArgs,
    params: &[ParamSpec],
    exclude: &[&str],
) -> Result<(), CliError> {
    let mut out = String::new();
    for (name, value) in args.values() {
        let is_flag = params.iter().any(|p| p.name == name && !p.positional);
        if !is_flag || !value.is_set() || ALWAYS_EXCLUDED.contains(&name) || exclude.contains(&name)
        {
            continue;
        }
        let rendered = match value {
            ArgValue::Text(s) => s.clone(),
            ArgValue::Int(n) => n.to_string(),
            ArgValue::Bool(b) => b.to_string(),
            ArgValue::List(items) => items.join(","),
        };
        out.push_str(&format!("{}={}\n", name, rendered));
    }
    std::fs::write(path, out).map_err(|e| CliError::local_io(path, e))
}
