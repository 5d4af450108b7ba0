//! Resource managers: thin wrappers that turn a command's intent into remote
//! calls. Commands hold a manager for the duration of one invocation.

use crate::error::{CliError, RemoteError};
use serde_json::{json, Map, Value};

pub mod search;
pub mod sshkey;
pub mod ticket;
pub mod vs;

pub use search::SearchManager;
pub use sshkey::SshKeyManager;
pub use ticket::TicketManager;
pub use vs::{CreateOptions, ListFilters, VsManager};

/// Operator prefixes the API understands in an object filter.
const KNOWN_OPERATIONS: [&str; 10] = ["<=", ">=", "<", ">", "~", "!~", "*=", "^=", "$=", "_="];

/// Build an object-filter leaf from user text.
///
/// Integers compare exactly; a known operator prefix is kept; `*` wildcards map to
/// contains / ends-with / begins-with; anything else is a case-insensitive match.
pub fn query_filter(query: &str) -> Value {
    let query = query.trim();
    if let Ok(n) = query.parse::<i64>() {
        return json!({ "operation": n });
    }
    for op in KNOWN_OPERATIONS {
        if let Some(rest) = query.strip_prefix(op) {
            return json!({ "operation": format!("{} {}", op, rest.trim()) });
        }
    }
    let operation = match (query.starts_with('*'), query.ends_with('*')) {
        (true, true) if query.len() > 1 => format!("*= {}", query.trim_matches('*')),
        (true, _) => format!("$= {}", query.trim_matches('*')),
        (false, true) => format!("^= {}", query.trim_matches('*')),
        (false, false) => format!("_= {}", query),
    };
    json!({ "operation": operation })
}

/// Treat a `false` or null reply as a failed operation.
pub fn ensure_accepted(result: Value, action: &str) -> Result<Value, CliError> {
    match result {
        Value::Null | Value::Bool(false) => {
            Err(RemoteError::rejected(format!("{} was not accepted", action)).into())
        }
        other => Ok(other),
    }
}

/// Set `leaf` at `path` inside `filter`, creating intermediate objects.
pub fn set_filter_path(filter: &mut Map<String, Value>, path: &[&str], leaf: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = filter;
    for key in parents {
        let entry = node
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        node = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    node.insert(last.to_string(), leaf);
}

/// Ids of a JSON array of objects.
pub(crate) fn ids_of(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_i64))
                .collect()
        })
        .unwrap_or_default()
}
