//! Identifier resolution: turn a user-supplied name, IP or id into one object id.

use crate::error::CliError;

/// Resolve `identifier` through `resolver`; exactly one match is required.
pub fn resolve_id<F>(resolver: F, identifier: &str, name: &str) -> Result<i64, CliError>
where
    F: FnOnce(&str) -> Result<Vec<i64>, CliError>,
{
    let ids = resolver(identifier)?;
    match ids.as_slice() {
        [] => Err(CliError::Resolution(format!(
            "Unable to find {} '{}'",
            name, identifier
        ))),
        [id] => Ok(*id),
        many => Err(CliError::Resolution(format!(
            "Multiple {} found for '{}': {}",
            name,
            identifier,
            many.iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Candidate ids for `identifier`.
///
/// A numeric identifier is its own id. Otherwise resolvers run in order and the
/// first non-empty result wins.
pub fn resolve_ids(
    identifier: &str,
    resolvers: &[&dyn Fn(&str) -> Result<Vec<i64>, CliError>],
) -> Result<Vec<i64>, CliError> {
    if let Ok(id) = identifier.trim().parse::<i64>() {
        return Ok(vec![id]);
    }
    for resolver in resolvers {
        let ids = resolver(identifier)?;
        if !ids.is_empty() {
            return Ok(ids);
        }
    }
    Ok(Vec::new())
}
