//! `search`: the namespace's only action is its default one.

use super::{lookup, lookup_str};
use crate::cli::{CliCommand, Environment, ParamSpec, ParsedArgs};
use crate::error::CliError;
use crate::formatting::{blank, Output, Table};
use crate::managers::SearchManager;
use crate::transport::SERVICE_PREFIX;
use serde_json::Value;

/// Fields tried in order for a result's display name.
const NAME_FIELDS: [&str; 4] = ["fullyQualifiedDomainName", "hostname", "name", "label"];

pub struct Search;

impl CliCommand for Search {
    fn name(&self) -> Option<&'static str> {
        None
    }

    fn summary(&self) -> &'static str {
        "Search for objects on the account"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("phrase", "Search phrase").optional(),
            ParamSpec::text("query", "Search query; prompted for when omitted").short('s'),
            ParamSpec::repeated("type", "Restrict to these object types; repeatable"),
            ParamSpec::flag("types", "List searchable object types and their properties"),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        if args.flag("types") {
            let client = env.client();
            let types = SearchManager::new(client.as_ref()).get_object_types()?;
            return Ok(Some(types_table(&types)?.into()));
        }

        let query = match args.text("query").or_else(|| args.text("phrase")) {
            Some(query) => query.to_string(),
            None => env.prompt("Search query: ")?,
        };
        let query = query.trim();
        if query.is_empty() {
            return Err(CliError::usage("A search query is required"));
        }

        let client = env.client();
        let results = SearchManager::new(client.as_ref()).search(query, args.list("type"))?;
        let mut table = Table::new(["id", "type", "name", "score"]);
        for result in &results {
            let resource_type = lookup_str(result, &["resourceType"])
                .map(|t| t.trim_start_matches(SERVICE_PREFIX).to_string());
            table.add_row([
                Output::from(lookup(result, &["resource", "id"])),
                Output::from(resource_type),
                display_name(result),
                Output::from(lookup(result, &["relevanceScore"])),
            ])?;
        }
        Ok(Some(table.into()))
    }
}

fn display_name(result: &Value) -> Output {
    NAME_FIELDS
        .iter()
        .find_map(|field| lookup_str(result, &["resource", *field]))
        .map(Output::from)
        .unwrap_or_else(blank)
}

/// One row per type; properties as a nested table.
fn types_table(types: &[Value]) -> Result<Table, CliError> {
    let mut table = Table::new(["Name", "Properties"]);
    for object_type in types {
        let mut properties = Table::new(["Property", "Sortable"]);
        let props = lookup(object_type, &["properties"])
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for prop in props {
            properties.add_row([
                Output::from(lookup(prop, &["name"])),
                Output::from(lookup(prop, &["sortableFlag"])),
            ])?;
        }
        table.add_row([Output::from(lookup(object_type, &["name"])), properties.into()])?;
    }
    Ok(table)
}
