//! Account-wide search.

use crate::error::CliError;
use crate::transport::{ApiRequest, RemoteCall};
use serde_json::Value;

pub struct SearchManager<'a> {
    client: &'a dyn RemoteCall,
}

impl<'a> SearchManager<'a> {
    pub fn new(client: &'a dyn RemoteCall) -> Self {
        Self { client }
    }

    /// Run `query`, optionally restricted to object types.
    pub fn search(&self, query: &str, types: &[String]) -> Result<Vec<Value>, CliError> {
        let query = if types.is_empty() {
            query.to_string()
        } else {
            format!("{} _objectType:{}", query, types.join(","))
        };
        let results = self.client.call(&ApiRequest::new("Search", "search").arg(query))?;
        Ok(results.as_array().cloned().unwrap_or_default())
    }

    /// Searchable object types and their properties.
    pub fn get_object_types(&self) -> Result<Vec<Value>, CliError> {
        let types = self.client.call(&ApiRequest::new("Search", "getObjectTypes"))?;
        Ok(types.as_array().cloned().unwrap_or_default())
    }
}
