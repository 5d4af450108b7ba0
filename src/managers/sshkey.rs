//! SSH keys stored on the account.

use super::ensure_accepted;
use crate::cli::resolve_ids;
use crate::error::CliError;
use crate::transport::{ApiRequest, RemoteCall};
use serde_json::{json, Map, Value};
use tracing::debug;

const SERVICE: &str = "Security_Ssh_Key";

pub struct SshKeyManager<'a> {
    client: &'a dyn RemoteCall,
}

impl<'a> SshKeyManager<'a> {
    pub fn new(client: &'a dyn RemoteCall) -> Self {
        Self { client }
    }

    pub fn list_keys(&self) -> Result<Vec<Value>, CliError> {
        let keys = self.client.call(&ApiRequest::new("Account", "getSshKeys"))?;
        Ok(keys.as_array().cloned().unwrap_or_default())
    }

    pub fn get_key(&self, id: i64) -> Result<Value, CliError> {
        Ok(self.client.call(&ApiRequest::new(SERVICE, "getObject").id(id))?)
    }

    pub fn add_key(&self, key: &str, label: &str, notes: Option<&str>) -> Result<Value, CliError> {
        let template = json!({ "key": key, "label": label, "notes": notes });
        debug!(label, "Adding SSH key");
        Ok(self
            .client
            .call(&ApiRequest::new(SERVICE, "createObject").arg(template))?)
    }

    /// Only the fields given are sent. Returns whether the API reported success.
    pub fn edit_key(
        &self,
        id: i64,
        label: Option<&str>,
        notes: Option<&str>,
    ) -> Result<bool, CliError> {
        let mut data = Map::new();
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            data.insert("label".into(), label.into());
        }
        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            data.insert("notes".into(), notes.into());
        }
        let result = self
            .client
            .call(&ApiRequest::new(SERVICE, "editObject").id(id).arg(Value::Object(data)))?;
        Ok(result.as_bool().unwrap_or(false))
    }

    pub fn delete_key(&self, id: i64) -> Result<(), CliError> {
        let result = self.client.call(&ApiRequest::new(SERVICE, "deleteObject").id(id))?;
        ensure_accepted(result, &format!("Removing SSH key {}", id))?;
        Ok(())
    }

    /// Candidate ids for an id or key label.
    pub fn resolve_ids(&self, identifier: &str) -> Result<Vec<i64>, CliError> {
        resolve_ids(identifier, &[&|label: &str| self.ids_from_label(label)])
    }

    fn ids_from_label(&self, label: &str) -> Result<Vec<i64>, CliError> {
        Ok(self
            .list_keys()?
            .iter()
            .filter(|key| key.get("label").and_then(Value::as_str) == Some(label))
            .filter_map(|key| key.get("id").and_then(Value::as_i64))
            .collect())
    }
}
