//! `sshkey` actions.

use super::lookup;
use crate::cli::{resolve_id, CliCommand, Environment, ExclusiveGroup, ParamSpec, ParsedArgs};
use crate::error::CliError;
use crate::formatting::{KeyValueTable, Output, Table};
use crate::managers::SshKeyManager;
use serde_json::Value;
use std::path::Path;

const COLUMNS: [&str; 4] = ["id", "label", "fingerprint", "notes"];

fn resolve_key(mgr: &SshKeyManager<'_>, identifier: &str) -> Result<i64, CliError> {
    resolve_id(|id| mgr.resolve_ids(id), identifier, "SshKey")
}

pub struct List;

impl CliCommand for List {
    fn name(&self) -> Option<&'static str> {
        Some("list")
    }

    fn summary(&self) -> &'static str {
        "List SSH keys on your account"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::choice("sortby", &COLUMNS, "Column to sort by")]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let keys = SshKeyManager::new(client.as_ref()).list_keys()?;

        let mut table = Table::new(COLUMNS);
        table.set_sort_key(args.text("sortby").map(str::to_string));
        for key in &keys {
            table.add_row([
                Output::from(lookup(key, &["id"])),
                Output::from(lookup(key, &["label"])),
                Output::from(lookup(key, &["fingerprint"])),
                Output::from(lookup(key, &["notes"])),
            ])?;
        }
        Ok(Some(table.into()))
    }
}

pub struct Add;

impl CliCommand for Add {
    fn name(&self) -> Option<&'static str> {
        Some("add")
    }

    fn summary(&self) -> &'static str {
        "Add a new SSH key to your account"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("label", "Label for the new key"),
            ParamSpec::text("key", "The public SSH key").short('k'),
            ParamSpec::text("file", "Read the public key from this file").short('f'),
            ParamSpec::text("notes", "Extra notes for the key").short('n'),
        ]
    }

    fn exclusive_groups(&self) -> Vec<ExclusiveGroup> {
        vec![ExclusiveGroup::one_of("key-source", &["key", "file"])]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let key = match (args.text("key"), args.text("file")) {
            (Some(key), _) => key.to_string(),
            (None, Some(file)) => {
                let path = Path::new(file);
                std::fs::read_to_string(path)
                    .map_err(|e| CliError::local_io(path, e))?
                    .trim()
                    .to_string()
            }
            (None, None) => return Err(CliError::usage("One of --key or --file is required")),
        };

        let client = env.client();
        let created = SshKeyManager::new(client.as_ref()).add_key(
            &key,
            args.require_text("label")?,
            args.text("notes"),
        )?;
        let fingerprint = created
            .get("fingerprint")
            .and_then(Value::as_str)
            .unwrap_or("-");
        Ok(Some(Output::text(format!("SSH key added: {}", fingerprint))))
    }
}

pub struct Edit;

impl CliCommand for Edit {
    fn name(&self) -> Option<&'static str> {
        Some("edit")
    }

    fn summary(&self) -> &'static str {
        "Edit an SSH key's label or notes"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("identifier", "Key id or label"),
            ParamSpec::text("label", "New label").short('l'),
            ParamSpec::text("notes", "New notes").short('n'),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let mgr = SshKeyManager::new(client.as_ref());
        let key_id = resolve_key(&mgr, args.require_text("identifier")?)?;
        if !mgr.edit_key(key_id, args.text("label"), args.text("notes"))? {
            return Err(CliError::Aborted("Failed to edit SSH key".to_string()));
        }
        Ok(None)
    }
}

pub struct Remove;

impl CliCommand for Remove {
    fn name(&self) -> Option<&'static str> {
        Some("remove")
    }

    fn summary(&self) -> &'static str {
        "Permanently remove an SSH key"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::positional("identifier", "Key id or label")]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let mgr = SshKeyManager::new(client.as_ref());
        let key_id = resolve_key(&mgr, args.require_text("identifier")?)?;
        if !env.no_going_back(Some(&key_id.to_string()))? {
            return Err(CliError::aborted());
        }
        mgr.delete_key(key_id)?;
        Ok(None)
    }
}

pub struct Print;

impl CliCommand for Print {
    fn name(&self) -> Option<&'static str> {
        Some("print")
    }

    fn summary(&self) -> &'static str {
        "Print out an SSH key"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("identifier", "Key id or label"),
            ParamSpec::text("file", "Also write the public key to this file").short('f'),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let mgr = SshKeyManager::new(client.as_ref());
        let key_id = resolve_key(&mgr, args.require_text("identifier")?)?;
        let key = mgr.get_key(key_id)?;

        if let Some(file) = args.text("file") {
            let path = Path::new(file);
            let text = key.get("key").and_then(Value::as_str).unwrap_or_default();
            std::fs::write(path, text).map_err(|e| CliError::local_io(path, e))?;
        }

        let mut table = KeyValueTable::new();
        table
            .add("id", lookup(&key, &["id"]))
            .add("label", lookup(&key, &["label"]))
            .add("notes", lookup(&key, &["notes"]));
        Ok(Some(table.into()))
    }
}
