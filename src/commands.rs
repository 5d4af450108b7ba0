//! Resource commands: the static registration table and the shared helpers
//! their bodies use.

use crate::cli::{Namespace, Registry};
use serde_json::Value;

mod configure;
mod search;
mod sshkey;
mod ticket;
mod vs;

/// Every namespace the client knows about.
pub fn registry() -> Registry {
    Registry::new(vec![
        Namespace::new("config", "View and edit client configuration")
            .command(configure::Setup)
            .command(configure::Show),
        Namespace::new("search", "Search for objects on the account").command(search::Search),
        Namespace::new("sshkey", "Manage SSH keys on your account")
            .command(sshkey::List)
            .command(sshkey::Add)
            .command(sshkey::Edit)
            .command(sshkey::Remove)
            .command(sshkey::Print),
        Namespace::new("ticket", "Manage account tickets")
            .command(ticket::List)
            .command(ticket::Detail)
            .command(ticket::Create)
            .command(ticket::Update)
            .command(ticket::Subjects),
        Namespace::new("vs", "Manage, delete and order virtual servers")
            .aliases(&["vm", "cci"])
            .command(vs::List)
            .command(vs::Detail)
            .command(vs::Create)
            .command(vs::Cancel),
    ])
}

/// Walk `path` through nested objects; `null` counts as missing.
pub(crate) fn lookup<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter()
        .try_fold(value, |node, key| node.get(*key))
        .filter(|found| !found.is_null())
}

pub(crate) fn lookup_str<'v>(value: &'v Value, path: &[&str]) -> Option<&'v str> {
    lookup(value, path).and_then(Value::as_str)
}
