//! `ticket` actions.

use super::{lookup, lookup_str};
use crate::cli::{resolve_id, resolve_ids, CliCommand, Environment, ParamSpec, ParsedArgs};
use crate::error::CliError;
use crate::formatting::{blank, date, KeyValueTable, Output, Table};
use crate::managers::TicketManager;
use serde_json::Value;

/// Marker line placed in the editor; everything from it on is dropped.
const TEMPLATE_MSG: &str = "***** Softlayer Ticket Content ******";

fn ticket_id(identifier: &str) -> Result<i64, CliError> {
    resolve_id(|id| resolve_ids(id, &[]), identifier, "ticket")
}

/// `First Last` of the assigned user, or blank.
fn assigned_user(ticket: &Value) -> Output {
    let first = lookup_str(ticket, &["assignedUser", "firstName"]);
    let last = lookup_str(ticket, &["assignedUser", "lastName"]);
    match (first, last) {
        (None, None) => blank(),
        (first, last) => Output::text(
            [first, last]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

/// Body from the flag, or from the editor when the flag is absent.
fn ticket_body(env: &Environment<'_>, args: &ParsedArgs) -> Result<String, CliError> {
    if let Some(body) = args.text("body") {
        return Ok(body.to_string());
    }
    let edited = env.edit(&format!("\n\n{}", TEMPLATE_MSG))?;
    let body = edited
        .split(TEMPLATE_MSG)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    if body.is_empty() {
        return Err(CliError::Aborted("Ticket body is empty. Aborted.".to_string()));
    }
    Ok(body)
}

fn ticket_detail(ticket: &Value, update_count: usize) -> KeyValueTable {
    let mut table = KeyValueTable::new();
    table
        .add("id", lookup(ticket, &["id"]))
        .add("title", lookup(ticket, &["title"]))
        .add("status", lookup(ticket, &["status", "name"]))
        .add("user", assigned_user(ticket))
        .add("created", date(lookup_str(ticket, &["createDate"])))
        .add("edited", date(lookup_str(ticket, &["lastEditDate"])));

    let updates = lookup(ticket, &["updates"])
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let skip = updates.len().saturating_sub(update_count);
    for (i, update) in updates.iter().skip(skip).enumerate() {
        table.add(format!("Update {}", i + 1), lookup(update, &["entry"]));
    }
    table
}

pub struct List;

impl CliCommand for List {
    fn name(&self) -> Option<&'static str> {
        Some("list")
    }

    fn summary(&self) -> &'static str {
        "List tickets"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::choice("status", &["open", "closed"], "Only show tickets with this status")]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let status = args.text("status");
        let client = env.client();
        let tickets = TicketManager::new(client.as_ref())
            .list_tickets(status == Some("open"), status == Some("closed"))?;

        let mut table = Table::new([
            "id",
            "assigned user",
            "title",
            "creation date",
            "last edit date",
        ]);
        for ticket in &tickets {
            table.add_row([
                Output::from(lookup(ticket, &["id"])),
                assigned_user(ticket),
                Output::from(lookup(ticket, &["title"])),
                date(lookup_str(ticket, &["createDate"])),
                date(lookup_str(ticket, &["lastEditDate"])),
            ])?;
        }
        Ok(Some(table.into()))
    }
}

pub struct Detail;

impl CliCommand for Detail {
    fn name(&self) -> Option<&'static str> {
        Some("detail")
    }

    fn summary(&self) -> &'static str {
        "Get details for a ticket"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("identifier", "Ticket id"),
            ParamSpec::int("update-count", "Number of most recent updates to show").default("1"),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let id = ticket_id(args.require_text("identifier")?)?;
        let count = args.int("update-count").unwrap_or(1).max(0) as usize;
        let client = env.client();
        let ticket = TicketManager::new(client.as_ref()).get_ticket(id)?;
        Ok(Some(ticket_detail(&ticket, count).into()))
    }
}

pub struct Create;

impl CliCommand for Create {
    fn name(&self) -> Option<&'static str> {
        Some("create")
    }

    fn summary(&self) -> &'static str {
        "Create a support ticket"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::text("title", "The title of the ticket").required(),
            ParamSpec::int("subject-id", "Subject id; see 'slcli ticket subjects'").required(),
            ParamSpec::text("body", "The ticket body; opens $EDITOR when omitted"),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let body = ticket_body(env, args)?;
        let client = env.client();
        let mgr = TicketManager::new(client.as_ref());
        let created = mgr.create_ticket(
            args.require_text("title")?,
            &body,
            args.require_int("subject-id")?,
        )?;
        let id = created
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| CliError::Internal("created ticket has no id".to_string()))?;
        let ticket = mgr.get_ticket(id)?;
        Ok(Some(ticket_detail(&ticket, 1).into()))
    }
}

pub struct Update;

impl CliCommand for Update {
    fn name(&self) -> Option<&'static str> {
        Some("update")
    }

    fn summary(&self) -> &'static str {
        "Add an update to a ticket"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("identifier", "Ticket id"),
            ParamSpec::text("body", "Text to add; opens $EDITOR when omitted"),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let id = ticket_id(args.require_text("identifier")?)?;
        let body = ticket_body(env, args)?;
        let client = env.client();
        TicketManager::new(client.as_ref()).update_ticket(id, &body)?;
        Ok(Some(Output::text("Ticket Updated!")))
    }
}

pub struct Subjects;

impl CliCommand for Subjects {
    fn name(&self) -> Option<&'static str> {
        Some("subjects")
    }

    fn summary(&self) -> &'static str {
        "List subject ids for ticket creation"
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        _args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let subjects = TicketManager::new(client.as_ref()).list_subjects()?;
        let mut table = Table::new(["id", "subject"]);
        for subject in &subjects {
            table.add_row([
                Output::from(lookup(subject, &["id"])),
                Output::from(lookup(subject, &["name"])),
            ])?;
        }
        Ok(Some(table.into()))
    }
}
