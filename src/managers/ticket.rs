//! Support tickets.

use super::ensure_accepted;
use crate::error::CliError;
use crate::transport::{ApiRequest, RemoteCall};
use serde_json::{json, Value};
use tracing::debug;

const LIST_MASK: &str =
    "id,title,assignedUser[firstName,lastName],createDate,lastEditDate,accountId,status";
const DETAIL_MASK: &str = concat!(
    "id,title,assignedUser[firstName,lastName],status,",
    "createDate,lastEditDate,updates[entry],updateCount"
);

pub struct TicketManager<'a> {
    client: &'a dyn RemoteCall,
}

impl<'a> TicketManager<'a> {
    pub fn new(client: &'a dyn RemoteCall) -> Self {
        Self { client }
    }

    /// Open and/or closed tickets; neither flag means both.
    pub fn list_tickets(&self, open: bool, closed: bool) -> Result<Vec<Value>, CliError> {
        let method = match (open, closed) {
            (true, false) => "getOpenTickets",
            (false, true) => "getClosedTickets",
            _ => "getTickets",
        };
        let tickets = self
            .client
            .call(&ApiRequest::new("Account", method).mask(LIST_MASK))?;
        Ok(tickets.as_array().cloned().unwrap_or_default())
    }

    pub fn list_subjects(&self) -> Result<Vec<Value>, CliError> {
        let subjects = self
            .client
            .call(&ApiRequest::new("Ticket_Subject", "getAllObjects"))?;
        Ok(subjects.as_array().cloned().unwrap_or_default())
    }

    pub fn get_ticket(&self, id: i64) -> Result<Value, CliError> {
        Ok(self
            .client
            .call(&ApiRequest::new("Ticket", "getObject").id(id).mask(DETAIL_MASK))?)
    }

    /// Opens a ticket assigned to the calling user.
    pub fn create_ticket(
        &self,
        title: &str,
        body: &str,
        subject_id: i64,
    ) -> Result<Value, CliError> {
        let user = self
            .client
            .call(&ApiRequest::new("Account", "getCurrentUser").mask("id"))?;
        let user_id = user
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| CliError::Internal("current user has no id".to_string()))?;
        let ticket = json!({
            "subjectId": subject_id,
            "assignedUserId": user_id,
            "title": title,
        });
        debug!(subject_id, "Creating ticket");
        Ok(self
            .client
            .call(&ApiRequest::new("Ticket", "createStandardTicket").arg(ticket).arg(body))?)
    }

    pub fn update_ticket(&self, id: i64, body: &str) -> Result<Value, CliError> {
        let request = ApiRequest::new("Ticket", "addUpdate").id(id).arg(json!({"entry": body}));
        ensure_accepted(self.client.call(&request)?, &format!("Updating ticket {}", id))
    }
}
