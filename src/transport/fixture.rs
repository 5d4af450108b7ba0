//! Canned-response transport. Backs `--demo` and the test suites.

use super::{ApiRequest, RemoteCall};
use crate::error::RemoteError;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Answers `(service, method)` pairs from a table and records every request.
#[derive(Debug, Default)]
pub struct FixtureTransport {
    responses: HashMap<(String, String), Result<Value, RemoteError>>,
    calls: RefCell<Vec<ApiRequest>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response. `service` may omit the `SoftLayer_` prefix.
    pub fn with_response(mut self, service: &str, method: &str, response: Value) -> Self {
        self.responses.insert(key(service, method), Ok(response));
        self
    }

    pub fn with_fault(mut self, service: &str, method: &str, fault: RemoteError) -> Self {
        self.responses.insert(key(service, method), Err(fault));
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Built-in data for `--demo` runs.
    pub fn demo() -> Self {
        Self::new()
            .with_response(
                "Account",
                "getSshKeys",
                json!([
                    {"id": 100, "label": "laptop", "fingerprint": "aa:bb:cc", "notes": "work"},
                    {"id": 101, "label": "ci", "fingerprint": "dd:ee:ff"}
                ]),
            )
            .with_response(
                "Security_Ssh_Key",
                "getObject",
                json!({"id": 100, "label": "laptop", "fingerprint": "aa:bb:cc",
                       "key": "ssh-rsa AAAAB3Nza demo@laptop", "notes": "work"}),
            )
            .with_response(
                "Security_Ssh_Key",
                "createObject",
                json!({"id": 102, "fingerprint": "12:34"}),
            )
            .with_response("Security_Ssh_Key", "editObject", json!(true))
            .with_response("Security_Ssh_Key", "deleteObject", json!(true))
            .with_response(
                "Account",
                "getVirtualGuests",
                json!([
                    {"id": 1001, "hostname": "web1", "domain": "example.com",
                     "fullyQualifiedDomainName": "web1.example.com",
                     "primaryIpAddress": "169.45.1.10", "primaryBackendIpAddress": "10.0.0.10",
                     "maxCpu": 2, "maxMemory": 4096, "hourlyBillingFlag": true,
                     "datacenter": {"name": "dal10"}, "activeTransaction": null},
                    {"id": 1002, "hostname": "db1", "domain": "example.com",
                     "fullyQualifiedDomainName": "db1.example.com",
                     "primaryIpAddress": "169.45.1.11", "primaryBackendIpAddress": "10.0.0.11",
                     "maxCpu": 8, "maxMemory": 32768, "hourlyBillingFlag": false,
                     "datacenter": {"name": "wdc07"},
                     "activeTransaction": {"transactionStatus": {
                         "name": "RECLAIM_WAIT", "friendlyName": "Reclaim Wait"}}}
                ]),
            )
            .with_response(
                "Virtual_Guest",
                "getObject",
                json!({"id": 1001, "hostname": "web1", "domain": "example.com",
                       "fullyQualifiedDomainName": "web1.example.com", "status": {"name": "Active"},
                       "powerState": {"name": "Running"}, "datacenter": {"name": "dal10"},
                       "maxCpu": 2, "maxMemory": 4096,
                       "primaryIpAddress": "169.45.1.10", "primaryBackendIpAddress": "10.0.0.10",
                       "hourlyBillingFlag": true, "createDate": "2024-01-15T10:00:00-06:00",
                       "operatingSystem": {"softwareLicense": {"softwareDescription": {
                           "name": "Ubuntu", "version": "22.04"}}},
                       "tagReferences": [{"tag": {"name": "prod"}}, {"tag": {"name": "web"}}],
                       "activeTransaction": null}),
            )
            .with_response(
                "Account",
                "getHourlyVirtualGuests",
                json!([{"id": 1001, "hostname": "web1", "domain": "example.com",
                        "fullyQualifiedDomainName": "web1.example.com",
                        "primaryIpAddress": "169.45.1.10", "primaryBackendIpAddress": "10.0.0.10",
                        "maxCpu": 2, "maxMemory": 4096, "hourlyBillingFlag": true,
                        "datacenter": {"name": "dal10"}, "activeTransaction": null}]),
            )
            .with_response(
                "Account",
                "getMonthlyVirtualGuests",
                json!([{"id": 1002, "hostname": "db1", "domain": "example.com",
                        "fullyQualifiedDomainName": "db1.example.com",
                        "primaryIpAddress": "169.45.1.11", "primaryBackendIpAddress": "10.0.0.11",
                        "maxCpu": 8, "maxMemory": 32768, "hourlyBillingFlag": false,
                        "datacenter": {"name": "wdc07"}, "activeTransaction": null}]),
            )
            .with_response("Virtual_Guest", "deleteObject", json!(true))
            .with_response(
                "Virtual_Guest",
                "generateOrderTemplate",
                json!({"prices": [
                    {"item": {"description": "2 x 2.0 GHz Cores"},
                     "hourlyRecurringFee": "0.05", "recurringFee": "30.00"},
                    {"item": {"description": "4 GB"},
                     "hourlyRecurringFee": "0.03", "recurringFee": "20.00"}
                ]}),
            )
            .with_response(
                "Virtual_Guest",
                "createObject",
                json!({"id": 1003, "hostname": "new", "domain": "example.com",
                       "createDate": "2024-02-01T12:00:00-06:00", "globalIdentifier": "1a2b-3c4d"}),
            )
            .with_response(
                "Account",
                "getOpenTickets",
                json!([{"id": 500, "title": "Disk alert",
                        "createDate": "2024-03-01T08:00:00-06:00",
                        "lastEditDate": "2024-03-02T09:30:00-06:00",
                        "assignedUser": {"firstName": "Sam", "lastName": "Lee"},
                        "status": {"name": "Open"}}]),
            )
            .with_response(
                "Account",
                "getClosedTickets",
                json!([{"id": 480, "title": "DNS question",
                        "createDate": "2024-01-10T08:00:00-06:00",
                        "lastEditDate": "2024-01-11T12:00:00-06:00", "assignedUser": null,
                        "status": {"name": "Closed"}}]),
            )
            .with_response(
                "Account",
                "getTickets",
                json!([
                    {"id": 500, "title": "Disk alert",
                     "createDate": "2024-03-01T08:00:00-06:00",
                     "lastEditDate": "2024-03-02T09:30:00-06:00",
                     "assignedUser": {"firstName": "Sam", "lastName": "Lee"},
                     "status": {"name": "Open"}},
                    {"id": 480, "title": "DNS question",
                     "createDate": "2024-01-10T08:00:00-06:00",
                     "lastEditDate": "2024-01-11T12:00:00-06:00", "assignedUser": null,
                     "status": {"name": "Closed"}}
                ]),
            )
            .with_response(
                "Account",
                "getCurrentUser",
                json!({"id": 7, "username": "demo", "firstName": "Sam", "lastName": "Lee"}),
            )
            .with_response(
                "Ticket",
                "getObject",
                json!({"id": 500, "title": "Disk alert", "status": {"name": "Open"},
                       "createDate": "2024-03-01T08:00:00-06:00",
                       "lastEditDate": "2024-03-02T09:30:00-06:00",
                       "assignedUser": {"firstName": "Sam", "lastName": "Lee"},
                       "updates": [{"entry": "Disk usage above 90%"}, {"entry": "Investigating"}]}),
            )
            .with_response(
                "Ticket",
                "createStandardTicket",
                json!({"id": 501, "title": "New ticket",
                       "createDate": "2024-03-05T10:00:00-06:00"}),
            )
            .with_response("Ticket", "addUpdate", json!([{"id": 9001, "entry": "update"}]))
            .with_response(
                "Ticket_Subject",
                "getAllObjects",
                json!([{"id": 1001, "name": "Accounting Request"},
                       {"id": 1021, "name": "Hardware Issue"}]),
            )
            .with_response(
                "Search",
                "getObjectTypes",
                json!([
                    {"name": "SoftLayer_Virtual_Guest", "properties": [
                        {"name": "hostname", "sortableFlag": true},
                        {"name": "primaryIpAddress", "sortableFlag": false}
                    ]},
                    {"name": "SoftLayer_Hardware", "properties": [
                        {"name": "fullyQualifiedDomainName", "sortableFlag": true}
                    ]}
                ]),
            )
            .with_response(
                "Search",
                "search",
                json!([{"matchedTerms": ["web1"], "relevanceScore": "4.9",
                        "resourceType": "SoftLayer_Virtual_Guest",
                        "resource": {"id": 1001, "fullyQualifiedDomainName": "web1.example.com"}}]),
            )
    }
}

impl RemoteCall for FixtureTransport {
    fn call(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        self.calls.borrow_mut().push(request.clone());
        match self
            .responses
            .get(&(request.service.clone(), request.method.clone()))
        {
            Some(response) => response.clone(),
            None => Err(RemoteError::new(
                404,
                "SoftLayer_Exception_MissingFixture",
                format!("No fixture for {}::{}", request.service, request.method),
            )),
        }
    }
}

/// Shared handle so a test can inspect calls after handing the transport off.
impl<T: RemoteCall + ?Sized> RemoteCall for Rc<T> {
    fn call(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        (**self).call(request)
    }
}

fn key(service: &str, method: &str) -> (String, String) {
    (ApiRequest::new(service, method).service, method.to_string())
}
