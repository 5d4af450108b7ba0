//! Remote Call Transport
//!
//! Commands talk to the API through [`RemoteCall`]. [`RestTransport`] speaks the
//! provider's REST/JSON protocol; [`FixtureTransport`] answers from canned data and
//! records every call, for `--demo` runs and tests.

use crate::error::RemoteError;
use serde_json::Value;

mod fixture;
mod rest;

pub use fixture::FixtureTransport;
pub use rest::{format_object_mask, RestTransport};

/// Service namespace prefix added to short service names.
pub const SERVICE_PREFIX: &str = "SoftLayer_";

/// One named-procedure invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    /// Full service name, e.g. `SoftLayer_Account`
    pub service: String,
    pub method: String,
    /// Object the method is invoked on
    pub identifier: Option<i64>,
    /// Field-selection mask limiting the returned relations
    pub mask: Option<String>,
    /// Server-side object filter
    pub filter: Option<Value>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Positional method parameters
    pub args: Vec<Value>,
}

impl ApiRequest {
    /// Accepts `Account` or `SoftLayer_Account`.
    pub fn new(service: &str, method: &str) -> Self {
        let service = if service.starts_with(SERVICE_PREFIX) {
            service.to_string()
        } else {
            format!("{}{}", SERVICE_PREFIX, service)
        };
        Self {
            service,
            method: method.to_string(),
            ..Default::default()
        }
    }

    pub fn id(mut self, identifier: i64) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn limit(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Anything that can carry an [`ApiRequest`] to the API and bring back the result.
pub trait RemoteCall {
    fn call(&self, request: &ApiRequest) -> Result<Value, RemoteError>;
}

impl<T: RemoteCall + ?Sized> RemoteCall for Box<T> {
    fn call(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        (**self).call(request)
    }
}
