//! REST/JSON transport over reqwest.
//!
//! `{endpoint}/{service}[/{id}][/{method}].json`, basic auth with username and API
//! key, mask/filter/limit as query parameters and positional arguments as
//! `{"parameters": [...]}` in the body.

use super::{ApiRequest, RemoteCall};
use crate::config::ClientSettings;
use crate::error::{CliError, RemoteError};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const REST_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking REST client: one current-thread runtime, one request at a time.
pub struct RestTransport {
    client: Client,
    runtime: tokio::runtime::Runtime,
    endpoint_url: String,
    credentials: Option<(String, String)>,
}

impl RestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, CliError> {
        let mut builder = Client::builder()
            .connect_timeout(REST_CONNECT_TIMEOUT)
            .user_agent(concat!("slcli/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| CliError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Config(format!("Failed to create runtime: {}", e)))?;

        let credentials = match (&settings.username, &settings.api_key) {
            (Some(user), Some(key)) => Some((user.clone(), key.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            runtime,
            endpoint_url: settings.endpoint_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Request URL without query string.
    pub fn url_for(&self, request: &ApiRequest) -> String {
        let mut parts = vec![self.endpoint_url.clone(), request.service.clone()];
        if let Some(id) = request.identifier {
            parts.push(id.to_string());
        }
        if !request.method.is_empty() {
            parts.push(request.method.clone());
        }
        format!("{}.json", parts.join("/"))
    }

    async fn send(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        let url = self.url_for(request);
        let method = http_method(request);
        debug!(%method, %url, mask = ?request.mask, "API call");

        let mut builder = self
            .client
            .request(method, &url)
            .query(&query_params(request));
        if let Some((user, key)) = &self.credentials {
            builder = builder.basic_auth(user, Some(key));
        }
        if !request.args.is_empty() {
            builder = builder.json(&json!({ "parameters": request.args }));
        }

        let response = builder.send().await.map_err(map_http_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_http_error)?;

        if !status.is_success() {
            return Err(fault_from_body(status.as_u16(), &text));
        }
        if text.is_empty() {
            return Err(RemoteError::new(status.as_u16(), "SoftLayer_Exception", "Empty response."));
        }
        serde_json::from_str(&text)
            .map_err(|_| RemoteError::new(status.as_u16(), "SoftLayer_Exception", text))
    }
}

impl RemoteCall for RestTransport {
    fn call(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        self.runtime.block_on(self.send(request))
    }
}

/// Wrap a bare field list in `mask[...]`; full mask expressions pass through.
pub fn format_object_mask(mask: &str) -> String {
    let mask = mask.trim();
    if mask.starts_with("mask") || mask.starts_with('[') || mask.starts_with("filteredMask") {
        mask.to_string()
    } else {
        format!("mask[{}]", mask)
    }
}

fn http_method(request: &ApiRequest) -> Method {
    if !request.args.is_empty() {
        // arguments always travel as a POST body
        return Method::POST;
    }
    match request.method.as_str() {
        "createObject" | "createObjects" => Method::POST,
        "editObject" | "editObjects" => Method::PUT,
        _ => Method::GET,
    }
}

fn query_params(request: &ApiRequest) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(mask) = &request.mask {
        params.push(("objectMask", format_object_mask(mask)));
    }
    if let Some(filter) = &request.filter {
        params.push(("objectFilter", filter.to_string()));
    }
    if request.limit.is_some() || request.offset.is_some() {
        params.push((
            "resultLimit",
            format!("{},{}", request.offset.unwrap_or(0), request.limit.unwrap_or(0)),
        ));
    }
    params
}

fn fault_from_body(status: u16, text: &str) -> RemoteError {
    if text.is_empty() {
        return RemoteError::new(status, "SoftLayer_Exception", "Empty response.");
    }
    match serde_json::from_str::<Value>(text) {
        Ok(body) => {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(text)
                .to_string();
            let code = body
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("SoftLayer_Exception")
                .to_string();
            RemoteError::new(status, code, message)
        }
        Err(_) => RemoteError::new(status, "SoftLayer_Exception", text),
    }
}

fn map_http_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        RemoteError::transport(format!("Connection error: {}", error))
    } else {
        RemoteError::transport(format!("HTTP error: {}", error))
    }
}
