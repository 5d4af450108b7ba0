//! Integration tests for the REST transport against a local mock server.

use httpmock::prelude::*;
use serde_json::json;
use slcli::config::ClientSettings;
use slcli::error::CliError;
use slcli::managers::SshKeyManager;
use slcli::transport::{ApiRequest, RemoteCall, RestTransport};

/// base64 of `user:key`
const BASIC_AUTH: &str = "Basic dXNlcjprZXk=";

fn transport(server: &MockServer) -> RestTransport {
    RestTransport::new(&ClientSettings {
        username: Some("user".into()),
        api_key: Some("key".into()),
        endpoint_url: server.base_url(),
        timeout: Some(5),
    })
    .unwrap()
}

#[test]
fn test_get_with_mask_and_auth() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/SoftLayer_Account/getObject.json")
            .query_param("objectMask", "mask[id]")
            .header("authorization", BASIC_AUTH);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": 1234}));
    });

    let result = transport(&server)
        .call(&ApiRequest::new("Account", "getObject").mask("id"))
        .unwrap();
    mock.assert();
    assert_eq!(result, json!({"id": 1234}));
}

#[test]
fn test_identifier_and_result_limit_in_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/SoftLayer_Account/getVirtualGuests.json")
            .query_param("resultLimit", "20,10");
        then.status(200).json_body(json!([]));
    });
    let result = transport(&server)
        .call(&ApiRequest::new("Account", "getVirtualGuests").limit(10, 20))
        .unwrap();
    mock.assert();
    assert_eq!(result, json!([]));

    let by_id = server.mock(|when, then| {
        when.method(GET).path("/SoftLayer_Virtual_Guest/1001/getObject.json");
        then.status(200).json_body(json!({"id": 1001}));
    });
    transport(&server)
        .call(&ApiRequest::new("Virtual_Guest", "getObject").id(1001))
        .unwrap();
    by_id.assert();
}

#[test]
fn test_arguments_are_posted_as_parameters() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/SoftLayer_Security_Ssh_Key/createObject.json")
            .json_body(json!({"parameters": [{"key": "ssh-rsa A", "label": "k", "notes": null}]}));
        then.status(201).json_body(json!({"id": 102, "fingerprint": "12:34"}));
    });

    let client = transport(&server);
    let created = SshKeyManager::new(&client).add_key("ssh-rsa A", "k", None).unwrap();
    mock.assert();
    assert_eq!(created["fingerprint"], "12:34");
}

#[test]
fn test_edit_object_with_arguments_is_posted() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/SoftLayer_Security_Ssh_Key/100/editObject.json")
            .json_body(json!({"parameters": [{"notes": "rotated"}]}));
        then.status(200).json_body(json!(true));
    });

    let client = transport(&server);
    assert!(SshKeyManager::new(&client).edit_key(100, None, Some("rotated")).unwrap());
    mock.assert();
}

#[test]
fn test_error_body_maps_to_remote_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/SoftLayer_Virtual_Guest/9/getObject.json");
        then.status(404).json_body(json!({
            "error": "Unable to find object with id of '9'.",
            "code": "SoftLayer_Exception_ObjectNotFound"
        }));
    });

    let err = transport(&server)
        .call(&ApiRequest::new("Virtual_Guest", "getObject").id(9))
        .unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.fault_code, "SoftLayer_Exception_ObjectNotFound");
    assert_eq!(err.fault_string, "Unable to find object with id of '9'.");

    let cli: CliError = err.into();
    assert_eq!(cli.exit_code(), 3);
}

#[test]
fn test_non_json_success_body_is_remote_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/SoftLayer_Account/getObject.json");
        then.status(200).body("<html>maintenance</html>");
    });
    let err = transport(&server)
        .call(&ApiRequest::new("Account", "getObject"))
        .unwrap_err();
    assert_eq!(err.fault_string, "<html>maintenance</html>");
}

#[test]
fn test_connection_refused_is_transport_error() {
    let settings = ClientSettings {
        endpoint_url: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    };
    let err = RestTransport::new(&settings)
        .unwrap()
        .call(&ApiRequest::new("Account", "getObject"))
        .unwrap_err();
    assert_eq!(err.status, 0);
    assert_eq!(err.fault_code, "TransportError");
}
