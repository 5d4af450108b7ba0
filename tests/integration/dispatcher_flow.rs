//! Integration tests for resource/action dispatch, parse-time failures and the
//! confirmation guard, driven through the real command registry.

use super::test_utils::Harness;
use slcli::error::CliError;
use slcli::formatting::Rendered;
use slcli::transport::FixtureTransport;

const CREATE: [&str; 10] = [
    "vs", "create", "--cpu=2", "--memory=4096", "--hostname=web3", "--domain=example.com",
    "--os=UBUNTU_LATEST", "--datacenter=dal10", "--disk=25", "--test",
];

#[test]
fn test_missing_required_flag_makes_no_remote_call() {
    let mut h = Harness::new(&[]);
    let err = h
        .dispatcher
        .run(["vs", "create", "--cpu=2", "--hostname=web3", "--hourly", "--os=UBUNTU_LATEST"])
        .unwrap_err();
    assert!(matches!(err, CliError::Usage(_)), "got {:?}", err);
    assert_eq!(err.exit_code(), 2);
    assert_eq!(h.factory_calls.get(), 0, "client must not be built");
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_hourly_and_monthly_together_is_usage_error() {
    let mut h = Harness::new(&[]);
    let mut args = CREATE.to_vec();
    args.extend(["--hourly", "--monthly"]);
    let err = h.dispatcher.run(args).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)), "got {:?}", err);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_neither_hourly_nor_monthly_is_usage_error() {
    let mut h = Harness::new(&[]);
    let err = h.dispatcher.run(CREATE).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)), "got {:?}", err);
    assert!(err.to_string().contains("hourly"));
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_os_and_image_together_is_usage_error() {
    let mut h = Harness::new(&[]);
    let mut args = CREATE.to_vec();
    args.extend(["--hourly", "--image=abc-123"]);
    let err = h.dispatcher.run(args).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(h.factory_calls.get(), 0);
}

#[test]
fn test_quote_prints_prices_and_disclaimer() {
    let mut h = Harness::new(&[]);
    let mut args = CREATE.to_vec();
    args.push("--monthly");
    let out = h.dispatcher.run(args).unwrap().unwrap().to_string();
    assert!(out.contains("Total monthly cost"));
    assert!(out.contains("50.00"));
    assert!(out.contains("Prices reflected here are retail"));
    assert_eq!(h.called(), vec!["SoftLayer_Virtual_Guest::generateOrderTemplate"]);

    let template = &h.transport.calls()[0].args[0];
    assert_eq!(template["hourlyBillingFlag"], false);
    assert_eq!(template["blockDevices"][0]["diskImage"]["capacity"], "25");
}

#[test]
fn test_order_declined_aborts_without_ordering() {
    let mut h = Harness::new(&["n"]);
    let args: Vec<&str> = CREATE
        .iter()
        .copied()
        .filter(|a| *a != "--test")
        .chain(["--hourly"])
        .collect();
    let err = h.dispatcher.run(args).unwrap_err();
    assert_eq!(err.to_string(), "Aborting virtual server order.");
    assert_eq!(err.exit_code(), 2);
    assert!(!h.called().iter().any(|c| c.ends_with("createObject")));
    assert_eq!(
        h.prompts.borrow()[0],
        "This action will incur charges on your account. Continue? [y/N]: "
    );
}

#[test]
fn test_order_confirmed_with_really() {
    let mut h = Harness::new(&[]);
    let args: Vec<&str> = CREATE
        .iter()
        .copied()
        .filter(|a| *a != "--test")
        .chain(["--hourly", "--really", "--format=json"])
        .collect();
    let out = h.dispatcher.run(args).unwrap().unwrap().to_string();
    assert!(out.contains("\"guid\": \"1a2b-3c4d\""));
    assert!(h.prompts.borrow().is_empty(), "--really skips the prompt");
    assert!(h.called().contains(&"SoftLayer_Virtual_Guest::createObject".to_string()));
}

#[test]
fn test_cancel_requires_typed_id() {
    let mut h = Harness::new(&["DELETE"]);
    let err = h.dispatcher.run(["vs", "cancel", "web1"]).unwrap_err();
    assert_eq!(err.to_string(), "Aborted.");
    assert!(h.prompts.borrow()[0].contains("Type \"1001\""));
    assert!(!h.called().iter().any(|c| c.ends_with("deleteObject")));

    let mut h = Harness::new(&["1001"]);
    assert!(h.dispatcher.run(["vs", "cancel", "web1"]).unwrap().is_none());
    assert!(h.called().contains(&"SoftLayer_Virtual_Guest::deleteObject".to_string()));
}

#[test]
fn test_unresolvable_identifier_is_resolution_error() {
    let mut h = Harness::new(&[]);
    let err = h.dispatcher.run(["vs", "detail", "nosuchhost"]).unwrap_err();
    assert!(matches!(err, CliError::Resolution(_)));
    assert_eq!(err.to_string(), "Unable to find VS 'nosuchhost'");
}

#[test]
fn test_ambiguous_identifier_lists_candidates() {
    let transport = FixtureTransport::new().with_response(
        "Account",
        "getSshKeys",
        serde_json::json!([{"id": 1, "label": "dup"}, {"id": 2, "label": "dup"}]),
    );
    let mut h = Harness::with_transport(transport, &[]);
    let err = h.dispatcher.run(["sshkey", "print", "dup"]).unwrap_err();
    assert_eq!(err.to_string(), "Multiple SshKey found for 'dup': 1, 2");
}

#[test]
fn test_remote_fault_exit_code() {
    let transport = FixtureTransport::new().with_fault(
        "Account",
        "getSshKeys",
        slcli::error::RemoteError::new(401, "SoftLayer_Exception", "Invalid API token."),
    );
    let mut h = Harness::with_transport(transport, &[]);
    let err = h.dispatcher.run(["sshkey", "list"]).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(slcli::cli::map_error(&err).contains("slcli config setup"));
}

#[test]
fn test_python_format_returns_native_value() {
    let mut h = Harness::new(&[]);
    let out = h
        .dispatcher
        .run(["--format", "python", "sshkey", "list", "--sortby", "label"])
        .unwrap()
        .unwrap();
    let Rendered::Native(value) = out else {
        panic!("python format must return a native value");
    };
    assert_eq!(value[0]["label"], "laptop");
    assert_eq!(value[1]["notes"], serde_json::Value::Null);
}

#[test]
fn test_alias_resolves_namespace() {
    let mut h = Harness::new(&[]);
    let out = h.dispatcher.run(["vm", "list", "--hourly"]).unwrap().unwrap().to_string();
    assert!(out.contains("web1.example.com"));
    assert!(!out.contains("db1.example.com"));
    assert_eq!(h.called(), vec!["SoftLayer_Account::getHourlyVirtualGuests"]);
}
