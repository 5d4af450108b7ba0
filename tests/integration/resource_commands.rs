//! Integration tests for the resource commands against the demo fixtures.

use super::test_utils::Harness;
use serde_json::{json, Value};
use slcli::error::CliError;
use slcli::formatting::Rendered;
use slcli::transport::FixtureTransport;
use tempfile::TempDir;

/// Run with `--format python` and return the native value.
fn native(h: &mut Harness, args: &[&str]) -> Value {
    let mut argv = vec!["--format", "python"];
    argv.extend_from_slice(args);
    match h.dispatcher.run(argv).unwrap() {
        Some(Rendered::Native(value)) => value,
        other => panic!("expected native output, got {:?}", other),
    }
}

fn text(h: &mut Harness, args: &[&str]) -> String {
    h.dispatcher.run(args).unwrap().unwrap().to_string()
}

#[test]
fn test_sshkey_list_raw_sorted_by_label() {
    let mut h = Harness::new(&[]);
    let out = text(&mut h, &["sshkey", "list", "--sortby", "label"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("101"), "{}", out);
    assert!(lines[1].contains("laptop") && lines[1].contains("work"));
    assert!(lines[0].ends_with('-'), "missing notes render as blank: {}", out);
}

#[test]
fn test_sshkey_add_from_file() {
    let dir = TempDir::new().unwrap();
    let key_path = dir.path().join("id_rsa.pub");
    std::fs::write(&key_path, "ssh-rsa AAAAB3Nza me@host\n").unwrap();
    let key_arg = key_path.display().to_string();

    let mut h = Harness::new(&[]);
    let out = text(&mut h, &["sshkey", "add", "mykey", "-f", key_arg.as_str(), "-n", "home"]);
    assert_eq!(out, "SSH key added: 12:34");

    let call = h.transport.calls().pop().unwrap();
    assert_eq!(call.service, "SoftLayer_Security_Ssh_Key");
    assert_eq!(call.method, "createObject");
    assert_eq!(
        call.args,
        vec![json!({"key": "ssh-rsa AAAAB3Nza me@host", "label": "mykey", "notes": "home"})]
    );
}

#[test]
fn test_sshkey_add_requires_a_key_source() {
    let mut h = Harness::new(&[]);
    let err = h.dispatcher.run(["sshkey", "add", "mykey"]).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)), "got {:?}", err);
    assert_eq!(h.factory_calls.get(), 0);

    let err = h
        .dispatcher
        .run(["sshkey", "add", "mykey", "-k", "ssh-rsa A", "-f", "/tmp/x"])
        .unwrap_err();
    assert!(matches!(err, CliError::Usage(_)), "got {:?}", err);
}

#[test]
fn test_sshkey_add_unreadable_file_is_local_io() {
    let mut h = Harness::new(&[]);
    let err = h
        .dispatcher
        .run(["sshkey", "add", "mykey", "-f", "/nonexistent/id_rsa.pub"])
        .unwrap_err();
    assert!(matches!(err, CliError::LocalIo { .. }), "got {:?}", err);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_sshkey_edit_by_label() {
    let mut h = Harness::new(&[]);
    assert!(h
        .dispatcher
        .run(["sshkey", "edit", "laptop", "--label", "desk"])
        .unwrap()
        .is_none());
    let call = h.transport.calls().pop().unwrap();
    assert_eq!(call.method, "editObject");
    assert_eq!(call.identifier, Some(100));
    assert_eq!(call.args, vec![json!({"label": "desk"})]);
}

#[test]
fn test_sshkey_remove_needs_typed_id() {
    let mut h = Harness::new(&["100"]);
    assert!(h.dispatcher.run(["sshkey", "remove", "laptop"]).unwrap().is_none());
    assert!(h
        .called()
        .contains(&"SoftLayer_Security_Ssh_Key::deleteObject".to_string()));

    let mut h = Harness::new(&[""]);
    let err = h.dispatcher.run(["sshkey", "remove", "100"]).unwrap_err();
    assert_eq!(err.to_string(), "Aborted.");
    assert!(!h.called().iter().any(|c| c.ends_with("deleteObject")));
}

#[test]
fn test_sshkey_remove_rejected_by_api_is_remote_error() {
    let transport =
        FixtureTransport::demo().with_response("Security_Ssh_Key", "deleteObject", json!(false));
    let mut h = Harness::with_transport(transport, &["100"]);
    let err = h.dispatcher.run(["sshkey", "remove", "100"]).unwrap_err();
    assert!(matches!(err, CliError::Remote(_)), "got {:?}", err);
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_vs_cancel_rejected_by_api_is_remote_error() {
    let transport =
        FixtureTransport::demo().with_response("Virtual_Guest", "deleteObject", json!(false));
    let mut h = Harness::with_transport(transport, &["1001"]);
    let err = h.dispatcher.run(["vs", "cancel", "1001"]).unwrap_err();
    assert!(matches!(err, CliError::Remote(_)), "got {:?}", err);
}

#[test]
fn test_sshkey_print_writes_file() {
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("laptop.pub");
    let out_arg = out_path.display().to_string();

    let mut h = Harness::new(&[]);
    let value = native(&mut h, &["sshkey", "print", "100", "-f", out_arg.as_str()]);
    assert_eq!(value, json!({"id": 100, "label": "laptop", "notes": "work"}));
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        "ssh-rsa AAAAB3Nza demo@laptop"
    );
}

#[test]
fn test_vs_list_sorted_by_host() {
    let mut h = Harness::new(&[]);
    let rows = native(&mut h, &["vs", "list"]);
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["memory"], 4096);
    assert_eq!(rows[1]["active_transaction"], "RECLAIM_WAIT");

    let out = text(&mut h, &["vs", "list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].contains("db1.example.com"), "{}", out);
    assert!(lines[1].contains("web1.example.com") && lines[1].contains("4G"));
}

#[test]
fn test_vs_list_filters_reach_the_server() {
    let mut h = Harness::new(&[]);
    text(&mut h, &["vs", "list", "--datacenter", "dal10", "--tags", "prod, web"]);
    let call = h.transport.calls().pop().unwrap();
    assert_eq!(call.method, "getVirtualGuests");
    let filter = call.filter.unwrap();
    assert_eq!(
        filter["virtualGuests"]["datacenter"]["name"]["operation"],
        "_= dal10"
    );
    assert_eq!(
        filter["virtualGuests"]["tagReferences"]["tag"]["name"]["operation"],
        "in"
    );
}

#[test]
fn test_vs_detail_by_hostname() {
    let mut h = Harness::new(&[]);
    let detail = native(&mut h, &["vs", "detail", "web1"]);
    assert_eq!(detail["id"], 1001);
    assert_eq!(detail["hostname"], "web1.example.com");
    assert_eq!(detail["os"], "Ubuntu");
    assert_eq!(detail["tags"], json!(["prod", "web"]));
    assert!(detail.get("users").is_none());

    let last = h.transport.calls().pop().unwrap();
    assert_eq!(last.method, "getObject");
    assert_eq!(last.identifier, Some(1001));
}

#[test]
fn test_vs_detail_by_ip_address() {
    let mut h = Harness::new(&[]);
    let detail = native(&mut h, &["vs", "detail", "10.0.0.10", "--passwords"]);
    assert_eq!(detail["id"], 1001);
    assert_eq!(detail["users"], json!([]));
    let first = &h.transport.calls()[0];
    assert!(first.filter.as_ref().unwrap()["virtualGuests"]
        .get("primaryIpAddress")
        .is_some());
}

#[test]
fn test_ticket_list_closed() {
    let mut h = Harness::new(&[]);
    let out = text(&mut h, &["ticket", "list", "--status", "closed"]);
    assert!(out.contains("DNS question"));
    assert!(out.contains("2024-01-10 08:00"));
    assert!(!out.contains("Disk alert"));
    assert_eq!(h.called(), vec!["SoftLayer_Account::getClosedTickets"]);
}

#[test]
fn test_ticket_detail_json_keeps_raw_dates() {
    let mut h = Harness::new(&[]);
    let detail = native(&mut h, &["ticket", "detail", "500", "--update-count", "2"]);
    assert_eq!(detail["user"], "Sam Lee");
    assert_eq!(detail["created"], "2024-03-01T08:00:00-06:00");
    assert_eq!(detail["Update 1"], "Disk usage above 90%");
    assert_eq!(detail["Update 2"], "Investigating");
}

#[test]
fn test_ticket_create_uses_editor_body() {
    let mut h = Harness::new(&[]);
    let detail = native(
        &mut h,
        &["ticket", "create", "--title", "Disk full", "--subject-id", "1021"],
    );
    assert_eq!(detail["id"], 500);

    let create = h
        .transport
        .calls()
        .into_iter()
        .find(|c| c.method == "createStandardTicket")
        .unwrap();
    assert_eq!(
        create.args,
        vec![
            json!({"subjectId": 1021, "assignedUserId": 7, "title": "Disk full"}),
            json!("Edited body"),
        ]
    );
}

#[test]
fn test_ticket_update_with_body_flag() {
    let mut h = Harness::new(&[]);
    let out = text(&mut h, &["ticket", "update", "500", "--body", "Still broken"]);
    assert_eq!(out, "Ticket Updated!");
    let call = h.transport.calls().pop().unwrap();
    assert_eq!(call.method, "addUpdate");
    assert_eq!(call.identifier, Some(500));
    assert_eq!(call.args, vec![json!({"entry": "Still broken"})]);
}

#[test]
fn test_ticket_update_rejected_by_api_is_remote_error() {
    let transport = FixtureTransport::demo().with_response("Ticket", "addUpdate", json!(false));
    let mut h = Harness::with_transport(transport, &[]);
    let err = h
        .dispatcher
        .run(["ticket", "update", "500", "--body", "Still broken"])
        .unwrap_err();
    assert!(matches!(err, CliError::Remote(_)), "got {:?}", err);
}

#[test]
fn test_ticket_subjects() {
    let mut h = Harness::new(&[]);
    let subjects = native(&mut h, &["ticket", "subjects"]);
    assert_eq!(subjects[1], json!({"id": 1021, "subject": "Hardware Issue"}));
}

#[test]
fn test_search_prompts_for_missing_query() {
    let mut h = Harness::new(&["web1"]);
    let results = native(&mut h, &["search"]);
    assert_eq!(h.prompts.borrow().as_slice(), ["Search query: "]);
    assert_eq!(
        results,
        json!([{"id": 1001, "type": "Virtual_Guest", "name": "web1.example.com", "score": "4.9"}])
    );
}

#[test]
fn test_search_phrase_with_types() {
    let mut h = Harness::new(&[]);
    text(
        &mut h,
        &["search", "web1", "--type", "SoftLayer_Hardware", "--type", "SoftLayer_Virtual_Guest"],
    );
    let call = h.transport.calls().pop().unwrap();
    assert_eq!(
        call.args,
        vec![json!("web1 _objectType:SoftLayer_Hardware,SoftLayer_Virtual_Guest")]
    );
    assert!(h.prompts.borrow().is_empty());
}

#[test]
fn test_search_blank_query_is_usage_error() {
    let mut h = Harness::new(&["   "]);
    let err = h.dispatcher.run(["search"]).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_search_types_nests_properties() {
    let mut h = Harness::new(&[]);
    let types = native(&mut h, &["search", "--types"]);
    assert_eq!(types[0]["Name"], "SoftLayer_Virtual_Guest");
    assert_eq!(
        types[0]["Properties"],
        json!([
            {"Property": "hostname", "Sortable": true},
            {"Property": "primaryIpAddress", "Sortable": false}
        ])
    );
}

#[test]
fn test_demo_flag_uses_builtin_fixtures() {
    let mut dispatcher = slcli::cli::Dispatcher::new(slcli::commands::registry())
        .with_user_config(None)
        .with_default_format(slcli::formatting::OutputFormat::Raw);
    let out = dispatcher
        .run(["--demo", "sshkey", "list"])
        .unwrap()
        .unwrap()
        .to_string();
    assert!(out.contains("laptop"));
}
