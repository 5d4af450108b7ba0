//! Integration tests for `--template` pre-fill and `--export`.

use super::test_utils::Harness;
use slcli::cli::Template;
use slcli::error::CliError;
use tempfile::TempDir;

fn write_template(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("vs.ini");
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn quoted_template(h: &Harness) -> serde_json::Value {
    let calls = h.transport.calls();
    let call = calls
        .iter()
        .find(|c| c.method == "generateOrderTemplate")
        .expect("quote was requested");
    call.args[0].clone()
}

#[test]
fn test_explicit_flag_beats_template() {
    let dir = TempDir::new().unwrap();
    let template = write_template(
        &dir,
        concat!(
            "cpu = 4\nmemory = 2048\nhostname = tmpl\n",
            "domain = example.com\nos = DEBIAN_LATEST\nhourly = true\n",
        ),
    );
    let mut h = Harness::new(&[]);
    h.dispatcher
        .run(["vs", "create", "--template", template.as_str(), "--cpu=8", "--test"])
        .unwrap();
    let sent = quoted_template(&h);
    assert_eq!(sent["startCpus"], 8, "explicit --cpu wins");
    assert_eq!(sent["maxMemory"], 2048);
    assert_eq!(sent["hostname"], "tmpl");
    assert_eq!(sent["hourlyBillingFlag"], true);
}

#[test]
fn test_template_fills_required_flags() {
    let dir = TempDir::new().unwrap();
    let template = write_template(
        &dir,
        concat!(
            "cpu=2\nmemory=4G\nhostname=web9\ndomain=example.com\n",
            "image=abc-123\nmonthly=yes\ndisk=25,100\n",
        ),
    );
    let mut h = Harness::new(&[]);
    h.dispatcher
        .run(["--template", template.as_str(), "vs", "create", "--test"])
        .unwrap();
    let sent = quoted_template(&h);
    assert_eq!(sent["maxMemory"], 4096);
    assert_eq!(sent["blockDeviceTemplateGroup"]["globalIdentifier"], "abc-123");
    assert_eq!(sent["blockDevices"].as_array().unwrap().len(), 2);
}

#[test]
fn test_template_false_flag_is_not_set() {
    let dir = TempDir::new().unwrap();
    let template = write_template(
        &dir,
        "cpu=2\nmemory=2048\nhostname=a\ndomain=b.com\nos=X\nhourly=false\n",
    );
    let mut h = Harness::new(&[]);
    let err = h
        .dispatcher
        .run(["vs", "create", "--template", template.as_str(), "--test"])
        .unwrap_err();
    assert!(matches!(err, CliError::Usage(_)), "hourly=false leaves billing unset");
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_missing_template_is_local_io() {
    let mut h = Harness::new(&[]);
    let err = h
        .dispatcher
        .run(["vs", "create", "--template", "/nonexistent/slcli/vs.ini"])
        .unwrap_err();
    assert!(matches!(err, CliError::LocalIo { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_export_round_trips_through_template() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("export.ini");
    let export_arg = format!("--export={}", export.display());
    let mut h = Harness::new(&[]);
    let out = h
        .dispatcher
        .run([
            "vs", "create", "--cpu=2", "--memory=4096", "--hostname=web3", "--domain=example.com",
            "--os=UBUNTU_LATEST", "--hourly", "--disk=25", "--disk=100", "--really",
            export_arg.as_str(),
        ])
        .unwrap()
        .unwrap();
    assert_eq!(out.to_string(), "Successfully exported options to a template file.");
    assert!(!h.called().iter().any(|c| c.ends_with("createObject")));

    let template = Template::load(&export).unwrap();
    assert_eq!(template.get("cpu"), Some("2"));
    assert_eq!(template.get("disk"), Some("25,100"));
    assert_eq!(template.get("hourly"), Some("true"));
    assert_eq!(template.get("really"), None);
    assert_eq!(template.get("export"), None);
    assert_eq!(template.get("monthly"), None, "unset flags are not exported");
}
