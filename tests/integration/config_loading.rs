//! Integration tests for settings precedence and the `config` commands.

use super::test_utils::{with_sl_env, Harness};
use slcli::config::{ConfigLoader, DEFAULT_ENDPOINT_URL, PRIVATE_ENDPOINT_URL};
use slcli::error::CliError;
use std::path::Path;
use tempfile::TempDir;

fn write_ini(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, format!("[softlayer]\n{}", body)).unwrap();
    path
}

#[test]
fn test_defaults_when_nothing_is_configured() {
    let settings = with_sl_env(&[], || ConfigLoader::load_layers(None, None)).unwrap();
    assert_eq!(settings.endpoint_url, DEFAULT_ENDPOINT_URL);
    assert!(settings.username.is_none());
    assert!(settings.api_key.is_none());
    assert!(settings.timeout.is_none());
}

#[test]
fn test_environment_overrides_default() {
    let settings = with_sl_env(
        &[("SL_USERNAME", "envuser"), ("SL_ENDPOINT_URL", "http://env.test/")],
        || ConfigLoader::load_layers(None, None),
    )
    .unwrap();
    assert_eq!(settings.username.as_deref(), Some("envuser"));
    assert_eq!(settings.endpoint_url, "http://env.test/");
}

#[test]
fn test_user_file_overrides_environment() {
    let dir = TempDir::new().unwrap();
    let user = write_ini(&dir, "user.ini", "username = fileuser\n");
    let settings = with_sl_env(&[("SL_USERNAME", "envuser"), ("SL_API_KEY", "envkey")], || {
        ConfigLoader::load_layers(Some(user.clone()), None)
    })
    .unwrap();
    assert_eq!(settings.username.as_deref(), Some("fileuser"));
    assert_eq!(settings.api_key.as_deref(), Some("envkey"), "unset keys fall through");
}

#[test]
fn test_explicit_file_overrides_user_file() {
    let dir = TempDir::new().unwrap();
    let user = write_ini(&dir, "user.ini", "username = fileuser\ntimeout = 10\n");
    let explicit = write_ini(&dir, "explicit.ini", "username = explicituser\n");
    let settings = with_sl_env(&[("SL_USERNAME", "envuser")], || {
        ConfigLoader::load_layers(Some(user.clone()), Some(&explicit))
    })
    .unwrap();
    assert_eq!(settings.username.as_deref(), Some("explicituser"));
    assert_eq!(settings.timeout, Some(10));
}

#[test]
fn test_blank_file_value_falls_back_to_environment() {
    let dir = TempDir::new().unwrap();
    let explicit = write_ini(&dir, "blank.ini", "api_key =\n");
    let settings = with_sl_env(&[("SL_API_KEY", "envkey")], || {
        ConfigLoader::load_layers(None, Some(&explicit))
    })
    .unwrap();
    assert_eq!(settings.api_key.as_deref(), Some("envkey"));
}

#[test]
fn test_missing_explicit_file_is_skipped() {
    let settings = with_sl_env(&[("SL_USERNAME", "envuser")], || {
        ConfigLoader::load_layers(None, Some(Path::new("/nonexistent/slcli.ini")))
    })
    .unwrap();
    assert_eq!(settings.username.as_deref(), Some("envuser"));
}

#[test]
fn test_invalid_timeout_is_config_error() {
    let dir = TempDir::new().unwrap();
    let explicit = write_ini(&dir, "timeout.ini", "timeout = soon\n");
    let err = with_sl_env(&[], || ConfigLoader::load_layers(None, Some(&explicit))).unwrap_err();
    assert!(matches!(err, CliError::Config(_)), "got {:?}", err);
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_setup_writes_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.ini");
    let path_arg = path.display().to_string();

    let mut h = Harness::new(&["alice", "abcdefgh1234", "private", "y"]);
    let out = with_sl_env(&[], || {
        h.dispatcher.run(["config", "setup", "--config", path_arg.as_str()])
    })
    .unwrap()
    .unwrap()
    .to_string();
    assert_eq!(out, "Configuration Updated Successfully");

    let prompts = h.prompts.borrow();
    assert_eq!(prompts[0], "Username: ");
    assert_eq!(prompts[1], "API Key: ");
    assert_eq!(prompts[2], format!("Endpoint URL [{}]: ", DEFAULT_ENDPOINT_URL));
    assert!(prompts[3].starts_with("Are you sure you want to write settings to"));

    let written = with_sl_env(&[], || ConfigLoader::load_layers(None, Some(&path))).unwrap();
    assert_eq!(written.username.as_deref(), Some("alice"));
    assert_eq!(written.api_key.as_deref(), Some("abcdefgh1234"));
    assert_eq!(written.endpoint_url, PRIVATE_ENDPOINT_URL);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn test_setup_declined_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never.ini");
    let path_arg = path.display().to_string();

    let mut h = Harness::new(&["bob", "key", "", "n"]);
    let err = with_sl_env(&[], || {
        h.dispatcher.run(["config", "setup", "-C", path_arg.as_str()])
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "Aborted.");
    assert!(!path.exists());
}

#[test]
fn test_show_masks_api_key() {
    let dir = TempDir::new().unwrap();
    let path = write_ini(&dir, "show.ini", "username = carol\napi_key = abcdefgh1234\n");
    let path_arg = path.display().to_string();

    let mut h = Harness::new(&[]);
    let out = with_sl_env(&[], || {
        h.dispatcher
            .run(["config", "show", "--config", path_arg.as_str(), "--format", "json"])
    })
    .unwrap()
    .unwrap()
    .to_string();
    assert!(out.contains("\"Username\": \"carol\""));
    assert!(out.contains("\"API Key\": \"********1234\""));
    assert!(!out.contains("abcdefgh"));
    assert!(out.contains("\"Timeout\": \"not set\""));
}
