//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a PCF client from it.

use std::io::Write;
use std::sync::Arc;

use edgeaf_infra::config;
use edgeaf_infra::policy_auth::{NoAuth, PolicyAuthClient};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "user_agent": "ngc-af",
            "server": {
                "hostname": "af.example:8050",
                "cnca_endpoint": "/af/v1",
                "location_prefix_pa": "/policy-authorization/app-sessions"
            },
            "pcf": {
                "protocol": "https",
                "protocol_version": "2.0",
                "hostname": "pcf.example",
                "port": 29507,
                "base_path": "/npcf-policyauthorization/v1",
                "verify_certs": false,
                "timeout_secs": 10
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.pcf.root_uri(), "https://pcf.example:29507/npcf-policyauthorization/v1");
    assert!(config.pcf.uses_http2());
    assert_eq!(config.pcf.timeout_secs, 10);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_loaded_config_builds_client() {
    let path = write_config(
        r#"
user_agent = "ngc-af"

[server]
hostname = "af.example"

[pcf]
protocol = "http"
hostname = "127.0.0.1"
port = 29507
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    let client = PolicyAuthClient::new(&config, Arc::new(NoAuth)).expect("client should build");

    assert_eq!(
        client.resource_uri().as_str(),
        "http://127.0.0.1:29507/npcf-policyauthorization/v1"
    );

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_pcf_section_is_rejected() {
    let path = write_config(r#"{ "server": { "hostname": "af.example" } }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_err(), "PCF section is required");

    std::fs::remove_file(path).ok();
}
