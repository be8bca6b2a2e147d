//! Configuration loader
//!
//! Loads the AF configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `EDGEAF_AF_HOSTNAME`: AF-facing host used in rewritten locations
//! - `EDGEAF_PCF_HOSTNAME`: PCF host
//! - `EDGEAF_PCF_PORT`: PCF port
//!
//! Optional:
//! - `EDGEAF_USER_AGENT`
//! - `EDGEAF_AF_CNCA_ENDPOINT`, `EDGEAF_AF_LOCATION_PREFIX_PA`
//! - `EDGEAF_PCF_PROTOCOL` (`http`/`https`), `EDGEAF_PCF_PROTOCOL_VERSION`
//!   (`1.1`/`2.0`), `EDGEAF_PCF_BASE_PATH`
//! - `EDGEAF_PCF_VERIFY_CERTS` (true/false), `EDGEAF_PCF_CA_CERT` (PEM path)
//! - `EDGEAF_PCF_TIMEOUT_SECS`, `EDGEAF_PCF_NOTIF_URI`
//! - `EDGEAF_OAUTH2_TOKEN_URL`, `EDGEAF_OAUTH2_CLIENT_ID`,
//!   `EDGEAF_OAUTH2_CLIENT_SECRET`, `EDGEAF_OAUTH2_SCOPES` (comma separated).
//!   OAuth2 is enabled when the token URL is set.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./edgeaf.json` or `./edgeaf.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use edgeaf_domain::constants::{
    DEFAULT_CNCA_ENDPOINT, DEFAULT_LOCATION_PREFIX_PA, DEFAULT_PCF_BASE_PATH,
    DEFAULT_PCF_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use edgeaf_domain::{AfConfig, AfError, AfServerConfig, OAuth2Config, PcfClientConfig, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AfError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<AfConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AfError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<AfConfig> {
    let af_hostname = env_var("EDGEAF_AF_HOSTNAME")?;
    let pcf_hostname = env_var("EDGEAF_PCF_HOSTNAME")?;
    let pcf_port = env_var("EDGEAF_PCF_PORT").and_then(|s| {
        s.parse::<u16>().map_err(|e| AfError::Config(format!("Invalid PCF port: {}", e)))
    })?;

    let timeout_secs = match env_opt("EDGEAF_PCF_TIMEOUT_SECS") {
        Some(s) => s
            .parse::<u64>()
            .map_err(|e| AfError::Config(format!("Invalid PCF timeout: {}", e)))?,
        None => DEFAULT_PCF_TIMEOUT_SECS,
    };

    let protocol = env_opt("EDGEAF_PCF_PROTOCOL").unwrap_or_else(|| "https".to_string());
    if !matches!(protocol.as_str(), "http" | "https") {
        return Err(AfError::Config(format!("Unsupported PCF protocol: {}", protocol)));
    }

    let protocol_version =
        env_opt("EDGEAF_PCF_PROTOCOL_VERSION").unwrap_or_else(|| "1.1".to_string());
    if !matches!(protocol_version.as_str(), "1.1" | "2.0") {
        return Err(AfError::Config(format!(
            "Unsupported PCF protocol version: {}",
            protocol_version
        )));
    }

    let oauth2 = match env_opt("EDGEAF_OAUTH2_TOKEN_URL") {
        Some(token_url) => Some(OAuth2Config {
            token_url,
            client_id: env_var("EDGEAF_OAUTH2_CLIENT_ID")?,
            client_secret: env_opt("EDGEAF_OAUTH2_CLIENT_SECRET"),
            scopes: env_opt("EDGEAF_OAUTH2_SCOPES")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
        }),
        None => None,
    };

    Ok(AfConfig {
        user_agent: env_opt("EDGEAF_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        server: AfServerConfig {
            hostname: af_hostname,
            cnca_endpoint: env_opt("EDGEAF_AF_CNCA_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_CNCA_ENDPOINT.to_string()),
            location_prefix_pa: env_opt("EDGEAF_AF_LOCATION_PREFIX_PA")
                .unwrap_or_else(|| DEFAULT_LOCATION_PREFIX_PA.to_string()),
        },
        pcf: PcfClientConfig {
            protocol,
            protocol_version,
            hostname: pcf_hostname,
            port: pcf_port,
            base_path: env_opt("EDGEAF_PCF_BASE_PATH")
                .unwrap_or_else(|| DEFAULT_PCF_BASE_PATH.to_string()),
            verify_certs: env_bool("EDGEAF_PCF_VERIFY_CERTS", true),
            ca_cert: env_opt("EDGEAF_PCF_CA_CERT").map(PathBuf::from),
            timeout_secs,
            notif_uri: env_opt("EDGEAF_PCF_NOTIF_URI"),
            oauth2,
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AfError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<AfConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AfError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AfError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AfError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AfConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AfError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AfError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AfError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory (and up to two parents), then the
/// executable's directory. Returns the first config file found.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("edgeaf.json"),
        dir.join("edgeaf.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `AfError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AfError::Config(format!("Missing required environment variable: {}", key)))
}

/// Optional environment variable; empty values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}
