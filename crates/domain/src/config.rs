//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CNCA_ENDPOINT, DEFAULT_LOCATION_PREFIX_PA, DEFAULT_PCF_BASE_PATH,
    DEFAULT_PCF_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub server: AfServerConfig,
    pub pcf: PcfClientConfig,
}

/// AF-facing server identity, used to build locations handed back to
/// applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfServerConfig {
    pub hostname: String,
    #[serde(default = "default_cnca_endpoint")]
    pub cnca_endpoint: String,
    #[serde(default = "default_location_prefix_pa")]
    pub location_prefix_pa: String,
}

impl AfServerConfig {
    /// AF-facing prefix of the app-sessions collection, e.g.
    /// `https://af.example/af/v1/policy-authorization/app-sessions`.
    pub fn location_prefix(&self) -> String {
        format!("https://{}{}{}", self.hostname, self.cnca_endpoint, self.location_prefix_pa)
    }
}

/// Outbound Npcf_PolicyAuthorization client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcfClientConfig {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// "1.1" or "2.0"
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    pub hostname: String,
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_true")]
    pub verify_certs: bool,
    /// PEM file with the CA that signed the PCF certificate
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Notification URI stamped on every events subscription sent to the PCF
    #[serde(default)]
    pub notif_uri: Option<String>,
    /// OAuth2 client credentials; `None` disables bearer tokens
    #[serde(default)]
    pub oauth2: Option<OAuth2Config>,
}

impl PcfClientConfig {
    /// `{protocol}://{hostname}:{port}{base_path}`
    pub fn root_uri(&self) -> String {
        format!("{}://{}:{}{}", self.protocol, self.hostname, self.port, self.base_path)
    }

    pub fn uses_http2(&self) -> bool {
        self.protocol_version == "2.0"
    }

    pub fn uses_tls(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("https")
    }
}

/// OAuth2 client-credentials grant used to obtain PCF bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Config {
    pub token_url: String,
    pub client_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_cnca_endpoint() -> String {
    DEFAULT_CNCA_ENDPOINT.to_string()
}

fn default_location_prefix_pa() -> String {
    DEFAULT_LOCATION_PREFIX_PA.to_string()
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_protocol_version() -> String {
    "1.1".to_string()
}

fn default_base_path() -> String {
    DEFAULT_PCF_BASE_PATH.to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_PCF_TIMEOUT_SECS
}

impl Default for AfConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            server: AfServerConfig {
                hostname: "localhost:8050".to_string(),
                cnca_endpoint: default_cnca_endpoint(),
                location_prefix_pa: default_location_prefix_pa(),
            },
            pcf: PcfClientConfig {
                protocol: default_protocol(),
                protocol_version: default_protocol_version(),
                hostname: "localhost".to_string(),
                port: 29507,
                base_path: default_base_path(),
                verify_certs: true,
                ca_cert: None,
                timeout_secs: DEFAULT_PCF_TIMEOUT_SECS,
                notif_uri: None,
                oauth2: None,
            },
        }
    }
}
