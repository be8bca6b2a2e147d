//! PCF to AF location rewriting
//!
//! The PCF hands out locations under its own authority. Applications must
//! only ever see the AF's, so everything after the `app-sessions` segment
//! is grafted onto the AF-facing collection prefix.

use edgeaf_domain::constants::APP_SESSIONS_SEGMENT;
use edgeaf_domain::AfServerConfig;
use tracing::warn;

/// Converts PCF `Location` values into AF-facing URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRewriter {
    prefix: String,
}

impl LocationRewriter {
    /// Rewriter for the AF described by `server`.
    pub fn new(server: &AfServerConfig) -> Self {
        Self::with_prefix(server.location_prefix())
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// AF-facing location for `pcf_location`.
    ///
    /// Returns an empty string, and logs a warning, when the location does
    /// not contain `app-sessions` exactly once.
    pub fn rewrite(&self, pcf_location: &str) -> String {
        let parts: Vec<&str> = pcf_location.split(APP_SESSIONS_SEGMENT).collect();
        match parts.as_slice() {
            [_, remainder] => format!("{}{}", self.prefix, remainder),
            _ => {
                warn!(location = pcf_location, "PCF location does not address an app session");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> LocationRewriter {
        LocationRewriter::with_prefix("https://af.example/af/v1/policy-authorization/app-sessions")
    }

    #[test]
    fn rewrites_individual_session() {
        assert_eq!(
            rewriter()
                .rewrite("https://pcf.example/npcf-policyauthorization/v1/app-sessions/abc123"),
            "https://af.example/af/v1/policy-authorization/app-sessions/abc123"
        );
    }

    #[test]
    fn keeps_sub_resource_path() {
        assert_eq!(
            rewriter().rewrite("http://10.0.0.1:29507/v1/app-sessions/7/events-subscription"),
            "https://af.example/af/v1/policy-authorization/app-sessions/7/events-subscription"
        );
    }

    #[test]
    fn bare_collection_maps_to_prefix() {
        assert_eq!(
            rewriter().rewrite("https://pcf.example/app-sessions"),
            "https://af.example/af/v1/policy-authorization/app-sessions"
        );
    }

    #[test]
    fn missing_segment_yields_empty() {
        assert_eq!(rewriter().rewrite("https://pcf.example/sessions/1"), "");
        assert_eq!(rewriter().rewrite(""), "");
    }

    #[test]
    fn repeated_segment_yields_empty() {
        assert_eq!(rewriter().rewrite("https://pcf.example/app-sessions/app-sessions/1"), "");
    }

    #[test]
    fn prefix_built_from_server_config() {
        let server = AfServerConfig {
            hostname: "af.example:8050".to_string(),
            cnca_endpoint: "/af/v1".to_string(),
            location_prefix_pa: "/policy-authorization/app-sessions".to_string(),
        };
        assert_eq!(
            LocationRewriter::new(&server).prefix(),
            "https://af.example:8050/af/v1/policy-authorization/app-sessions"
        );
    }
}
