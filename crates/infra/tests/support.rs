//! Shared fixtures for PCF client integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use edgeaf_domain::AfConfig;
use edgeaf_infra::policy_auth::{
    OAuth2TokenProvider, PolicyAuthClient, PolicyAuthError, TokenFetcher, TokenSet,
};
use wiremock::MockServer;

/// Base path the mock PCF serves the API under.
pub const BASE_PATH: &str = "/npcf-policyauthorization/v1";

/// AF-facing collection prefix produced by [`config_for`].
pub const AF_PREFIX: &str = "https://af.example/af/v1/policy-authorization/app-sessions";

/// AF configuration pointing at `server` over plain HTTP.
pub fn config_for(server: &MockServer) -> AfConfig {
    let address = server.address();
    let mut config = AfConfig::default();
    config.server.hostname = "af.example".to_string();
    config.pcf.protocol = "http".to_string();
    config.pcf.hostname = address.ip().to_string();
    config.pcf.port = address.port();
    config.pcf.base_path = BASE_PATH.to_string();
    config.pcf.timeout_secs = 2;
    config
}

/// `{BASE_PATH}/app-sessions{suffix}`
pub fn sessions_path(suffix: &str) -> String {
    format!("{BASE_PATH}/app-sessions{suffix}")
}

/// Absolute PCF location for `suffix` under the mock server.
pub fn pcf_location(server: &MockServer, suffix: &str) -> String {
    format!("{}{}", server.uri(), sessions_path(suffix))
}

/// Token fetcher that hands out `token-1`, `token-2`, ... and counts calls.
#[derive(Default)]
pub struct SequenceFetcher {
    calls: AtomicUsize,
    unreachable: bool,
}

impl SequenceFetcher {
    /// Fetcher whose identity provider never answers successfully.
    pub fn unreachable() -> Self {
        Self { calls: AtomicUsize::new(0), unreachable: true }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenFetcher for SequenceFetcher {
    async fn fetch_token(&self) -> Result<TokenSet, PolicyAuthError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        // Widen the window in which concurrent refreshes overlap.
        tokio::time::sleep(Duration::from_millis(50)).await;
        if self.unreachable {
            return Err(PolicyAuthError::TokenRefresh("identity provider unreachable".into()));
        }
        Ok(TokenSet {
            access_token: format!("token-{n}"),
            token_type: "Bearer".into(),
            expires_at: None,
        })
    }
}

/// Client whose token provider starts with `initial` and refreshes through
/// the returned fetcher.
pub fn client_with_tokens(
    server: &MockServer,
    initial: &str,
) -> (Arc<PolicyAuthClient>, Arc<OAuth2TokenProvider<Arc<SequenceFetcher>>>, Arc<SequenceFetcher>)
{
    client_with_fetcher(server, initial, SequenceFetcher::default())
}

/// Like [`client_with_tokens`], refreshing through `fetcher`.
pub fn client_with_fetcher(
    server: &MockServer,
    initial: &str,
    fetcher: SequenceFetcher,
) -> (Arc<PolicyAuthClient>, Arc<OAuth2TokenProvider<Arc<SequenceFetcher>>>, Arc<SequenceFetcher>)
{
    let fetcher = Arc::new(fetcher);
    let tokens = Arc::new(OAuth2TokenProvider::with_token(Arc::clone(&fetcher), initial));
    let client = PolicyAuthClient::new(&config_for(server), tokens.clone())
        .expect("client should be created");
    (Arc::new(client), tokens, fetcher)
}
