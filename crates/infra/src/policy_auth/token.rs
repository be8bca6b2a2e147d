//! Bearer tokens for PCF requests
//!
//! Tokens are refreshed reactively: a PCF 401 hands the rejected token back
//! to the provider, which fetches a replacement at most once no matter how
//! many in-flight calls were rejected with it. Callers that queued behind a
//! fetch share its outcome, failed or not.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use edgeaf_domain::OAuth2Config;
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::errors::PolicyAuthError;
use crate::http::HttpClient;

/// Trait for providing bearer tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Token to attach to the next request; `None` sends no Authorization
    /// header.
    async fn current_token(&self) -> Option<String>;

    /// Replace `rejected` with a fresh token.
    ///
    /// A no-op when the held token already differs from `rejected`.
    async fn refresh(&self, rejected: Option<&str>) -> Result<(), PolicyAuthError>;
}

/// Provider for deployments without OAuth2.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl AccessTokenProvider for NoAuth {
    async fn current_token(&self) -> Option<String> {
        None
    }

    async fn refresh(&self, _rejected: Option<&str>) -> Result<(), PolicyAuthError> {
        Ok(())
    }
}

/// Issued access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Token endpoint response (RFC 6749 section 5.1)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at: response
                .expires_in
                .and_then(ChronoDuration::try_seconds)
                .map(|lifetime| Utc::now() + lifetime),
        }
    }
}

/// Source of new tokens.
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(&self) -> Result<TokenSet, PolicyAuthError>;
}

#[async_trait]
impl<F: TokenFetcher + ?Sized> TokenFetcher for Arc<F> {
    async fn fetch_token(&self) -> Result<TokenSet, PolicyAuthError> {
        self.as_ref().fetch_token().await
    }
}

/// OAuth2 client-credentials grant against the configured token URL.
pub struct ClientCredentialsFetcher {
    http: HttpClient,
    config: OAuth2Config,
}

impl ClientCredentialsFetcher {
    pub fn new(http: HttpClient, config: OAuth2Config) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl TokenFetcher for ClientCredentialsFetcher {
    async fn fetch_token(&self) -> Result<TokenSet, PolicyAuthError> {
        let mut params = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.config.client_id.clone()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.clone()));
        }
        if !self.config.scopes.is_empty() {
            params.push(("scope", self.config.scopes.join(" ")));
        }

        debug!(token_url = %self.config.token_url, "requesting client-credentials token");

        let request = self.http.request(Method::POST, &self.config.token_url).form(&params);
        let response = self.http.send(request).await.map_err(|e| {
            PolicyAuthError::TokenRefresh(format!("token endpoint unreachable: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolicyAuthError::TokenRefresh(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PolicyAuthError::TokenRefresh(format!("invalid token response: {e}")))?;

        Ok(token.into())
    }
}

/// Holds the current OAuth2 token and refreshes it single-flight.
pub struct OAuth2TokenProvider<F> {
    fetcher: F,
    token: RwLock<Option<String>>,
    /// Held for the duration of a fetch; stores the error of the latest
    /// attempt, or `None` if it succeeded.
    refresh_gate: Mutex<Option<String>>,
    attempts: AtomicU64,
    refreshes: AtomicU64,
}

impl<F: TokenFetcher> OAuth2TokenProvider<F> {
    /// Provider seeded with a freshly fetched token.
    ///
    /// # Errors
    /// Fails when the initial token cannot be obtained.
    pub async fn initialize(fetcher: F) -> Result<Self, PolicyAuthError> {
        let tokens = fetcher.fetch_token().await?;
        info!(expires_at = ?tokens.expires_at, "obtained initial PCF access token");
        Ok(Self::with_token(fetcher, tokens.access_token))
    }

    /// Provider seeded with an already known token.
    pub fn with_token(fetcher: F, token: impl Into<String>) -> Self {
        Self {
            fetcher,
            token: RwLock::new(Some(token.into())),
            refresh_gate: Mutex::new(None),
            attempts: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Number of tokens fetched since construction (initial token excluded).
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<F: TokenFetcher> AccessTokenProvider for OAuth2TokenProvider<F> {
    async fn current_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn refresh(&self, rejected: Option<&str>) -> Result<(), PolicyAuthError> {
        let observed = self.attempts.load(Ordering::Acquire);
        let mut last_error = self.refresh_gate.lock().await;

        if self.attempts.load(Ordering::Acquire) != observed {
            debug!("reusing outcome of a concurrent token refresh");
            return match last_error.as_ref() {
                Some(message) => Err(PolicyAuthError::TokenRefresh(message.clone())),
                None => Ok(()),
            };
        }

        if self.token.read().await.as_deref() != rejected {
            debug!("token already replaced by a concurrent refresh");
            return Ok(());
        }

        let fetched = self.fetcher.fetch_token().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match fetched {
            Ok(tokens) => {
                *last_error = None;
                *self.token.write().await = Some(tokens.access_token);
                self.refreshes.fetch_add(1, Ordering::AcqRel);
                info!(expires_at = ?tokens.expires_at, "refreshed PCF access token");
                Ok(())
            }
            Err(err) => {
                *last_error = Some(match &err {
                    PolicyAuthError::TokenRefresh(message) => message.clone(),
                    other => other.to_string(),
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail: true }
        }
    }

    #[async_trait]
    impl TokenFetcher for CountingFetcher {
        async fn fetch_token(&self) -> Result<TokenSet, PolicyAuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.fail {
                return Err(PolicyAuthError::TokenRefresh("identity provider down".into()));
            }
            Ok(TokenSet {
                access_token: format!("token-{n}"),
                token_type: "Bearer".into(),
                expires_at: None,
            })
        }
    }

    #[tokio::test]
    async fn refresh_replaces_rejected_token() {
        let provider = OAuth2TokenProvider::with_token(CountingFetcher::new(), "stale");

        provider.refresh(Some("stale")).await.unwrap();

        assert_eq!(provider.current_token().await.as_deref(), Some("token-1"));
        assert_eq!(provider.refresh_count(), 1);
    }

    #[tokio::test]
    async fn refresh_with_outdated_rejection_is_noop() {
        let provider = OAuth2TokenProvider::with_token(CountingFetcher::new(), "current");

        provider.refresh(Some("older")).await.unwrap();

        assert_eq!(provider.current_token().await.as_deref(), Some("current"));
        assert_eq!(provider.refresh_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_refreshes_collapse_into_one_fetch() {
        let provider = Arc::new(OAuth2TokenProvider::with_token(CountingFetcher::new(), "stale"));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let provider = Arc::clone(&provider);
                tokio::spawn(async move { provider.refresh(Some("stale")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(provider.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.current_token().await.as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_token() {
        let provider = OAuth2TokenProvider::with_token(CountingFetcher::failing(), "stale");

        let err = provider.refresh(Some("stale")).await.unwrap_err();

        assert!(matches!(err, PolicyAuthError::TokenRefresh(_)));
        assert_eq!(provider.current_token().await.as_deref(), Some("stale"));
        assert_eq!(provider.refresh_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_failed_refreshes_share_one_fetch() {
        let provider =
            Arc::new(OAuth2TokenProvider::with_token(CountingFetcher::failing(), "stale"));

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let provider = Arc::clone(&provider);
                tokio::spawn(async move { provider.refresh(Some("stale")).await })
            })
            .collect();
        for task in tasks {
            let err = task.await.unwrap().unwrap_err();
            match err {
                PolicyAuthError::TokenRefresh(msg) => assert_eq!(msg, "identity provider down"),
                other => panic!("unexpected {other:?}"),
            }
        }

        assert_eq!(provider.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.current_token().await.as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn later_rejection_after_failed_refresh_fetches_again() {
        let provider = OAuth2TokenProvider::with_token(CountingFetcher::failing(), "stale");

        assert!(provider.refresh(Some("stale")).await.is_err());
        assert!(provider.refresh(Some("stale")).await.is_err());

        assert_eq!(provider.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn initialize_fails_without_token() {
        let result = OAuth2TokenProvider::initialize(CountingFetcher::failing()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn no_auth_never_attaches_token() {
        assert!(NoAuth.current_token().await.is_none());
        assert!(NoAuth.refresh(None).await.is_ok());
    }

    fn oauth_config(server: &MockServer) -> OAuth2Config {
        OAuth2Config {
            token_url: format!("{}/oauth2/token", server.uri()),
            client_id: "af".to_string(),
            client_secret: Some("s3cret".to_string()),
            scopes: vec!["npcf-policyauthorization".to_string()],
        }
    }

    #[tokio::test]
    async fn client_credentials_grant_is_form_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_secret=s3cret"))
            .and(body_string_contains("scope=npcf-policyauthorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "issued",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher =
            ClientCredentialsFetcher::new(HttpClient::new().unwrap(), oauth_config(&server));
        let tokens = fetcher.fetch_token().await.unwrap();

        assert_eq!(tokens.access_token, "issued");
        assert!(tokens.expires_at.is_some());
    }

    #[tokio::test]
    async fn token_endpoint_rejection_is_refresh_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#),
            )
            .mount(&server)
            .await;

        let fetcher =
            ClientCredentialsFetcher::new(HttpClient::new().unwrap(), oauth_config(&server));
        let err = fetcher.fetch_token().await.unwrap_err();

        match err {
            PolicyAuthError::TokenRefresh(msg) => assert!(msg.contains("invalid_client")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
