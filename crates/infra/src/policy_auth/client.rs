//! Npcf_PolicyAuthorization client facade
//!
//! One async method per App Session Context lifecycle operation. Every call
//! runs the same pipeline: build the request, send it once, refresh the
//! bearer token on 401, classify the response, rewrite locations.

use std::sync::Arc;
use std::time::Duration;

use edgeaf_domain::{
    AfConfig, AppSessionContext, AppSessionContextUpdateData, AppSessionId, EventsSubscReqData,
};
use reqwest::header::LOCATION;
use reqwest::{Request, StatusCode};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::classify::{classify, Classified, RawResponse};
use super::errors::PolicyAuthError;
use super::location::LocationRewriter;
use super::operation::PcfOperation;
use super::request::RequestBuilder;
use super::response::{DecodeBody, EventSubscription, PcfResponse};
use super::token::{AccessTokenProvider, ClientCredentialsFetcher, NoAuth, OAuth2TokenProvider};
use crate::http::{HttpClient, HttpClientBuilder};

/// Policy authorization client, shared by all request handlers.
pub struct PolicyAuthClient {
    http: HttpClient,
    requests: RequestBuilder,
    tokens: Arc<dyn AccessTokenProvider>,
    locations: LocationRewriter,
    notif_uri: Option<String>,
}

impl PolicyAuthClient {
    /// Create a client that takes bearer tokens from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns `PolicyAuthError::Config` if the PCF root URI is invalid or
    /// the transport cannot be configured.
    pub fn new(
        config: &AfConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, PolicyAuthError> {
        let http = HttpClientBuilder::for_pcf(&config.pcf, &config.user_agent)?.build()?;
        let requests = RequestBuilder::new(&config.pcf.root_uri())?;

        info!(
            protocol = %config.pcf.protocol,
            protocol_version = %config.pcf.protocol_version,
            oauth2 = config.pcf.oauth2.is_some(),
            verify_certs = config.pcf.verify_certs,
            resource_uri = %requests.root(),
            "PCF policy authorization client configured"
        );

        Ok(Self {
            http,
            requests,
            tokens,
            locations: LocationRewriter::new(&config.server),
            notif_uri: config.pcf.notif_uri.clone(),
        })
    }

    /// Create a client with the token source `config` asks for.
    ///
    /// With OAuth2 configured the first token is fetched here, and a failure
    /// to obtain it fails construction.
    ///
    /// # Errors
    ///
    /// Returns `PolicyAuthError::Config` for invalid configuration and
    /// `PolicyAuthError::TokenRefresh` if the initial token fetch fails.
    pub async fn connect(config: &AfConfig) -> Result<Self, PolicyAuthError> {
        let tokens: Arc<dyn AccessTokenProvider> = match &config.pcf.oauth2 {
            Some(oauth2) => {
                let http = HttpClient::builder()
                    .timeout(Duration::from_secs(config.pcf.timeout_secs))
                    .user_agent(config.user_agent.clone())
                    .build()?;
                let fetcher = ClientCredentialsFetcher::new(http, oauth2.clone());
                Arc::new(OAuth2TokenProvider::initialize(fetcher).await?)
            }
            None => Arc::new(NoAuth),
        };

        Self::new(config, tokens)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> PolicyAuthClientBuilder {
        PolicyAuthClientBuilder::default()
    }

    /// `{protocol}://{host}:{port}{base_path}` of the PCF.
    pub fn resource_uri(&self) -> &Url {
        self.requests.root()
    }

    /// POST `/app-sessions`
    ///
    /// # Errors
    ///
    /// Any outcome other than `201 Created` with a decodable body.
    #[instrument(skip_all, fields(operation = "create_app_session"))]
    pub async fn create_app_session(
        &self,
        cancel: &CancellationToken,
        ctx: &AppSessionContext,
    ) -> Result<PcfResponse<AppSessionContext>, PolicyAuthError> {
        self.exchange(cancel, PcfOperation::CreateAppSession, None, Some(ctx)).await
    }

    /// GET `/app-sessions/{id}`
    ///
    /// # Errors
    ///
    /// Any outcome other than `200 OK` with a decodable body.
    #[instrument(skip_all, fields(operation = "get_app_session", app_session_id = %id))]
    pub async fn get_app_session(
        &self,
        cancel: &CancellationToken,
        id: &AppSessionId,
    ) -> Result<PcfResponse<AppSessionContext>, PolicyAuthError> {
        self.exchange::<_, ()>(cancel, PcfOperation::GetAppSession, Some(id), None).await
    }

    /// PATCH `/app-sessions/{id}` with a merge-patch body
    ///
    /// # Errors
    ///
    /// Any outcome other than `200 OK` with a decodable body.
    #[instrument(skip_all, fields(operation = "modify_app_session", app_session_id = %id))]
    pub async fn modify_app_session(
        &self,
        cancel: &CancellationToken,
        id: &AppSessionId,
        update: &AppSessionContextUpdateData,
    ) -> Result<PcfResponse<AppSessionContext>, PolicyAuthError> {
        self.exchange(cancel, PcfOperation::ModifyAppSession, Some(id), Some(update)).await
    }

    /// POST `/app-sessions/{id}/delete`
    ///
    /// `events` asks the PCF to report those events in the response.
    /// Deleting a session the PCF no longer knows is a `404` error.
    ///
    /// # Errors
    ///
    /// Any outcome other than `200 OK` or `204 No Content`.
    #[instrument(skip_all, fields(operation = "delete_app_session", app_session_id = %id))]
    pub async fn delete_app_session(
        &self,
        cancel: &CancellationToken,
        id: &AppSessionId,
        events: Option<EventsSubscReqData>,
    ) -> Result<PcfResponse<AppSessionContext>, PolicyAuthError> {
        let events = events.map(|events| self.stamp_notif_uri(events));
        self.exchange(cancel, PcfOperation::DeleteAppSession, Some(id), events.as_ref()).await
    }

    /// PUT `/app-sessions/{id}/events-subscription`
    ///
    /// # Errors
    ///
    /// Any outcome other than `200 OK`, `201 Created` or `204 No Content`.
    #[instrument(skip_all, fields(operation = "update_events_subscription", app_session_id = %id))]
    pub async fn update_events_subscription(
        &self,
        cancel: &CancellationToken,
        id: &AppSessionId,
        events: EventsSubscReqData,
    ) -> Result<PcfResponse<EventSubscription>, PolicyAuthError> {
        let events = self.stamp_notif_uri(events);
        self.exchange(cancel, PcfOperation::UpdateEventsSubscription, Some(id), Some(&events))
            .await
    }

    /// DELETE `/app-sessions/{id}/events-subscription`
    ///
    /// # Errors
    ///
    /// Any outcome other than `204 No Content`.
    #[instrument(skip_all, fields(operation = "delete_events_subscription", app_session_id = %id))]
    pub async fn delete_events_subscription(
        &self,
        cancel: &CancellationToken,
        id: &AppSessionId,
    ) -> Result<PcfResponse<()>, PolicyAuthError> {
        self.exchange::<_, ()>(cancel, PcfOperation::DeleteEventsSubscription, Some(id), None).await
    }

    /// The AF always directs PCF notifications at itself.
    fn stamp_notif_uri(&self, mut events: EventsSubscReqData) -> EventsSubscReqData {
        if let Some(uri) = &self.notif_uri {
            events.notif_uri = Some(uri.clone());
        }
        events
    }

    async fn exchange<T, B>(
        &self,
        cancel: &CancellationToken,
        op: PcfOperation,
        session: Option<&AppSessionId>,
        body: Option<&B>,
    ) -> Result<PcfResponse<T>, PolicyAuthError>
    where
        T: DecodeBody,
        B: Serialize + ?Sized + Sync,
    {
        let token = self.tokens.current_token().await;
        let request = self.requests.build(&self.http, op, session, body, token.as_deref())?;

        debug!(method = %request.method(), url = %request.url(), "sending PCF request");

        let raw = self.send(cancel, request).await.inspect_err(|err| {
            warn!(error = %err, "PCF request failed without a response");
        })?;

        if raw.status == StatusCode::UNAUTHORIZED {
            self.refresh_rejected_token(token.as_deref()).await;
        }

        let result = classify::<T>(op, &raw, &self.locations).and_then(Classified::into_result);
        match &result {
            Ok(response) => info!(status = %response.status, "PCF request succeeded"),
            Err(err) => warn!(status = ?err.status(), error = %err, "PCF request failed"),
        }
        result
    }

    async fn send(
        &self,
        cancel: &CancellationToken,
        request: Request,
    ) -> Result<RawResponse, PolicyAuthError> {
        let timeout = self.http.timeout();
        let exchange = async {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await.map_err(|e| {
                PolicyAuthError::Transport(format!("failed to read PCF response body: {e}"))
            })?;
            Ok::<_, PolicyAuthError>(RawResponse { status, location, body: body.to_vec() })
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PolicyAuthError::Cancelled),
            result = tokio::time::timeout(timeout, exchange) => {
                result.unwrap_or(Err(PolicyAuthError::Timeout(timeout)))
            }
        }
    }

    /// A failed refresh leaves the 401 outcome untouched.
    async fn refresh_rejected_token(&self, rejected: Option<&str>) {
        match self.tokens.refresh(rejected).await {
            Ok(()) => debug!("bearer token refreshed after 401"),
            Err(err) => warn!(error = %err, "bearer token refresh failed"),
        }
    }
}

/// Builder for [`PolicyAuthClient`]
#[derive(Default)]
pub struct PolicyAuthClientBuilder {
    config: Option<AfConfig>,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
}

impl PolicyAuthClientBuilder {
    /// Set the AF configuration
    pub fn config(mut self, config: AfConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the bearer token provider
    pub fn tokens(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the client
    ///
    /// Without an explicit provider, requests carry no bearer token; that is
    /// refused when the configuration enables OAuth2.
    ///
    /// # Errors
    ///
    /// Returns `PolicyAuthError::Config` if the configuration is missing or
    /// invalid.
    pub fn build(self) -> Result<PolicyAuthClient, PolicyAuthError> {
        let config =
            self.config.ok_or_else(|| PolicyAuthError::Config("AF config not set".to_string()))?;
        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None if config.pcf.oauth2.is_some() => {
                return Err(PolicyAuthError::Config(
                    "OAuth2 is configured but no token provider was set".to_string(),
                ))
            }
            None => Arc::new(NoAuth),
        };

        PolicyAuthClient::new(&config, tokens)
    }
}
