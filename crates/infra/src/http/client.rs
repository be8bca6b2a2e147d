use std::path::Path;
use std::time::Duration;

use edgeaf_domain::{AfError, PcfClientConfig};
use reqwest::{Certificate, Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Shared HTTP client for outbound PCF traffic.
///
/// Cloning is cheap and clones share one connection pool. Every request is
/// sent exactly once: PCF operations are not idempotent (create, delete via
/// POST), so retry decisions belong to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, AfError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Client-wide per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute a built request once.
    pub async fn execute(&self, request: Request) -> Result<Response, AfError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let infra: InfraError = err.into();
                Err(AfError::from(infra))
            }
        }
    }

    /// Build and execute the provided request builder.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AfError> {
        let request = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            AfError::from(infra)
        })?;
        self.execute(request).await
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    root_certificate: Option<Vec<u8>>,
    accept_invalid_certs: bool,
    http2_prior_knowledge: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(edgeaf_domain::constants::DEFAULT_PCF_TIMEOUT_SECS),
            user_agent: None,
            root_certificate: None,
            accept_invalid_certs: false,
            http2_prior_knowledge: false,
        }
    }
}

impl HttpClientBuilder {
    /// Transport options for the PCF described by `config`.
    ///
    /// # Errors
    /// Returns `AfError::Config` if the configured CA certificate cannot be
    /// read.
    pub fn for_pcf(config: &PcfClientConfig, user_agent: &str) -> Result<Self, AfError> {
        let mut builder = Self::default()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .http2_prior_knowledge(config.uses_http2());

        if config.uses_tls() {
            if let Some(path) = config.ca_cert.as_deref() {
                builder = builder.root_certificate_pem(read_pem(path)?);
            }
            if !config.verify_certs {
                builder = builder.accept_invalid_certs(true);
            }
        }

        Ok(builder)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Trust an additional CA, PEM encoded.
    pub fn root_certificate_pem(mut self, pem: Vec<u8>) -> Self {
        self.root_certificate = Some(pem);
        self
    }

    /// Skip certificate verification (`verify_certs = false`).
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Speak HTTP/2 only, without HTTP/1.1 upgrade negotiation.
    pub fn http2_prior_knowledge(mut self, enabled: bool) -> Self {
        self.http2_prior_knowledge = enabled;
        self
    }

    pub fn build(self) -> Result<HttpClient, AfError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(pem) = self.root_certificate {
            let certificate = Certificate::from_pem(&pem)
                .map_err(|err| AfError::Config(format!("invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(certificate);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if self.http2_prior_knowledge {
            builder = builder.http2_prior_knowledge();
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            AfError::from(infra)
        })?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, AfError> {
    std::fs::read(path).map_err(|err| {
        AfError::Config(format!("failed to read CA certificate {}: {err}", path.display()))
    })
}
