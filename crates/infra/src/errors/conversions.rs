//! Conversions from external infrastructure errors into domain errors.

use edgeaf_domain::AfError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AfError);

impl From<InfraError> for AfError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AfError> for InfraError {
    fn from(value: AfError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAfError {
    fn into_af(self) -> AfError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AfError */
/* -------------------------------------------------------------------------- */

impl IntoAfError for HttpError {
    fn into_af(self) -> AfError {
        if self.is_timeout() {
            return AfError::Network("HTTP request timed out".into());
        }

        if self.is_builder() {
            return AfError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return AfError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return AfError::Network(format!("failed to read HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => AfError::Auth(message),
                400..=499 => AfError::InvalidInput(message),
                _ => AfError::Network(message),
            };
        }

        AfError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_af())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: AfError = InfraError::from(error).into();
        match mapped {
            AfError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: AfError = InfraError::from(error).into();
        assert!(matches!(mapped, AfError::Network(_)), "got {mapped:?}");
    }
}
