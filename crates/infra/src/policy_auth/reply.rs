//! AF-facing reflection of PCF outcomes
//!
//! Inbound handlers turn a facade result into an [`AfReply`] and return it
//! as the HTTP response to the application.

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use edgeaf_domain::constants::{CONTENT_TYPE_JSON, CONTENT_TYPE_PROBLEM};
use edgeaf_domain::ProblemDetails;
use serde_json::Value;
use tracing::error;

use super::errors::PolicyAuthError;
use super::response::{PcfResponse, ReplyBody};

/// Response sent back to the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AfReply {
    pub status: StatusCode,
    /// Only set for `201 Created`
    pub location: Option<String>,
    pub body: Option<Value>,
    pub content_type: &'static str,
}

impl AfReply {
    pub fn from_result<T: ReplyBody>(result: &Result<PcfResponse<T>, PolicyAuthError>) -> Self {
        match result {
            Ok(response) => Self::success(response),
            Err(err) => Self::failure(err),
        }
    }

    /// Mirror a successful exchange: same status, the resource as body.
    pub fn success<T: ReplyBody>(response: &PcfResponse<T>) -> Self {
        let body = match response.resource().map(T::reply_body).transpose() {
            Ok(body) => body,
            Err(err) => {
                error!(error = %err, "failed to encode reply body");
                return Self::problem(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(500, format!("failed to encode response: {err}")),
                );
            }
        };

        let location = if response.status == StatusCode::CREATED {
            response.location().filter(|location| !location.is_empty()).map(str::to_owned)
        } else {
            None
        };

        Self { status: response.status, location, body, content_type: CONTENT_TYPE_JSON }
    }

    /// Mirror the PCF status and ProblemDetails when the PCF answered;
    /// anything else becomes a 500.
    pub fn failure(err: &PolicyAuthError) -> Self {
        let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let problem = err
            .problem_details()
            .cloned()
            .unwrap_or_else(|| ProblemDetails::new(status.as_u16(), err.to_string()));
        Self::problem(status, problem)
    }

    fn problem(status: StatusCode, problem: ProblemDetails) -> Self {
        let body = serde_json::to_value(&problem).ok();
        Self { status, location: None, body, content_type: CONTENT_TYPE_PROBLEM }
    }
}

impl IntoResponse for AfReply {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => {
                (self.status, [(CONTENT_TYPE, self.content_type)], body.to_string()).into_response()
            }
            None => self.status.into_response(),
        };

        if let Some(location) = self.location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(LOCATION, value);
                }
                Err(err) => {
                    error!(location = %location, error = %err, "dropping unencodable Location");
                }
            }
        }

        response
    }
}
