//! Policy authorization error types
//!
//! Every failed PCF exchange ends in exactly one [`PolicyAuthError`]. The
//! category decides how the AF-facing side reflects it.

use std::time::Duration;

use edgeaf_domain::{AfError, ProblemDetails};
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of policy authorization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAuthErrorCategory {
    /// No response was received (connect failure, timeout, cancellation)
    Transport,
    /// A body could not be encoded or decoded
    Serialization,
    /// The PCF answered with a documented error status and ProblemDetails
    Protocol,
    /// The PCF answered with a status outside the operation's contract
    Unclassified,
    /// A bearer token could not be obtained
    Authentication,
    /// Invalid client configuration
    Config,
}

/// Policy authorization operation errors
#[derive(Debug, Error)]
pub enum PolicyAuthError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Failed to build PCF request: {0}")]
    RequestConstruction(String),

    /// A response body did not match its expected schema. `status` is the
    /// effective status: 500 for malformed success bodies, the received
    /// status for malformed error bodies.
    #[error("Malformed PCF response ({status}): {message}")]
    Decode { status: StatusCode, message: String },

    #[error("PCF rejected the request ({status}): {}", problem_summary(.problem))]
    Protocol { status: StatusCode, problem: ProblemDetails },

    #[error("Unexpected PCF status {status}: {}", body_summary(.body))]
    Unclassified { status: StatusCode, body: String },

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PolicyAuthError {
    /// Get the error category for this error
    pub fn category(&self) -> PolicyAuthErrorCategory {
        match self {
            Self::Transport(_) | Self::Timeout(_) | Self::Cancelled => {
                PolicyAuthErrorCategory::Transport
            }
            Self::RequestConstruction(_) | Self::Decode { .. } => {
                PolicyAuthErrorCategory::Serialization
            }
            Self::Protocol { .. } => PolicyAuthErrorCategory::Protocol,
            Self::Unclassified { .. } => PolicyAuthErrorCategory::Unclassified,
            Self::TokenRefresh(_) => PolicyAuthErrorCategory::Authentication,
            Self::Config(_) => PolicyAuthErrorCategory::Config,
        }
    }

    /// Effective HTTP status, when the PCF answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status, .. }
            | Self::Protocol { status, .. }
            | Self::Unclassified { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// ProblemDetails returned by the PCF, if any.
    pub fn problem_details(&self) -> Option<&ProblemDetails> {
        match self {
            Self::Protocol { problem, .. } => Some(problem),
            _ => None,
        }
    }

    /// Whether the request never produced a response.
    pub fn is_transport(&self) -> bool {
        self.category() == PolicyAuthErrorCategory::Transport
    }
}

/// Convert from AfError (transport and configuration failures)
impl From<AfError> for PolicyAuthError {
    fn from(err: AfError) -> Self {
        match err {
            AfError::Config(msg) => Self::Config(msg),
            AfError::InvalidInput(msg) => Self::RequestConstruction(msg),
            AfError::Auth(msg) => Self::TokenRefresh(msg),
            AfError::Network(msg) | AfError::Internal(msg) => Self::Transport(msg),
        }
    }
}

fn problem_summary(problem: &ProblemDetails) -> String {
    match (&problem.title, &problem.detail, &problem.cause) {
        (_, Some(detail), Some(cause)) => format!("{detail} ({cause})"),
        (_, Some(detail), None) => detail.clone(),
        (Some(title), None, _) => title.clone(),
        (None, None, Some(cause)) => cause.clone(),
        (None, None, None) => "no detail".to_string(),
    }
}

fn body_summary(body: &str) -> &str {
    if body.trim().is_empty() {
        "empty response from PCF"
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            PolicyAuthError::Transport("refused".to_string()).category(),
            PolicyAuthErrorCategory::Transport
        );
        assert_eq!(
            PolicyAuthError::Timeout(Duration::from_secs(1)).category(),
            PolicyAuthErrorCategory::Transport
        );
        assert_eq!(PolicyAuthError::Cancelled.category(), PolicyAuthErrorCategory::Transport);
        assert_eq!(
            PolicyAuthError::Decode {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "x".into()
            }
            .category(),
            PolicyAuthErrorCategory::Serialization
        );
        assert_eq!(
            PolicyAuthError::Protocol {
                status: StatusCode::NOT_FOUND,
                problem: ProblemDetails::default()
            }
            .category(),
            PolicyAuthErrorCategory::Protocol
        );
        assert_eq!(
            PolicyAuthError::TokenRefresh("x".to_string()).category(),
            PolicyAuthErrorCategory::Authentication
        );
    }

    #[test]
    fn test_status_only_when_pcf_answered() {
        assert_eq!(PolicyAuthError::Transport("refused".to_string()).status(), None);
        assert_eq!(
            PolicyAuthError::Unclassified { status: StatusCode::IM_A_TEAPOT, body: String::new() }
                .status(),
            Some(StatusCode::IM_A_TEAPOT)
        );
    }

    #[test]
    fn test_display_uses_problem_detail() {
        let err = PolicyAuthError::Protocol {
            status: StatusCode::FORBIDDEN,
            problem: ProblemDetails::new(403, "not allowed").with_cause("UNAUTHORIZED_SPONSORED"),
        };
        assert_eq!(
            err.to_string(),
            "PCF rejected the request (403 Forbidden): not allowed (UNAUTHORIZED_SPONSORED)"
        );
    }

    #[test]
    fn test_display_empty_unclassified_body() {
        let err =
            PolicyAuthError::Unclassified { status: StatusCode::BAD_GATEWAY, body: " ".into() };
        assert!(err.to_string().ends_with("empty response from PCF"));
    }

    #[test]
    fn test_from_af_error() {
        assert!(PolicyAuthError::from(AfError::Network("down".into())).is_transport());
        assert!(matches!(
            PolicyAuthError::from(AfError::Config("bad".into())),
            PolicyAuthError::Config(_)
        ));
    }
}
