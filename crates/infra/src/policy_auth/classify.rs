//! Response classification
//!
//! Maps a PCF status and body onto exactly one [`Classified`] case using the
//! operation's contract (see [`PcfOperation`]).

use edgeaf_domain::ProblemDetails;
use reqwest::StatusCode;
use tracing::{error, warn};

use super::errors::PolicyAuthError;
use super::location::LocationRewriter;
use super::operation::{PcfOperation, SuccessShape};
use super::response::{DecodeBody, PcfOutcome, PcfResponse};

/// What came back from the PCF, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    /// `Location` header, verbatim
    pub location: Option<String>,
    pub body: Vec<u8>,
}

/// Interpreted PCF response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<T> {
    ResourceWithLocation { status: StatusCode, body: T, location: String },
    ResourceOnly { status: StatusCode, body: T },
    Empty { status: StatusCode },
    Problem { status: StatusCode, problem: ProblemDetails },
    Unclassified { status: StatusCode, body: String },
}

impl<T> Classified<T> {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ResourceWithLocation { status, .. }
            | Self::ResourceOnly { status, .. }
            | Self::Empty { status }
            | Self::Problem { status, .. }
            | Self::Unclassified { status, .. } => *status,
        }
    }

    /// Split into the caller-facing contract: success payloads are `Ok`,
    /// everything else is an error.
    pub fn into_result(self) -> Result<PcfResponse<T>, PolicyAuthError> {
        match self {
            Self::ResourceWithLocation { status, body, location } => {
                Ok(PcfResponse::new(status, PcfOutcome::ResourceWithLocation { body, location }))
            }
            Self::ResourceOnly { status, body } => {
                Ok(PcfResponse::new(status, PcfOutcome::ResourceOnly(body)))
            }
            Self::Empty { status } => Ok(PcfResponse::new(status, PcfOutcome::Empty)),
            Self::Problem { status, problem } => Err(PolicyAuthError::Protocol { status, problem }),
            Self::Unclassified { status, body } => {
                Err(PolicyAuthError::Unclassified { status, body })
            }
        }
    }
}

/// Classify `raw` as a response to `op`.
///
/// # Errors
/// Returns [`PolicyAuthError::Decode`] when a body does not match its
/// expected schema: a malformed success body (or a created resource without
/// `Location`) carries status 500, a malformed ProblemDetails carries the
/// received status.
pub fn classify<T: DecodeBody>(
    op: PcfOperation,
    raw: &RawResponse,
    locations: &LocationRewriter,
) -> Result<Classified<T>, PolicyAuthError> {
    let status = raw.status;

    if let Some(shape) = op.success_shape(status) {
        return classify_success(op, shape, raw, locations);
    }

    if op.is_problem_status(status) {
        return match serde_json::from_slice::<ProblemDetails>(&raw.body) {
            Ok(problem) => Ok(Classified::Problem { status, problem }),
            Err(err) => {
                error!(
                    operation = op.name(),
                    %status,
                    error = %err,
                    "malformed ProblemDetails from PCF"
                );
                Err(PolicyAuthError::Decode {
                    status,
                    message: format!("invalid ProblemDetails: {err}"),
                })
            }
        };
    }

    let body = String::from_utf8_lossy(&raw.body).into_owned();
    warn!(operation = op.name(), %status, body = %body, "PCF returned an unexpected status");
    Ok(Classified::Unclassified { status, body })
}

fn classify_success<T: DecodeBody>(
    op: PcfOperation,
    shape: SuccessShape,
    raw: &RawResponse,
    locations: &LocationRewriter,
) -> Result<Classified<T>, PolicyAuthError> {
    let status = raw.status;

    match shape {
        SuccessShape::Empty => Ok(Classified::Empty { status }),
        SuccessShape::ResourceOrEmpty if raw.body.iter().all(u8::is_ascii_whitespace) => {
            Ok(Classified::Empty { status })
        }
        SuccessShape::ResourceOrEmpty | SuccessShape::Resource { location: false } => {
            let body = decode_success(op, raw)?;
            Ok(Classified::ResourceOnly { status, body })
        }
        SuccessShape::Resource { location: true } => {
            let body = decode_success(op, raw)?;
            Ok(match raw.location.as_deref() {
                Some(pcf_location) => Classified::ResourceWithLocation {
                    status,
                    body,
                    location: locations.rewrite(pcf_location),
                },
                None => Classified::ResourceOnly { status, body },
            })
        }
        SuccessShape::Created => {
            let body = decode_success(op, raw)?;
            let Some(pcf_location) = raw.location.as_deref() else {
                error!(operation = op.name(), %status, "PCF created a resource without Location");
                return Err(PolicyAuthError::Decode {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "missing Location header".to_string(),
                });
            };
            Ok(Classified::ResourceWithLocation {
                status,
                body,
                location: locations.rewrite(pcf_location),
            })
        }
    }
}

fn decode_success<T: DecodeBody>(
    op: PcfOperation,
    raw: &RawResponse,
) -> Result<T, PolicyAuthError> {
    T::decode(&raw.body).map_err(|err| {
        error!(
            operation = op.name(),
            status = %raw.status,
            error = %err,
            "malformed PCF response body"
        );
        PolicyAuthError::Decode {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("invalid {} response body: {err}", op.name()),
        }
    })
}
