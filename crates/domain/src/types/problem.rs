//! RFC 7807 problem details, as used by the 3GPP service based interfaces

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Application error cause defined by the producing service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_params: Vec<InvalidParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProblemDetails {
    /// Problem with only a status and a human readable detail.
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self { status: Some(status), detail: Some(detail.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidParam {
    pub param: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_3gpp_problem() {
        let problem: ProblemDetails = serde_json::from_value(json!({
            "type": "https://pcf.example/problems/bad-request",
            "title": "Bad Request",
            "status": 400,
            "detail": "medComponents missing",
            "cause": "REQUESTED_SERVICE_NOT_AUTHORIZED",
            "invalidParams": [{ "param": "/ascReqData/medComponents" }]
        }))
        .unwrap();

        assert_eq!(problem.status, Some(400));
        assert_eq!(problem.cause.as_deref(), Some("REQUESTED_SERVICE_NOT_AUTHORIZED"));
        assert_eq!(problem.invalid_params[0].param, "/ascReqData/medComponents");
        assert!(problem.invalid_params[0].reason.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let problem = ProblemDetails::new(503, "PCF overloaded")
            .with_title("Service Unavailable")
            .with_cause("SYSTEM_FAILURE");

        assert_eq!(
            serde_json::to_value(&problem).unwrap(),
            json!({
                "title": "Service Unavailable",
                "status": 503,
                "detail": "PCF overloaded",
                "cause": "SYSTEM_FAILURE"
            })
        );
    }

    #[test]
    fn plain_text_is_not_a_problem() {
        assert!(serde_json::from_str::<ProblemDetails>("upstream connect error").is_err());
    }
}
