//! Outbound request construction

use edgeaf_domain::constants::{APP_SESSIONS_SEGMENT, CONTENT_TYPE_JSON};
use edgeaf_domain::AppSessionId;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Request;
use serde::Serialize;
use url::Url;

use super::errors::PolicyAuthError;
use super::operation::PcfOperation;
use crate::http::HttpClient;

/// Builds PCF requests under a fixed API root.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    root: Url,
}

impl RequestBuilder {
    /// # Errors
    /// Returns `PolicyAuthError::Config` if `root_uri` is not an absolute
    /// hierarchical URL.
    pub fn new(root_uri: &str) -> Result<Self, PolicyAuthError> {
        let root = Url::parse(root_uri)
            .map_err(|e| PolicyAuthError::Config(format!("invalid PCF root URI {root_uri}: {e}")))?;
        if root.cannot_be_a_base() {
            return Err(PolicyAuthError::Config(format!("PCF root URI {root_uri} has no path")));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// URL of `op`, with the session id as one percent-encoded segment.
    pub fn url(
        &self,
        op: PcfOperation,
        session: Option<&AppSessionId>,
    ) -> Result<Url, PolicyAuthError> {
        let mut url = self.root.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                PolicyAuthError::RequestConstruction("PCF root URI cannot be a base".to_string())
            })?;
            segments.pop_if_empty().push(APP_SESSIONS_SEGMENT);

            if op.targets_session() {
                let id = session.map(AppSessionId::as_str).unwrap_or_default();
                if id.is_empty() {
                    return Err(PolicyAuthError::RequestConstruction(format!(
                        "{op} requires an app session id"
                    )));
                }
                segments.push(id);
            }

            if let Some(sub_resource) = op.sub_resource() {
                segments.push(sub_resource);
            }
        }
        Ok(url)
    }

    /// Assemble the request for `op`.
    ///
    /// # Errors
    /// Returns `PolicyAuthError::RequestConstruction` if the body cannot be
    /// encoded or the URL is malformed.
    pub fn build<B: Serialize + ?Sized>(
        &self,
        http: &HttpClient,
        op: PcfOperation,
        session: Option<&AppSessionId>,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<Request, PolicyAuthError> {
        let url = self.url(op, session)?;
        let mut builder = http.request(op.method(), url).header(ACCEPT, CONTENT_TYPE_JSON);

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(|e| {
                PolicyAuthError::RequestConstruction(format!("failed to encode {op} body: {e}"))
            })?;
            builder = builder.header(CONTENT_TYPE, op.content_type()).body(encoded);
        }

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder.build().map_err(|e| PolicyAuthError::RequestConstruction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use edgeaf_domain::{AppSessionContextUpdateData, EventsSubscReqData};
    use reqwest::header::AUTHORIZATION;

    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("https://pcf.example:29507/npcf-policyauthorization/v1").unwrap()
    }

    fn http() -> HttpClient {
        HttpClient::new().unwrap()
    }

    #[test]
    fn collection_url_for_create() {
        let url = builder().url(PcfOperation::CreateAppSession, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://pcf.example:29507/npcf-policyauthorization/v1/app-sessions"
        );
    }

    #[test]
    fn trailing_slash_on_root_is_tolerated() {
        let builder = RequestBuilder::new("http://pcf.example/v1/").unwrap();
        let url = builder.url(PcfOperation::GetAppSession, Some(&"s1".into())).unwrap();
        assert_eq!(url.as_str(), "http://pcf.example/v1/app-sessions/s1");
    }

    #[test]
    fn sub_resources_follow_session_id() {
        let id = AppSessionId::new("s1");
        assert!(builder()
            .url(PcfOperation::DeleteAppSession, Some(&id))
            .unwrap()
            .as_str()
            .ends_with("/app-sessions/s1/delete"));
        assert!(builder()
            .url(PcfOperation::DeleteEventsSubscription, Some(&id))
            .unwrap()
            .as_str()
            .ends_with("/app-sessions/s1/events-subscription"));
    }

    #[test]
    fn session_id_is_one_encoded_segment() {
        let id = AppSessionId::new("a/b c");
        let url = builder().url(PcfOperation::GetAppSession, Some(&id)).unwrap();
        assert!(url.as_str().ends_with("/app-sessions/a%2Fb%20c"), "{url}");
    }

    #[test]
    fn missing_session_id_is_rejected() {
        let err = builder().url(PcfOperation::GetAppSession, None).unwrap_err();
        assert!(matches!(err, PolicyAuthError::RequestConstruction(_)));

        let err = builder().url(PcfOperation::GetAppSession, Some(&"".into())).unwrap_err();
        assert!(matches!(err, PolicyAuthError::RequestConstruction(_)));
    }

    #[test]
    fn invalid_root_is_config_error() {
        assert!(matches!(RequestBuilder::new("not a url"), Err(PolicyAuthError::Config(_))));
        assert!(matches!(
            RequestBuilder::new("mailto:pcf@example"),
            Err(PolicyAuthError::Config(_))
        ));
    }

    #[test]
    fn patch_uses_merge_patch_and_bearer() {
        let request = builder()
            .build(
                &http(),
                PcfOperation::ModifyAppSession,
                Some(&"s1".into()),
                Some(&AppSessionContextUpdateData::default()),
                Some("tok"),
            )
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::PATCH);
        assert_eq!(request.headers()[CONTENT_TYPE], "application/merge-patch+json");
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn bodyless_request_has_no_content_type_or_token() {
        let request = builder()
            .build::<EventsSubscReqData>(
                &http(),
                PcfOperation::DeleteAppSession,
                Some(&"s1".into()),
                None,
                None,
            )
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn unencodable_body_is_request_construction_error() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("boom"))
            }
        }

        let err = builder()
            .build(&http(), PcfOperation::CreateAppSession, None, Some(&Broken), None)
            .unwrap_err();
        assert!(matches!(err, PolicyAuthError::RequestConstruction(msg) if msg.contains("boom")));
    }
}
