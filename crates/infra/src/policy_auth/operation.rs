//! Npcf_PolicyAuthorization operations and their HTTP contract

use std::fmt;

use edgeaf_domain::constants::{
    CONTENT_TYPE_JSON, CONTENT_TYPE_MERGE_PATCH, DELETE_SEGMENT, EVENTS_SUBSCRIPTION_SEGMENT,
};
use reqwest::{Method, StatusCode};

const PROBLEM_STATUSES_WRITE: &[u16] = &[400, 401, 403, 404, 411, 413, 415, 429, 500, 503];
const PROBLEM_STATUSES_GET: &[u16] = &[400, 401, 403, 404, 406, 429, 500, 503];
const PROBLEM_STATUSES_EVENTS_DELETE: &[u16] = &[400, 401, 403, 404, 429, 500, 503];

/// One PCF operation on the app-sessions collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcfOperation {
    CreateAppSession,
    GetAppSession,
    ModifyAppSession,
    DeleteAppSession,
    UpdateEventsSubscription,
    DeleteEventsSubscription,
}

/// How a success status carries its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuccessShape {
    /// Body plus mandatory `Location`
    Created,
    /// Body; `Location` rewritten when present and `location` is set
    Resource { location: bool },
    /// Body, or nothing when the body is empty
    ResourceOrEmpty,
    /// No payload
    Empty,
}

impl PcfOperation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateAppSession => "create_app_session",
            Self::GetAppSession => "get_app_session",
            Self::ModifyAppSession => "modify_app_session",
            Self::DeleteAppSession => "delete_app_session",
            Self::UpdateEventsSubscription => "update_events_subscription",
            Self::DeleteEventsSubscription => "delete_events_subscription",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::CreateAppSession | Self::DeleteAppSession => Method::POST,
            Self::GetAppSession => Method::GET,
            Self::ModifyAppSession => Method::PATCH,
            Self::UpdateEventsSubscription => Method::PUT,
            Self::DeleteEventsSubscription => Method::DELETE,
        }
    }

    /// Whether the operation addresses an individual session.
    pub const fn targets_session(self) -> bool {
        !matches!(self, Self::CreateAppSession)
    }

    /// Path segment appended after the session id.
    pub const fn sub_resource(self) -> Option<&'static str> {
        match self {
            Self::DeleteAppSession => Some(DELETE_SEGMENT),
            Self::UpdateEventsSubscription | Self::DeleteEventsSubscription => {
                Some(EVENTS_SUBSCRIPTION_SEGMENT)
            }
            _ => None,
        }
    }

    /// Content type of the request body.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::ModifyAppSession => CONTENT_TYPE_MERGE_PATCH,
            _ => CONTENT_TYPE_JSON,
        }
    }

    /// Statuses whose body is a ProblemDetails.
    pub const fn problem_statuses(self) -> &'static [u16] {
        match self {
            Self::GetAppSession => PROBLEM_STATUSES_GET,
            Self::DeleteEventsSubscription => PROBLEM_STATUSES_EVENTS_DELETE,
            _ => PROBLEM_STATUSES_WRITE,
        }
    }

    pub fn is_problem_status(self, status: StatusCode) -> bool {
        self.problem_statuses().contains(&status.as_u16())
    }

    pub(crate) fn success_shape(self, status: StatusCode) -> Option<SuccessShape> {
        match (self, status.as_u16()) {
            (Self::CreateAppSession, 201) | (Self::UpdateEventsSubscription, 201) => {
                Some(SuccessShape::Created)
            }
            (Self::GetAppSession | Self::ModifyAppSession, 200) => {
                Some(SuccessShape::Resource { location: false })
            }
            (Self::UpdateEventsSubscription, 200) => {
                Some(SuccessShape::Resource { location: true })
            }
            (Self::DeleteAppSession, 200) => Some(SuccessShape::ResourceOrEmpty),
            (
                Self::DeleteAppSession
                | Self::UpdateEventsSubscription
                | Self::DeleteEventsSubscription,
                204,
            ) => Some(SuccessShape::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for PcfOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
