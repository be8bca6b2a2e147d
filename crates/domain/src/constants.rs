//! Protocol constants
//!
//! Resource path segments and media types of the Npcf_PolicyAuthorization
//! API, plus defaults shared by configuration and the PCF client.

// Resource collection and sub-resource segments
pub const APP_SESSIONS_SEGMENT: &str = "app-sessions";
pub const DELETE_SEGMENT: &str = "delete";
pub const EVENTS_SUBSCRIPTION_SEGMENT: &str = "events-subscription";

// Media types
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_MERGE_PATCH: &str = "application/merge-patch+json";
pub const CONTENT_TYPE_PROBLEM: &str = "application/problem+json";

// AF-facing defaults
pub const DEFAULT_USER_AGENT: &str = "ngc-af";
pub const DEFAULT_CNCA_ENDPOINT: &str = "/af/v1";
pub const DEFAULT_LOCATION_PREFIX_PA: &str = "/policy-authorization/app-sessions";

// Outbound client defaults
pub const DEFAULT_PCF_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PCF_BASE_PATH: &str = "/npcf-policyauthorization/v1";
