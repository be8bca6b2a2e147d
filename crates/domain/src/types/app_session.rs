//! Application Session Context resource
//!
//! The individual Application Session Context is the resource an AF creates
//! at the PCF to request QoS treatment for an application's media flows.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::events::{EventsNotification, EventsSubscReqData};
use crate::impl_wire_token_conversions;

/// Opaque identifier of an Application Session Context at the PCF.
///
/// Assigned by the PCF on create (last segment of the `Location` header) and
/// used as a path component for every follow-up operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppSessionId(String);

impl AppSessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the session id from a PCF or AF location URI.
    ///
    /// Returns `None` when the location does not address an individual
    /// application session.
    pub fn from_location(location: &str) -> Option<Self> {
        let (_, rest) = location.split_once(crate::constants::APP_SESSIONS_SEGMENT)?;
        let id = rest.trim_start_matches('/').split('/').next()?;
        if id.is_empty() {
            None
        } else {
            Some(Self::new(id))
        }
    }
}

impl fmt::Display for AppSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppSessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AppSessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Application Session Context body (create request / response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asc_req_data: Option<AppSessionContextReqData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asc_resp_data: Option<AppSessionContextRespData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evs_notif: Option<EventsNotification>,
}

/// Request part of an Application Session Context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSessionContextReqData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_rout_req: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bdt_ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev_subsc: Option<EventsSubscReqData>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub med_components: BTreeMap<String, MediaComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mps_id: Option<String>,
    #[serde(default)]
    pub notif_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spon_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spon_status: Option<SponsoringStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpsi: Option<String>,
    #[serde(default)]
    pub supp_feat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_ipv4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_ipv6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_mac: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response part of an Application Session Context, set by the PCF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSessionContextRespData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serv_auth_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supp_feat: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Merge-patch body of an Application Session Context modification.
///
/// A `None` entry in `med_components` serializes as JSON `null`, which
/// removes that media component at the PCF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSessionContextUpdateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_rout_req: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bdt_ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev_subsc: Option<EventsSubscReqData>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub med_components: BTreeMap<String, Option<MediaComponent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mps_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spon_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spon_status: Option<SponsoringStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One media component of an application session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaComponent {
    pub med_comp_n: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_rout_req: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codecs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_status: Option<FlowStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mar_bw_dl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mar_bw_ul: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mir_bw_dl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mir_bw_ul: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub med_sub_comps: BTreeMap<String, MediaSubComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_prio: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One IP flow (or flow pair) within a media component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSubComponent {
    pub f_num: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub f_descs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_status: Option<FlowStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mar_bw_dl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mar_bw_ul: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tos_tr_cl: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStatus {
    #[serde(rename = "ENABLED-UPLINK")]
    EnabledUplink,
    #[serde(rename = "ENABLED-DOWNLINK")]
    EnabledDownlink,
    Enabled,
    Disabled,
    Removed,
}

impl_wire_token_conversions!(FlowStatus {
    EnabledUplink => "ENABLED-UPLINK",
    EnabledDownlink => "ENABLED-DOWNLINK",
    Enabled => "ENABLED",
    Disabled => "DISABLED",
    Removed => "REMOVED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Audio,
    Video,
    Data,
    Application,
    Control,
    Text,
    Message,
    Other,
}

impl_wire_token_conversions!(MediaType {
    Audio => "AUDIO",
    Video => "VIDEO",
    Data => "DATA",
    Application => "APPLICATION",
    Control => "CONTROL",
    Text => "TEXT",
    Message => "MESSAGE",
    Other => "OTHER",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SponsoringStatus {
    SponsorDisabled,
    SponsorEnabled,
}

impl_wire_token_conversions!(SponsoringStatus {
    SponsorDisabled => "SPONSOR_DISABLED",
    SponsorEnabled => "SPONSOR_ENABLED",
});
