//! Events Subscription sub-resource and event notifications

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_wire_token_conversions;

/// Events the AF subscribes to at the PCF.
///
/// `events` is mandatory on the wire; a body without it is not a
/// subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsSubscReqData {
    pub events: Vec<AfEventSubscription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notif_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usg_thres: Option<UsageThreshold>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventsSubscReqData {
    /// Subscription to `events`, notified by event detection.
    pub fn for_events(events: impl IntoIterator<Item = AfEvent>) -> Self {
        Self {
            events: events
                .into_iter()
                .map(|event| AfEventSubscription { event, notif_method: None })
                .collect(),
            ..Self::default()
        }
    }

    /// Whether `event` is part of this subscription.
    pub fn contains(&self, event: AfEvent) -> bool {
        self.events.iter().any(|sub| sub.event == event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfEventSubscription {
    pub event: AfEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notif_method: Option<AfNotifMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink_volume: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_volume: Option<u64>,
}

/// Notification of events the PCF reports, either pushed to the AF's
/// notification URI or returned inline with a subscription response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsNotification {
    pub ev_subs_uri: String,
    pub ev_notifs: Vec<AfEventNotification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plmn_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usg_rep: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfEventNotification {
    pub event: AfEvent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flows>,
}

/// Flows (by media component / flow number) an event applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flows {
    pub med_comp_n: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cont_vers: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub f_nums: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfEvent {
    AccessTypeChange,
    AniReport,
    ChargingCorrelation,
    FailedResourcesAllocation,
    OutOfCredit,
    PlmnChg,
    QosNotif,
    QosMonitoring,
    RanNasRelCause,
    RecoveryOfCredit,
    SuccessfulResourcesAllocation,
    UsageReport,
}

impl_wire_token_conversions!(AfEvent {
    AccessTypeChange => "ACCESS_TYPE_CHANGE",
    AniReport => "ANI_REPORT",
    ChargingCorrelation => "CHARGING_CORRELATION",
    FailedResourcesAllocation => "FAILED_RESOURCES_ALLOCATION",
    OutOfCredit => "OUT_OF_CREDIT",
    PlmnChg => "PLMN_CHG",
    QosNotif => "QOS_NOTIF",
    QosMonitoring => "QOS_MONITORING",
    RanNasRelCause => "RAN_NAS_REL_CAUSE",
    RecoveryOfCredit => "RECOVERY_OF_CREDIT",
    SuccessfulResourcesAllocation => "SUCCESSFUL_RESOURCES_ALLOCATION",
    UsageReport => "USAGE_REPORT",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfNotifMethod {
    EventDetection,
    OneTime,
    Periodic,
}

impl_wire_token_conversions!(AfNotifMethod {
    EventDetection => "EVENT_DETECTION",
    OneTime => "ONE_TIME",
    Periodic => "PERIODIC",
});
