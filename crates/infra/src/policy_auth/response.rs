//! Successful PCF exchange results

use edgeaf_domain::{AppSessionContext, EventsNotification, EventsSubscReqData};
use reqwest::StatusCode;

/// Payload of a successful exchange. Exactly one shape per status.
#[derive(Debug, Clone, PartialEq)]
pub enum PcfOutcome<T> {
    /// Resource plus its AF-facing location (empty if the PCF location
    /// could not be rewritten)
    ResourceWithLocation { body: T, location: String },
    ResourceOnly(T),
    Empty,
}

/// Successful PCF exchange: effective status plus payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PcfResponse<T> {
    pub status: StatusCode,
    pub outcome: PcfOutcome<T>,
}

impl<T> PcfResponse<T> {
    pub fn new(status: StatusCode, outcome: PcfOutcome<T>) -> Self {
        Self { status, outcome }
    }

    pub fn resource(&self) -> Option<&T> {
        match &self.outcome {
            PcfOutcome::ResourceWithLocation { body, .. } | PcfOutcome::ResourceOnly(body) => {
                Some(body)
            }
            PcfOutcome::Empty => None,
        }
    }

    pub fn into_resource(self) -> Option<T> {
        match self.outcome {
            PcfOutcome::ResourceWithLocation { body, .. } | PcfOutcome::ResourceOnly(body) => {
                Some(body)
            }
            PcfOutcome::Empty => None,
        }
    }

    /// AF-facing location, when the PCF supplied one.
    pub fn location(&self) -> Option<&str> {
        match &self.outcome {
            PcfOutcome::ResourceWithLocation { location, .. } => Some(location),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, PcfOutcome::Empty)
    }
}

/// Events subscription response body.
///
/// The PCF may answer a subscription update with the subscription, with an
/// immediate notification of already-met events, or with a body carrying
/// both. At least one of the two is present.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSubscription {
    pub subscription: Option<EventsSubscReqData>,
    pub notification: Option<EventsNotification>,
}

/// Response bodies the classifier knows how to decode.
pub trait DecodeBody: Sized {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error>;
}

impl DecodeBody for AppSessionContext {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

impl DecodeBody for EventSubscription {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        let subscription = serde_json::from_slice::<EventsSubscReqData>(body);
        let notification = serde_json::from_slice(body).ok();
        match (subscription, notification) {
            (Err(err), None) => Err(err),
            (subscription, notification) => {
                Ok(Self { subscription: subscription.ok(), notification })
            }
        }
    }
}

/// Operations without a response body.
impl DecodeBody for () {
    fn decode(_body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(())
    }
}

/// Response bodies that can be reflected back to the application.
pub trait ReplyBody {
    fn reply_body(&self) -> Result<serde_json::Value, serde_json::Error>;
}

impl ReplyBody for AppSessionContext {
    fn reply_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// The subscription when present, otherwise the notification.
impl ReplyBody for EventSubscription {
    fn reply_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        match (&self.subscription, &self.notification) {
            (Some(subscription), _) => serde_json::to_value(subscription),
            (None, Some(notification)) => serde_json::to_value(notification),
            (None, None) => Ok(serde_json::Value::Null),
        }
    }
}

impl ReplyBody for () {
    fn reply_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        Ok(serde_json::Value::Null)
    }
}
