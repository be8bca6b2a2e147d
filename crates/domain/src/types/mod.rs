//! Npcf_PolicyAuthorization wire types
//!
//! Bodies exchanged with the PCF. Every struct keeps attributes it does not
//! model in a flattened `extra` map, so a body decoded from the PCF encodes
//! back without losing fields.

pub mod app_session;
pub mod events;
pub mod problem;

pub use app_session::{
    AppSessionContext, AppSessionContextReqData, AppSessionContextRespData,
    AppSessionContextUpdateData, AppSessionId, FlowStatus, MediaComponent, MediaSubComponent,
    MediaType, SponsoringStatus,
};
pub use events::{
    AfEvent, AfEventNotification, AfEventSubscription, AfNotifMethod, EventsNotification,
    EventsSubscReqData, Flows, UsageThreshold,
};
pub use problem::{InvalidParam, ProblemDetails};
