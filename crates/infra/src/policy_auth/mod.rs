//! Npcf_PolicyAuthorization client
//!
//! Outbound side of the AF: creates, reads, modifies and deletes
//! Application Session Contexts and their Events Subscription at the PCF,
//! and turns each exchange into a typed outcome.

pub mod classify;
pub mod client;
pub mod errors;
pub mod location;
pub mod operation;
pub mod reply;
pub mod request;
pub mod response;
pub mod token;

pub use classify::{classify, Classified, RawResponse};
pub use client::{PolicyAuthClient, PolicyAuthClientBuilder};
pub use errors::{PolicyAuthError, PolicyAuthErrorCategory};
pub use location::LocationRewriter;
pub use operation::PcfOperation;
pub use reply::AfReply;
pub use request::RequestBuilder;
pub use response::{DecodeBody, EventSubscription, PcfOutcome, PcfResponse, ReplyBody};
pub use token::{
    AccessTokenProvider, ClientCredentialsFetcher, NoAuth, OAuth2TokenProvider, TokenFetcher,
    TokenSet,
};
