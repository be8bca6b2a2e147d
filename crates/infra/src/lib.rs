//! # EdgeAF Infrastructure
//!
//! I/O side of the Application Function: the Npcf_PolicyAuthorization
//! client and everything it needs to talk to a PCF.
//!
//! This crate contains:
//! - The policy authorization client facade and its response classifier
//! - Bearer token providers (OAuth2 client credentials)
//! - HTTP transport configuration (TLS, HTTP/2, timeouts)
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Wire types and configuration live in `edgeaf-domain`
//! - Contains all "impure" code (network, files, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod policy_auth;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use policy_auth::{
    AccessTokenProvider, AfReply, EventSubscription, PcfOutcome, PcfResponse, PolicyAuthClient,
    PolicyAuthError,
};
