//! # EdgeAF Domain
//!
//! Policy Authorization domain types for the EdgeAF application function.
//!
//! This crate contains:
//! - Wire bodies exchanged with the PCF (`AppSessionContext`,
//!   `EventsSubscReqData`, `EventsNotification`, `ProblemDetails`)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Protocol constants (resource paths, media types)
//!
//! ## Architecture
//! - No dependencies on other EdgeAF crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
