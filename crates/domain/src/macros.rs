//! Macro for implementing Display and FromStr for wire-token enums
//!
//! The Npcf_PolicyAuthorization API carries several enumerations as bare
//! string tokens (`"QOS_NOTIF"`, `"PUSH"`, ...). This macro gives such enums
//! a single, consistent string mapping for both Display and FromStr.
//!
//! # Example
//!
//! ```rust
//! use edgeaf_domain::impl_wire_token_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum NotifMethod {
//!     EventDetection,
//!     OneTime,
//! }
//!
//! impl_wire_token_conversions!(NotifMethod {
//!     EventDetection => "EVENT_DETECTION",
//!     OneTime => "ONE_TIME",
//! });
//!
//! assert_eq!(NotifMethod::OneTime.to_string(), "ONE_TIME");
//! assert_eq!("event_detection".parse::<NotifMethod>().unwrap(), NotifMethod::EventDetection);
//! ```

/// Implements Display and FromStr traits for wire-token enums
///
/// This macro generates:
/// - Display trait: writes the exact wire token
/// - FromStr trait: parses the token ignoring ASCII case
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire tokens
#[macro_export]
macro_rules! impl_wire_token_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
