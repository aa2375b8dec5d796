//! Domain error types.
//!
//! These errors represent invalid caller input in the domain layer. They
//! are distinct from API/IO errors. Malformed timing strings are not an
//! error at all; see [`super::ParsedTime`].

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An adjustment entry is not `Key=minutes`
    #[error("invalid adjustment entry: {0:?} (expected Key=minutes)")]
    InvalidAdjustment(String),

    /// Unknown adjustment profile name
    #[error("unknown adjustment profile: {0:?} (expected extended, standard or none)")]
    UnknownProfile(String),

    /// Date string is not `DD-MM-YYYY`
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
}
