//! Error types for the override model

/// Errors raised while constructing or parsing model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Line weight outside the host's pen range
    #[error("line weight {0} out of range (expected 1..=16)")]
    LineWeightOutOfRange(u8),

    /// Transparency outside 0..=100
    #[error("transparency {0} out of range (expected 0..=100)")]
    TransparencyOutOfRange(u8),

    /// Color text could not be parsed
    #[error("invalid color '{0}': expected #RRGGBB or R,G,B")]
    InvalidColor(String),

    /// Identifier text could not be parsed
    #[error("invalid {kind} id: '{value}'")]
    InvalidId {
        /// Which kind of id was expected
        kind: &'static str,
        /// Offending input
        value: String,
    },

    /// Unknown detail level name
    #[error("unknown detail level: '{0}'")]
    UnknownDetailLevel(String),

    /// Filter names must not be blank
    #[error("filter name must not be empty")]
    EmptyName,
}
