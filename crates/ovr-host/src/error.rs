//! Host error types
//!
//! Failures reported by the document collaborator. The engine treats these as
//! opaque apart from [`HostError::NotAttached`], which drives scope resolution.

use ovr_model::{FilterId, OverrideScope, ViewId};

/// Errors reported by a [`crate::HostDocument`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Filter is not attached to the view
    #[error("{0} is not attached")]
    NotAttached(OverrideScope),

    /// View id does not resolve
    #[error("unknown view: {0}")]
    UnknownView(ViewId),

    /// Filter id does not resolve
    #[error("unknown filter: {0}")]
    UnknownFilter(FilterId),

    /// Host refused a filter name
    #[error("filter name '{name}' rejected: {reason}")]
    NameRejected {
        /// Requested name
        name: String,
        /// Host explanation
        reason: String,
    },

    /// Mutation attempted outside a mutation boundary
    #[error("no mutation boundary is open")]
    NoOpenBoundary,

    /// Nested boundaries are not supported
    #[error("mutation boundary '{0}' is already open")]
    BoundaryAlreadyOpen(String),

    /// Any other host failure
    #[error("host rejected the operation: {0}")]
    Rejected(String),
}

impl HostError {
    /// Create a name rejection
    pub fn name_rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NameRejected {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an opaque rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Whether this reports a missing attachment
    #[inline]
    #[must_use]
    pub fn is_not_attached(&self) -> bool {
        matches!(self, Self::NotAttached(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let scope = OverrideScope::new(FilterId(4), ViewId(9));
        assert_eq!(HostError::NotAttached(scope).to_string(), "filter 4 in view 9 is not attached");
        assert_eq!(
            HostError::name_rejected("Walls", "already in use").to_string(),
            "filter name 'Walls' rejected: already in use"
        );
    }

    #[test]
    fn not_attached_predicate() {
        let scope = OverrideScope::new(FilterId(1), ViewId(1));
        assert!(HostError::NotAttached(scope).is_not_attached());
        assert!(!HostError::NoOpenBoundary.is_not_attached());
    }
}
