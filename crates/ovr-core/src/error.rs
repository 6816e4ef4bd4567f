//! Error types for the override engine
//!
//! Covers:
//! - Source scopes that do not resolve
//! - Filter names that cannot be used
//! - Opaque host failures
//! - Failed (and rolled back) duplications
//! - Mutation boundaries the host refused to commit
//! - Malformed selectors and configuration

use ovr_host::{BoundaryError, HostError};
use ovr_merge::SelectorError;
use ovr_model::OverrideScope;

/// Main engine error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Source filter is not attached where the job expected to read it
    #[error("cannot resolve source {scope}: {source}")]
    ScopeResolution {
        /// Scope that failed to resolve
        scope: OverrideScope,
        /// Host explanation
        source: HostError,
    },

    /// New filter name is blank or taken
    #[error("filter name '{name}' is unavailable: {reason}")]
    NameConflict {
        /// Requested name
        name: String,
        /// Why it cannot be used
        reason: String,
    },

    /// Opaque failure from the document
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// Create/seed/attach sequence failed and was rolled back
    #[error("duplicating filter as '{name}' failed: {source}")]
    DuplicationFailed {
        /// Requested name of the duplicate
        name: String,
        /// Underlying host failure
        source: HostError,
    },

    /// Changes made inside a mutation boundary were discarded
    #[error("mutation boundary '{boundary}' rolled back: {source}")]
    RolledBack {
        /// Boundary label
        boundary: String,
        /// Host failure that forced the rollback
        source: HostError,
    },

    /// Selector or recolor request rejected before any merge ran
    #[error("invalid selection: {0}")]
    InvalidSelector(#[from] SelectorError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Create scope resolution error
    #[inline]
    #[must_use]
    pub fn scope_resolution(scope: OverrideScope, source: HostError) -> Self {
        Self::ScopeResolution { scope, source }
    }

    /// Create name conflict error
    #[inline]
    pub fn name_conflict(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NameConflict {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Classify a failed boundary run
    ///
    /// A boundary that never opened is a plain host error; anything later
    /// means changes were discarded.
    #[must_use]
    pub fn from_boundary(boundary: &str, err: BoundaryError<HostError>) -> Self {
        if err.is_rolled_back() {
            Self::RolledBack {
                boundary: boundary.to_string(),
                source: err.into_host_error(),
            }
        } else {
            Self::Host(err.into_host_error())
        }
    }

    /// Whether document changes were rolled back
    #[inline]
    #[must_use]
    pub fn is_rollback(&self) -> bool {
        matches!(self, Self::DuplicationFailed { .. } | Self::RolledBack { .. })
    }

    /// Whether the error stems from the user's choices rather than the host
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ScopeResolution { .. } | Self::NameConflict { .. } | Self::InvalidSelector(_)
        )
    }
}
