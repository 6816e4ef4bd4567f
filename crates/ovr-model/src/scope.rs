//! Override scopes
//!
//! An [`OverrideScope`] names where a descriptor lives: one filter inside one
//! view or view template.

use crate::ids::{FilterId, ViewId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Kind of view a scope points into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Ordinary model or drawing view
    #[default]
    View,
    /// Reusable view template
    Template,
}

impl ViewKind {
    /// Whether this is a template
    #[inline]
    #[must_use]
    pub fn is_template(self) -> bool {
        matches!(self, Self::Template)
    }
}

/// (filter, view) binding addressed by reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OverrideScope {
    /// Filter the override belongs to
    pub filter: FilterId,
    /// View or template holding the override
    pub view: ViewId,
}

impl OverrideScope {
    /// Create new scope
    #[inline]
    #[must_use]
    pub fn new(filter: FilterId, view: ViewId) -> Self {
        Self { filter, view }
    }

    /// Same view, different filter
    #[inline]
    #[must_use]
    pub fn with_filter(self, filter: FilterId) -> Self {
        Self { filter, ..self }
    }

    /// Same filter, different view
    #[inline]
    #[must_use]
    pub fn with_view(self, view: ViewId) -> Self {
        Self { view, ..self }
    }
}

impl Display for OverrideScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "filter {} in view {}", self.filter, self.view)
    }
}
