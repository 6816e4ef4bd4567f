//! Host document contract
//!
//! [`HostDocument`] is the only surface the engine touches. The hosting
//! application owns all filter and view state; the engine reads it through
//! this trait at call time and never caches descriptors between jobs.

use crate::error::HostError;
use ovr_model::{FilterDefinition, FilterId, OverrideDescriptor, OverrideScope, ViewId, ViewKind};

/// Document collaborator holding filters, views and their overrides
///
/// Mutating calls are only valid between [`HostDocument::begin_boundary`] and
/// [`HostDocument::commit_boundary`] / [`HostDocument::rollback_boundary`].
/// Use [`crate::run_in_mutation_boundary`] rather than calling them directly.
pub trait HostDocument {
    /// Read the descriptor of a filter in a view
    ///
    /// # Errors
    /// [`HostError::NotAttached`] if the filter is not attached there, or an
    /// unknown-id error.
    fn read_override(&self, scope: &OverrideScope) -> Result<OverrideDescriptor, HostError>;

    /// Replace the descriptor of a filter in a view
    ///
    /// # Errors
    /// Any host rejection.
    fn write_override(
        &mut self,
        scope: &OverrideScope,
        descriptor: &OverrideDescriptor,
    ) -> Result<(), HostError>;

    /// Whether the filter is attached to the view
    fn is_attached(&self, scope: &OverrideScope) -> bool;

    /// Attach the filter to the view with no overrides
    ///
    /// # Errors
    /// Any host rejection.
    fn attach(&mut self, scope: &OverrideScope) -> Result<(), HostError>;

    /// Create a new filter definition and return its id
    ///
    /// # Errors
    /// [`HostError::NameRejected`] for blank or duplicate names, or any
    /// other host rejection.
    fn create_filter_definition(&mut self, definition: &FilterDefinition) -> Result<FilterId, HostError>;

    /// Structural definition of an existing filter
    fn filter_definition(&self, filter: FilterId) -> Option<FilterDefinition>;

    /// Look a filter up by name
    fn find_filter(&self, name: &str) -> Option<FilterId>;

    /// Kind of a view, `None` if the id does not resolve
    fn view_kind(&self, view: ViewId) -> Option<ViewKind>;

    /// Whether the host reads and writes filter visibility
    fn supports_visibility(&self) -> bool {
        false
    }

    /// Open a mutation boundary
    ///
    /// # Errors
    /// [`HostError::BoundaryAlreadyOpen`] when nested.
    fn begin_boundary(&mut self, label: &str) -> Result<(), HostError>;

    /// Durably commit every write since the boundary opened
    ///
    /// # Errors
    /// Host commit failure; the boundary stays open so it can be rolled back.
    fn commit_boundary(&mut self) -> Result<(), HostError>;

    /// Discard every write since the boundary opened
    fn rollback_boundary(&mut self);
}
