//! In-memory document
//!
//! [`InMemoryDocument`] implements [`HostDocument`] over plain maps. Mutation
//! boundaries snapshot the state on open and restore it on rollback. Faults
//! can be injected per operation to exercise failure paths, and the whole
//! document round-trips through JSON via [`DocumentSnapshot`].

use crate::document::HostDocument;
use crate::error::HostError;
use indexmap::IndexMap;
use ovr_model::{FilterDefinition, FilterId, OverrideDescriptor, OverrideScope, ViewId, ViewKind};
use serde::{Deserialize, Serialize};

/// One view or template and the filters attached to it, in attachment order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewRecord {
    /// Display name
    pub name: String,
    /// View or template
    #[serde(default)]
    pub kind: ViewKind,
    /// Attached filters and their overrides
    #[serde(default)]
    pub filters: IndexMap<FilterId, OverrideDescriptor>,
}

/// Serializable document state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Filter definitions by id
    #[serde(default)]
    pub filters: IndexMap<FilterId, FilterDefinition>,
    /// Views and templates by id
    #[serde(default)]
    pub views: IndexMap<ViewId, ViewRecord>,
    /// Whether filter visibility is supported
    #[serde(default)]
    pub supports_visibility: bool,
}

/// Operation that should fail when attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Writes into `view` (optionally only for `filter`)
    Write {
        /// View receiving the write
        view: ViewId,
        /// Restrict to one filter
        filter: Option<FilterId>,
    },
    /// Attachments into `view` (optionally only for `filter`)
    Attach {
        /// View receiving the attachment
        view: ViewId,
        /// Restrict to one filter
        filter: Option<FilterId>,
    },
    /// Filter creation (optionally only under `name`)
    Create {
        /// Restrict to one name
        name: Option<String>,
    },
    /// Every commit
    Commit,
}

impl Fault {
    fn hits_scope(&self, write: bool, scope: &OverrideScope) -> bool {
        match self {
            Self::Write { view, filter } if write => {
                *view == scope.view && filter.map_or(true, |f| f == scope.filter)
            }
            Self::Attach { view, filter } if !write => {
                *view == scope.view && filter.map_or(true, |f| f == scope.filter)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct OpenBoundary {
    label: String,
    saved: DocumentSnapshot,
}

/// Map-backed [`HostDocument`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    state: DocumentSnapshot,
    open: Option<OpenBoundary>,
    faults: Vec<Fault>,
    committed: Vec<String>,
    next_id: u64,
}

impl InMemoryDocument {
    /// Empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document from a snapshot
    #[must_use]
    pub fn from_snapshot(state: DocumentSnapshot) -> Self {
        let next_id = state
            .filters
            .keys()
            .map(|f| f.0)
            .chain(state.views.keys().map(|v| v.0))
            .max()
            .map_or(1, |max| max + 1);
        Self {
            state,
            next_id,
            ..Self::default()
        }
    }

    /// Parse a JSON snapshot
    ///
    /// # Errors
    /// Returns the JSON error if the text is not a valid snapshot
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::from_snapshot)
    }

    /// Render the committed state as pretty JSON
    ///
    /// # Errors
    /// Returns the JSON error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.snapshot())
    }

    /// Current state (including uncommitted writes)
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.state
    }

    /// Enable or disable visibility support
    #[must_use]
    pub fn with_visibility_support(mut self, supported: bool) -> Self {
        self.state.supports_visibility = supported;
        self
    }

    /// Add a view or template (setup, no boundary required)
    pub fn add_view(&mut self, name: impl Into<String>, kind: ViewKind) -> ViewId {
        let id = ViewId(self.allocate_id());
        self.state.views.insert(
            id,
            ViewRecord {
                name: name.into(),
                kind,
                filters: IndexMap::new(),
            },
        );
        id
    }

    /// Add a filter definition (setup, no boundary required)
    pub fn add_filter(&mut self, definition: FilterDefinition) -> FilterId {
        let id = FilterId(self.allocate_id());
        self.state.filters.insert(id, definition);
        id
    }

    /// Attach a filter with a descriptor (setup, no boundary required)
    ///
    /// # Errors
    /// Unknown view or filter
    pub fn seed(&mut self, scope: OverrideScope, descriptor: OverrideDescriptor) -> Result<(), HostError> {
        if !self.state.filters.contains_key(&scope.filter) {
            return Err(HostError::UnknownFilter(scope.filter));
        }
        let view = self.view_mut(scope.view)?;
        view.filters.insert(scope.filter, descriptor);
        Ok(())
    }

    /// Make matching operations fail until cleared
    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    /// Remove every injected fault
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Labels of committed boundaries, oldest first
    #[inline]
    #[must_use]
    pub fn committed_boundaries(&self) -> &[String] {
        &self.committed
    }

    /// Whether a boundary is currently open
    #[inline]
    #[must_use]
    pub fn in_boundary(&self) -> bool {
        self.open.is_some()
    }

    /// Filters attached to a view, in attachment order
    #[must_use]
    pub fn attached_filters(&self, view: ViewId) -> Vec<FilterId> {
        self.state
            .views
            .get(&view)
            .map(|v| v.filters.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Stored descriptor as-is, bypassing capability filtering
    #[must_use]
    pub fn stored(&self, scope: &OverrideScope) -> Option<&OverrideDescriptor> {
        self.state.views.get(&scope.view)?.filters.get(&scope.filter)
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn view_mut(&mut self, view: ViewId) -> Result<&mut ViewRecord, HostError> {
        self.state.views.get_mut(&view).ok_or(HostError::UnknownView(view))
    }

    fn require_boundary(&self) -> Result<(), HostError> {
        if self.open.is_some() {
            Ok(())
        } else {
            Err(HostError::NoOpenBoundary)
        }
    }

    fn check_scope(&self, scope: &OverrideScope) -> Result<(), HostError> {
        if !self.state.views.contains_key(&scope.view) {
            return Err(HostError::UnknownView(scope.view));
        }
        if !self.state.filters.contains_key(&scope.filter) {
            return Err(HostError::UnknownFilter(scope.filter));
        }
        Ok(())
    }

    fn fault_for(&self, write: bool, scope: &OverrideScope) -> Option<HostError> {
        self.faults
            .iter()
            .any(|f| f.hits_scope(write, scope))
            .then(|| HostError::rejected(format!("injected fault on {scope}")))
    }
}

impl HostDocument for InMemoryDocument {
    fn read_override(&self, scope: &OverrideScope) -> Result<OverrideDescriptor, HostError> {
        self.check_scope(scope)?;
        let mut descriptor = *self
            .stored(scope)
            .ok_or(HostError::NotAttached(*scope))?;

        descriptor.visibility = if self.state.supports_visibility {
            Some(descriptor.visibility.unwrap_or(true))
        } else {
            None
        };
        Ok(descriptor)
    }

    fn write_override(
        &mut self,
        scope: &OverrideScope,
        descriptor: &OverrideDescriptor,
    ) -> Result<(), HostError> {
        self.require_boundary()?;
        self.check_scope(scope)?;
        if let Some(err) = self.fault_for(true, scope) {
            return Err(err);
        }

        let supports_visibility = self.state.supports_visibility;
        let view = self.view_mut(scope.view)?;
        // like the host, writing an override attaches the filter
        let stored = view.filters.entry(scope.filter).or_default();
        let visibility = match descriptor.visibility {
            Some(v) if supports_visibility => Some(v),
            _ => stored.visibility,
        };
        *stored = OverrideDescriptor {
            visibility,
            ..*descriptor
        };
        Ok(())
    }

    fn is_attached(&self, scope: &OverrideScope) -> bool {
        self.stored(scope).is_some()
    }

    fn attach(&mut self, scope: &OverrideScope) -> Result<(), HostError> {
        self.require_boundary()?;
        self.check_scope(scope)?;
        if let Some(err) = self.fault_for(false, scope) {
            return Err(err);
        }
        let view = self.view_mut(scope.view)?;
        view.filters.entry(scope.filter).or_default();
        Ok(())
    }

    fn create_filter_definition(&mut self, definition: &FilterDefinition) -> Result<FilterId, HostError> {
        self.require_boundary()?;
        let name = definition.name.as_str();
        let injected = self.faults.iter().any(|f| match f {
            Fault::Create { name: None } => true,
            Fault::Create { name: Some(n) } => n == name,
            _ => false,
        });
        if injected {
            return Err(HostError::rejected(format!("injected fault creating '{name}'")));
        }
        if name.trim().is_empty() {
            return Err(HostError::name_rejected(name, "name is empty"));
        }
        if self.find_filter(name).is_some() {
            return Err(HostError::name_rejected(name, "name is already in use"));
        }
        Ok(self.add_filter(definition.clone()))
    }

    fn filter_definition(&self, filter: FilterId) -> Option<FilterDefinition> {
        self.state.filters.get(&filter).cloned()
    }

    fn find_filter(&self, name: &str) -> Option<FilterId> {
        self.state
            .filters
            .iter()
            .find(|(_, def)| def.name == name)
            .map(|(id, _)| *id)
    }

    fn view_kind(&self, view: ViewId) -> Option<ViewKind> {
        self.state.views.get(&view).map(|v| v.kind)
    }

    fn supports_visibility(&self) -> bool {
        self.state.supports_visibility
    }

    fn begin_boundary(&mut self, label: &str) -> Result<(), HostError> {
        if let Some(open) = &self.open {
            return Err(HostError::BoundaryAlreadyOpen(open.label.clone()));
        }
        self.open = Some(OpenBoundary {
            label: label.to_string(),
            saved: self.state.clone(),
        });
        Ok(())
    }

    fn commit_boundary(&mut self) -> Result<(), HostError> {
        if self.open.is_none() {
            return Err(HostError::NoOpenBoundary);
        }
        if self.faults.contains(&Fault::Commit) {
            return Err(HostError::rejected("injected commit failure"));
        }
        if let Some(open) = self.open.take() {
            self.committed.push(open.label);
        }
        Ok(())
    }

    fn rollback_boundary(&mut self) {
        if let Some(open) = self.open.take() {
            tracing::debug!(boundary = %open.label, "restoring document state");
            self.state = open.saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{run_in_mutation_boundary, BoundaryError};
    use ovr_model::{CategorySet, Color, RulePredicate};

    fn filter(name: &str) -> FilterDefinition {
        FilterDefinition::new(name, CategorySet::new(), RulePredicate::default()).unwrap()
    }

    fn doc_with_one_scope() -> (InMemoryDocument, OverrideScope) {
        let mut doc = InMemoryDocument::new();
        let view = doc.add_view("Level 1", ViewKind::View);
        let f = doc.add_filter(filter("Walls"));
        let scope = OverrideScope::new(f, view);
        doc.seed(scope, OverrideDescriptor::unset().with_halftone(true)).unwrap();
        (doc, scope)
    }

    #[test]
    fn read_unattached_reports_not_attached() {
        let (mut doc, scope) = doc_with_one_scope();
        let other = doc.add_view("Level 2", ViewKind::View);
        let err = doc.read_override(&scope.with_view(other)).unwrap_err();
        assert!(err.is_not_attached());
    }

    #[test]
    fn read_unknown_ids() {
        let (doc, scope) = doc_with_one_scope();
        assert_eq!(
            doc.read_override(&scope.with_view(ViewId(999))),
            Err(HostError::UnknownView(ViewId(999)))
        );
        assert_eq!(
            doc.read_override(&scope.with_filter(FilterId(999))),
            Err(HostError::UnknownFilter(FilterId(999)))
        );
    }

    #[test]
    fn writes_require_boundary() {
        let (mut doc, scope) = doc_with_one_scope();
        let err = doc.write_override(&scope, &OverrideDescriptor::unset()).unwrap_err();
        assert_eq!(err, HostError::NoOpenBoundary);
        assert_eq!(doc.attach(&scope), Err(HostError::NoOpenBoundary));
    }

    #[test]
    fn boundary_commits_on_ok() {
        let (mut doc, scope) = doc_with_one_scope();
        let red = OverrideDescriptor::unset().with_cut_line_color(Color::rgb(255, 0, 0));

        run_in_mutation_boundary(&mut doc, "paint", |d| d.write_override(&scope, &red)).unwrap();

        assert_eq!(doc.read_override(&scope).unwrap(), red);
        assert_eq!(doc.committed_boundaries(), ["paint".to_string()]);
        assert!(!doc.in_boundary());
    }

    #[test]
    fn boundary_rolls_back_on_err() {
        let (mut doc, scope) = doc_with_one_scope();
        let before = doc.snapshot().clone();

        let result: Result<(), BoundaryError<HostError>> = run_in_mutation_boundary(&mut doc, "paint", |d| {
            d.write_override(&scope, &OverrideDescriptor::unset())?;
            Err(HostError::rejected("boom"))
        });

        let err = result.unwrap_err();
        assert!(err.is_rolled_back());
        assert_eq!(err, BoundaryError::Body(HostError::rejected("boom")));
        assert_eq!(doc.snapshot(), &before);
        assert!(doc.committed_boundaries().is_empty());
    }

    #[test]
    fn commit_fault_rolls_back() {
        let (mut doc, scope) = doc_with_one_scope();
        doc.inject(Fault::Commit);
        let before = doc.snapshot().clone();

        let result = run_in_mutation_boundary(&mut doc, "paint", |d| {
            d.write_override(&scope, &OverrideDescriptor::unset())
        });

        assert!(matches!(result, Err(BoundaryError::Commit(_))));
        assert_eq!(doc.snapshot(), &before);
        assert!(!doc.in_boundary());
    }

    #[test]
    fn failed_begin_is_not_a_rollback() {
        let (mut doc, scope) = doc_with_one_scope();
        doc.begin_boundary("outer").unwrap();

        let err = run_in_mutation_boundary(&mut doc, "inner", |d| {
            d.write_override(&scope, &OverrideDescriptor::unset())
        })
        .unwrap_err();

        assert!(!err.is_rolled_back());
        assert_eq!(
            err.into_host_error(),
            HostError::BoundaryAlreadyOpen("outer".to_string())
        );
        assert!(doc.in_boundary());
        doc.rollback_boundary();
    }

    #[test]
    fn nested_boundary_rejected() {
        let (mut doc, _) = doc_with_one_scope();
        doc.begin_boundary("outer").unwrap();
        assert_eq!(
            doc.begin_boundary("inner"),
            Err(HostError::BoundaryAlreadyOpen("outer".to_string()))
        );
        doc.rollback_boundary();
    }

    #[test]
    fn write_fault_targets_scope() {
        let (mut doc, scope) = doc_with_one_scope();
        let other = doc.add_filter(filter("Doors"));
        doc.inject(Fault::Write {
            view: scope.view,
            filter: Some(scope.filter),
        });

        doc.begin_boundary("t").unwrap();
        assert!(doc.write_override(&scope, &OverrideDescriptor::unset()).is_err());
        assert!(doc
            .write_override(&scope.with_filter(other), &OverrideDescriptor::unset())
            .is_ok());
        doc.rollback_boundary();
    }

    #[test]
    fn write_attaches_implicitly() {
        let (mut doc, scope) = doc_with_one_scope();
        let other = doc.add_filter(filter("Doors"));
        let target = scope.with_filter(other);

        run_in_mutation_boundary(&mut doc, "t", |d| d.write_override(&target, &OverrideDescriptor::unset()))
            .unwrap();

        assert!(doc.is_attached(&target));
        assert_eq!(doc.attached_filters(scope.view), vec![scope.filter, other]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let (mut doc, _) = doc_with_one_scope();
        doc.begin_boundary("dup").unwrap();
        let err = doc.create_filter_definition(&filter("Walls")).unwrap_err();
        assert!(matches!(err, HostError::NameRejected { .. }));
        let id = doc.create_filter_definition(&filter("Walls 2")).unwrap();
        doc.commit_boundary().unwrap();
        assert_eq!(doc.find_filter("Walls 2"), Some(id));
    }

    #[test]
    fn visibility_only_with_support() {
        let (doc, scope) = doc_with_one_scope();
        assert_eq!(doc.read_override(&scope).unwrap().visibility, None);

        let mut doc = doc.with_visibility_support(true);
        assert_eq!(doc.read_override(&scope).unwrap().visibility, Some(true));

        let hidden = OverrideDescriptor::unset().with_visibility(false);
        run_in_mutation_boundary(&mut doc, "hide", |d| d.write_override(&scope, &hidden)).unwrap();
        assert_eq!(doc.read_override(&scope).unwrap().visibility, Some(false));

        // a descriptor without visibility leaves it alone
        run_in_mutation_boundary(&mut doc, "reset", |d| d.write_override(&scope, &OverrideDescriptor::unset()))
            .unwrap();
        assert_eq!(doc.read_override(&scope).unwrap().visibility, Some(false));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let (doc, scope) = doc_with_one_scope();
        let json = doc.to_json().unwrap();
        let back = InMemoryDocument::from_json(&json).unwrap();
        assert_eq!(back.snapshot(), doc.snapshot());
        assert_eq!(back.read_override(&scope).unwrap(), doc.read_override(&scope).unwrap());
    }

    #[test]
    fn ids_continue_after_snapshot() {
        let (doc, _) = doc_with_one_scope();
        let mut back = InMemoryDocument::from_snapshot(doc.snapshot().clone());
        let v = back.add_view("Level 3", ViewKind::Template);
        assert!(v.0 > 2);
        assert_eq!(back.view_kind(v), Some(ViewKind::Template));
    }
}
