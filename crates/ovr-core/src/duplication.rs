//! Filter duplication
//!
//! [`DuplicationJob`] clones a filter's definition under a new name and seeds
//! the clone's overrides from the original's. Creation, seeding and
//! attachment share one mutation boundary: if any step fails the document is
//! left exactly as it was.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::DuplicationOutcome;
use ovr_host::{run_in_mutation_boundary, HostDocument, HostError};
use ovr_model::{FilterId, OverrideDescriptor, OverrideScope, ViewId};

/// Clone a filter definition and seed its overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationJob {
    source_filter: FilterId,
    new_name: String,
    origin_view: ViewId,
    target_view: Option<ViewId>,
}

impl DuplicationJob {
    /// Duplicate `source_filter` as `new_name`, reading overrides in `origin_view`
    pub fn new(source_filter: FilterId, new_name: impl Into<String>, origin_view: ViewId) -> Self {
        Self {
            source_filter,
            new_name: new_name.into(),
            origin_view,
            target_view: None,
        }
    }

    /// Seed the clone in a different view than the one read from
    #[inline]
    #[must_use]
    pub fn with_target_view(mut self, view: ViewId) -> Self {
        self.target_view = Some(view);
        self
    }

    /// Default name for a duplicate of `source_name`
    #[must_use]
    pub fn suggested_name(source_name: &str, config: &EngineConfig) -> String {
        format!("{source_name}{}", config.duplicate_suffix)
    }

    /// View the clone's overrides are written to
    #[inline]
    #[must_use]
    pub fn target_view(&self) -> ViewId {
        self.target_view.unwrap_or(self.origin_view)
    }

    /// Run against `doc`
    ///
    /// # Errors
    /// - [`EngineError::Host`] if the source filter does not exist or the
    ///   boundary cannot be opened
    /// - [`EngineError::NameConflict`] for a blank or taken name
    /// - [`EngineError::DuplicationFailed`] if the host rejects any step; no
    ///   new filter remains in the document
    pub fn run<D>(&self, doc: &mut D, config: &EngineConfig) -> Result<DuplicationOutcome, EngineError>
    where
        D: HostDocument + ?Sized,
    {
        let span = tracing::info_span!("duplication", source = %self.source_filter, name = %self.new_name);
        let _enter = span.enter();

        let original = doc
            .filter_definition(self.source_filter)
            .ok_or(HostError::UnknownFilter(self.source_filter))?;

        if doc.find_filter(&self.new_name).is_some() {
            return Err(EngineError::name_conflict(&self.new_name, "name is already in use"));
        }
        let definition = original
            .renamed(self.new_name.as_str())
            .map_err(|e| EngineError::name_conflict(&self.new_name, e.to_string()))?;

        let origin = OverrideScope::new(self.source_filter, self.origin_view);
        let (captured, seeded_from_source) = match doc.read_override(&origin) {
            Ok(descriptor) => (descriptor, true),
            Err(error) => {
                tracing::warn!(scope = %origin, %error, "source overrides unreadable, seeding empty overrides");
                (OverrideDescriptor::unset(), false)
            }
        };

        let target_view = self.target_view();
        let (new_filter, seeded_scope) =
            run_in_mutation_boundary(doc, &config.boundary_labels.duplicate, |doc| {
                let new_filter = doc.create_filter_definition(&definition)?;
                let scope = OverrideScope::new(new_filter, target_view);
                doc.write_override(&scope, &captured)?;
                if !doc.is_attached(&scope) {
                    doc.attach(&scope)?;
                }
                Ok::<_, HostError>((new_filter, scope))
            })
            .map_err(|e| {
                if e.is_rolled_back() {
                    EngineError::DuplicationFailed {
                        name: self.new_name.clone(),
                        source: e.into_host_error(),
                    }
                } else {
                    EngineError::Host(e.into_host_error())
                }
            })?;

        tracing::info!(new_filter = %new_filter, scope = %seeded_scope, "filter duplicated");
        Ok(DuplicationOutcome {
            new_filter,
            seeded_scope,
            seeded_from_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_name_uses_suffix() {
        let config = EngineConfig::default();
        assert_eq!(DuplicationJob::suggested_name("Walls", &config), "Walls_Copy");

        let config = config.with_duplicate_suffix(" (2)");
        assert_eq!(DuplicationJob::suggested_name("Walls", &config), "Walls (2)");
    }

    #[test]
    fn target_view_defaults_to_origin() {
        let job = DuplicationJob::new(FilterId(1), "x", ViewId(4));
        assert_eq!(job.target_view(), ViewId(4));
        assert_eq!(job.with_target_view(ViewId(5)).target_view(), ViewId(5));
    }
}
