//! Bulk recolor of filter overrides

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::propagation::{apply_to_target, log_summary};
use crate::report::{JobKind, JobReport};
use ovr_host::{run_in_mutation_boundary, HostDocument, HostError};
use ovr_merge::RecolorPatch;
use ovr_model::{FilterId, OverrideScope, ViewId};

/// Stamp one color (and optionally a fill pattern) onto several filters in a view
///
/// Each filter keeps every property the patch does not name. Filters not
/// attached to the view are reported as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecolorJob {
    view: ViewId,
    filters: Vec<FilterId>,
    patch: RecolorPatch,
}

impl RecolorJob {
    /// Create job
    pub fn new(view: ViewId, filters: impl IntoIterator<Item = FilterId>, patch: RecolorPatch) -> Self {
        Self {
            view,
            filters: filters.into_iter().collect(),
            patch,
        }
    }

    /// Run against `doc`
    ///
    /// # Errors
    /// - [`EngineError::InvalidSelector`] for an unusable patch
    /// - [`EngineError::Host`] if the boundary cannot be opened
    /// - [`EngineError::RolledBack`] if the commit fails
    pub fn run<D>(&self, doc: &mut D, config: &EngineConfig) -> Result<JobReport, EngineError>
    where
        D: HostDocument + ?Sized,
    {
        let span = tracing::info_span!("recolor", view = %self.view, color = %self.patch.color());
        let _enter = span.enter();

        self.patch.validate()?;

        let mut report = JobReport::new(JobKind::Recolor, None);
        if self.filters.is_empty() {
            return Ok(report);
        }

        run_in_mutation_boundary(doc, &config.boundary_labels.recolor, |doc| {
            for &filter in &self.filters {
                let scope = OverrideScope::new(filter, self.view);
                let status = apply_to_target(doc, &scope, false, |baseline| self.patch.apply(baseline));
                report.push(scope, status);
            }
            Ok::<_, HostError>(())
        })
        .map_err(|e| EngineError::from_boundary(&config.boundary_labels.recolor, e))?;

        log_summary(&report);
        Ok(report)
    }
}
