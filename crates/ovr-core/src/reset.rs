//! Override reset

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::propagation::{apply_to_target, log_summary};
use crate::report::{JobKind, JobReport};
use ovr_host::{run_in_mutation_boundary, HostDocument, HostError};
use ovr_model::{FilterId, OverrideDescriptor, OverrideScope, ViewId};

/// Clear the graphic overrides of filters in one view
///
/// Filters stay attached and keep their visibility. A filter that is not
/// attached to the view is reported as failed, never attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetJob {
    view: ViewId,
    filters: Vec<FilterId>,
}

impl ResetJob {
    /// Create job
    pub fn new(view: ViewId, filters: impl IntoIterator<Item = FilterId>) -> Self {
        Self {
            view,
            filters: filters.into_iter().collect(),
        }
    }

    /// Run against `doc`
    ///
    /// # Errors
    /// [`EngineError::Host`] if the boundary cannot be opened, [`EngineError::RolledBack`]
    /// if the commit fails
    pub fn run<D>(&self, doc: &mut D, config: &EngineConfig) -> Result<JobReport, EngineError>
    where
        D: HostDocument + ?Sized,
    {
        let span = tracing::info_span!("reset", view = %self.view, filters = self.filters.len());
        let _enter = span.enter();

        let mut report = JobReport::new(JobKind::Reset, None);
        if self.filters.is_empty() {
            return Ok(report);
        }

        run_in_mutation_boundary(doc, &config.boundary_labels.reset, |doc| {
            for &filter in &self.filters {
                let scope = OverrideScope::new(filter, self.view);
                let status = apply_to_target(doc, &scope, false, |_| OverrideDescriptor::unset());
                report.push(scope, status);
            }
            Ok::<_, HostError>(())
        })
        .map_err(|e| EngineError::from_boundary(&config.boundary_labels.reset, e))?;

        log_summary(&report);
        Ok(report)
    }
}
