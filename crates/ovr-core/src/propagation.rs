//! Override propagation
//!
//! [`PropagationJob`] reads one source descriptor and merges it onto each
//! target scope. [`ViewCopyJob`] does the same for several filters at once,
//! from one view into other views. Both run their whole target list inside a
//! single mutation boundary and tolerate per-target failures: a rejected
//! target is recorded and the loop moves on.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::{JobKind, JobReport, OutcomeStatus, SkipReason};
use ovr_host::{run_in_mutation_boundary, HostDocument, HostError};
use ovr_merge::{FieldSelector, OverrideMerger};
use ovr_model::{FilterId, OverrideDescriptor, OverrideScope, ViewId};

/// Merge one source scope's overrides onto many targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationJob {
    source: OverrideScope,
    targets: Vec<OverrideScope>,
    selector: FieldSelector,
}

impl PropagationJob {
    /// Create job
    pub fn new(
        source: OverrideScope,
        targets: impl IntoIterator<Item = OverrideScope>,
        selector: FieldSelector,
    ) -> Self {
        Self {
            source,
            targets: targets.into_iter().collect(),
            selector,
        }
    }

    /// Copy between filters inside one view or template
    pub fn within_view(
        view: ViewId,
        source_filter: FilterId,
        target_filters: impl IntoIterator<Item = FilterId>,
        selector: FieldSelector,
    ) -> Self {
        Self::new(
            OverrideScope::new(source_filter, view),
            target_filters.into_iter().map(|f| OverrideScope::new(f, view)),
            selector,
        )
    }

    /// Copy one filter's overrides from one view to others
    pub fn across_views(
        filter: FilterId,
        source_view: ViewId,
        target_views: impl IntoIterator<Item = ViewId>,
        selector: FieldSelector,
    ) -> Self {
        Self::new(
            OverrideScope::new(filter, source_view),
            target_views.into_iter().map(|v| OverrideScope::new(filter, v)),
            selector,
        )
    }

    /// Source scope
    #[inline]
    #[must_use]
    pub fn source(&self) -> &OverrideScope {
        &self.source
    }

    /// Target scopes in application order
    #[inline]
    #[must_use]
    pub fn targets(&self) -> &[OverrideScope] {
        &self.targets
    }

    /// Selector
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &FieldSelector {
        &self.selector
    }

    /// Run against `doc`
    ///
    /// # Errors
    /// - [`EngineError::InvalidSelector`] before anything is read
    /// - [`EngineError::ScopeResolution`] if the source cannot be read
    /// - [`EngineError::Host`] if the boundary cannot be opened
    /// - [`EngineError::RolledBack`] if the commit fails (every write is
    ///   discarded)
    ///
    /// Individual target failures are reported in the [`JobReport`].
    pub fn run<D>(&self, doc: &mut D, config: &EngineConfig) -> Result<JobReport, EngineError>
    where
        D: HostDocument + ?Sized,
    {
        let span = tracing::info_span!("propagation", source = %self.source, targets = self.targets.len());
        let _enter = span.enter();

        self.selector.validate()?;

        let source = doc
            .read_override(&self.source)
            .map_err(|e| EngineError::scope_resolution(self.source, e))?;
        tracing::info!(selector = %self.selector, "propagating overrides");

        let mut report = JobReport::new(JobKind::Propagation, Some(self.source));
        if self.targets.is_empty() {
            return Ok(report);
        }

        let merger = OverrideMerger::new();
        run_in_mutation_boundary(doc, &config.boundary_labels.propagate, |doc| {
            for target in &self.targets {
                if config.skip_source_in_targets && *target == self.source {
                    report.push(*target, OutcomeStatus::Skipped { reason: SkipReason::SameAsSource });
                    continue;
                }
                let status = apply_to_target(doc, target, config.auto_attach_targets, |baseline| {
                    merger.merge(&source, baseline, &self.selector)
                });
                report.push(*target, status);
            }
            Ok::<_, HostError>(())
        })
        .map_err(|e| EngineError::from_boundary(&config.boundary_labels.propagate, e))?;

        log_summary(&report);
        Ok(report)
    }
}

/// Copy several filters (with overrides) from one view into other views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCopyJob {
    source_view: ViewId,
    filters: Vec<FilterId>,
    target_views: Vec<ViewId>,
    selector: FieldSelector,
}

impl ViewCopyJob {
    /// Create job copying every override property
    pub fn new(
        source_view: ViewId,
        filters: impl IntoIterator<Item = FilterId>,
        target_views: impl IntoIterator<Item = ViewId>,
    ) -> Self {
        Self {
            source_view,
            filters: filters.into_iter().collect(),
            target_views: target_views.into_iter().collect(),
            selector: FieldSelector::all(),
        }
    }

    /// Restrict the copied properties
    #[inline]
    #[must_use]
    pub fn with_selector(mut self, selector: FieldSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Run against `doc`
    ///
    /// Targets are attempted view by view, and within a view in filter order.
    ///
    /// # Errors
    /// Same as [`PropagationJob::run`]; the first unreadable source filter
    /// fails the job before anything is written.
    pub fn run<D>(&self, doc: &mut D, config: &EngineConfig) -> Result<JobReport, EngineError>
    where
        D: HostDocument + ?Sized,
    {
        let span = tracing::info_span!(
            "view_copy",
            source_view = %self.source_view,
            filters = self.filters.len(),
            views = self.target_views.len()
        );
        let _enter = span.enter();

        self.selector.validate()?;

        let sources = self
            .filters
            .iter()
            .map(|&filter| {
                let scope = OverrideScope::new(filter, self.source_view);
                doc.read_override(&scope)
                    .map(|d| (scope, d))
                    .map_err(|e| EngineError::scope_resolution(scope, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = JobReport::new(JobKind::ViewCopy, None);
        if sources.is_empty() || self.target_views.is_empty() {
            return Ok(report);
        }

        let merger = OverrideMerger::new();
        run_in_mutation_boundary(doc, &config.boundary_labels.copy_between_views, |doc| {
            for &view in &self.target_views {
                for (source_scope, source) in &sources {
                    let target = source_scope.with_view(view);
                    if config.skip_source_in_targets && target == *source_scope {
                        report.push(target, OutcomeStatus::Skipped { reason: SkipReason::SameAsSource });
                        continue;
                    }
                    let status = apply_to_target(doc, &target, config.auto_attach_targets, |baseline| {
                        merger.merge(source, baseline, &self.selector)
                    });
                    report.push(target, status);
                }
            }
            Ok::<_, HostError>(())
        })
        .map_err(|e| EngineError::from_boundary(&config.boundary_labels.copy_between_views, e))?;

        log_summary(&report);
        Ok(report)
    }
}

/// Attach if needed, compute the new descriptor from the baseline, write it
///
/// Never fails the surrounding job: host errors become
/// [`OutcomeStatus::Failed`], which still records an attachment made before
/// the failing step.
pub(crate) fn apply_to_target<D, F>(
    doc: &mut D,
    target: &OverrideScope,
    auto_attach: bool,
    compute: F,
) -> OutcomeStatus
where
    D: HostDocument + ?Sized,
    F: FnOnce(&OverrideDescriptor) -> OverrideDescriptor,
{
    let attached = match ensure_attached(doc, target, auto_attach) {
        Ok(attached) => attached,
        Err(error) => return failed(target, error, false),
    };
    match write_merged(doc, target, attached, compute) {
        Ok(()) => OutcomeStatus::Applied { attached },
        Err(error) => failed(target, error, attached),
    }
}

fn failed(target: &OverrideScope, error: HostError, attached: bool) -> OutcomeStatus {
    tracing::warn!(scope = %target, %error, attached, "target failed, continuing");
    OutcomeStatus::Failed { error, attached }
}

/// Returns whether the filter had to be attached
fn ensure_attached<D>(doc: &mut D, target: &OverrideScope, auto_attach: bool) -> Result<bool, HostError>
where
    D: HostDocument + ?Sized,
{
    if doc.is_attached(target) {
        Ok(false)
    } else if auto_attach {
        doc.attach(target)?;
        Ok(true)
    } else {
        Err(HostError::NotAttached(*target))
    }
}

fn write_merged<D, F>(doc: &mut D, target: &OverrideScope, newly_attached: bool, compute: F) -> Result<(), HostError>
where
    D: HostDocument + ?Sized,
    F: FnOnce(&OverrideDescriptor) -> OverrideDescriptor,
{
    // A freshly attached filter has nothing worth reading.
    let baseline = if newly_attached {
        OverrideDescriptor::unset()
    } else {
        doc.read_override(target)?
    };

    let updated = compute(&baseline);
    tracing::debug!(scope = %target, newly_attached, "writing merged overrides");
    doc.write_override(target, &updated)
}

pub(crate) fn log_summary(report: &JobReport) {
    tracing::info!(
        job = ?report.job,
        applied = report.succeeded().count(),
        failed = report.failed().count(),
        "job finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovr_host::{Fault, InMemoryDocument};
    use ovr_merge::PropertyGroup;
    use ovr_model::{CategorySet, Color, FilterDefinition, RulePredicate, ViewKind};

    fn filter(name: &str) -> FilterDefinition {
        FilterDefinition::new(name, CategorySet::new(), RulePredicate::default()).unwrap()
    }

    #[test]
    fn within_view_builds_scopes() {
        let job = PropagationJob::within_view(
            ViewId(1),
            FilterId(10),
            [FilterId(11), FilterId(12)],
            FieldSelector::all(),
        );
        assert_eq!(job.source(), &OverrideScope::new(FilterId(10), ViewId(1)));
        assert_eq!(
            job.targets(),
            &[
                OverrideScope::new(FilterId(11), ViewId(1)),
                OverrideScope::new(FilterId(12), ViewId(1)),
            ]
        );
    }

    #[test]
    fn across_views_builds_scopes() {
        let job = PropagationJob::across_views(FilterId(3), ViewId(1), [ViewId(2)], FieldSelector::all());
        assert_eq!(job.targets(), &[OverrideScope::new(FilterId(3), ViewId(2))]);
    }

    #[test]
    fn apply_to_target_respects_auto_attach() {
        let mut doc = InMemoryDocument::new();
        let view = doc.add_view("Plan", ViewKind::View);
        let f = doc.add_filter(filter("Walls"));
        let target = OverrideScope::new(f, view);
        let red = OverrideDescriptor::unset().with_cut_line_color(Color::rgb(255, 0, 0));

        doc.begin_boundary("t").unwrap();
        let refused = apply_to_target(&mut doc, &target, false, |_| red);
        assert_eq!(
            refused,
            OutcomeStatus::Failed {
                error: HostError::NotAttached(target),
                attached: false,
            }
        );

        let applied = apply_to_target(&mut doc, &target, true, |_| red);
        assert_eq!(applied, OutcomeStatus::Applied { attached: true });
        doc.commit_boundary().unwrap();

        assert_eq!(doc.read_override(&target).unwrap(), red);
    }

    #[test]
    fn apply_to_target_reports_write_fault() {
        let mut doc = InMemoryDocument::new();
        let view = doc.add_view("Plan", ViewKind::View);
        let f = doc.add_filter(filter("Walls"));
        let target = OverrideScope::new(f, view);
        doc.seed(target, OverrideDescriptor::unset()).unwrap();
        doc.inject(Fault::Write { view, filter: None });

        doc.begin_boundary("t").unwrap();
        let status = apply_to_target(&mut doc, &target, true, |b| *b);
        doc.rollback_boundary();

        assert!(matches!(
            status,
            OutcomeStatus::Failed {
                error: HostError::Rejected(_),
                attached: false,
            }
        ));
    }

    #[test]
    fn write_fault_after_auto_attach_reports_attachment() {
        let mut doc = InMemoryDocument::new();
        let view = doc.add_view("Plan", ViewKind::View);
        let f = doc.add_filter(filter("Walls"));
        let target = OverrideScope::new(f, view);
        doc.inject(Fault::Write { view, filter: None });

        doc.begin_boundary("t").unwrap();
        let status = apply_to_target(&mut doc, &target, true, |b| *b);
        doc.commit_boundary().unwrap();

        assert!(matches!(
            status,
            OutcomeStatus::Failed {
                error: HostError::Rejected(_),
                attached: true,
            }
        ));
        assert!(doc.is_attached(&target));
    }

    #[test]
    fn invalid_selector_stops_before_reading() {
        let mut doc = InMemoryDocument::new();
        let job = PropagationJob::within_view(
            ViewId(1),
            FilterId(1),
            [FilterId(2)],
            FieldSelector::new().with(PropertyGroup::CutFills),
        );
        let err = job.run(&mut doc, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSelector(_)));
    }
}
