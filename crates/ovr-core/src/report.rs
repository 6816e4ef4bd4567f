//! Job reports
//!
//! Jobs return structured per-target results; formatting them for a user is
//! left to the caller.

use ovr_host::HostError;
use ovr_model::{FilterId, OverrideScope};
use serde::{Serialize, Serializer};

/// Which job produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// One source scope onto many targets
    Propagation,
    /// Filters copied from one view to others
    ViewCopy,
    /// Overrides cleared
    Reset,
    /// Color/pattern stamped onto parts
    Recolor,
}

/// Why a target was not touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Target is the source scope itself
    SameAsSource,
}

/// Result for one target scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Descriptor written
    Applied {
        /// Whether the filter had to be attached first
        attached: bool,
    },
    /// Deliberately left alone
    Skipped {
        /// Reason
        reason: SkipReason,
    },
    /// Host rejected the target; siblings were still attempted
    Failed {
        /// Host failure
        #[serde(serialize_with = "display_error")]
        error: HostError,
        /// Whether the filter was attached before the failure; the
        /// attachment stays when the boundary commits
        attached: bool,
    },
}

/// Target scope with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    /// Target
    pub scope: OverrideScope,
    /// Outcome
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl TargetOutcome {
    /// Create outcome
    #[inline]
    #[must_use]
    pub fn new(scope: OverrideScope, status: OutcomeStatus) -> Self {
        Self { scope, status }
    }

    /// Whether the target was written
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self.status, OutcomeStatus::Applied { .. })
    }

    /// Whether the target failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

/// Per-target report of a best-effort job, in target order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Producing job
    pub job: JobKind,
    /// Source scope, for single-source jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<OverrideScope>,
    /// Outcomes in the order targets were attempted
    pub outcomes: Vec<TargetOutcome>,
}

impl JobReport {
    /// Empty report
    #[inline]
    #[must_use]
    pub fn new(job: JobKind, source: Option<OverrideScope>) -> Self {
        Self {
            job,
            source,
            outcomes: Vec::new(),
        }
    }

    /// Record an outcome
    #[inline]
    pub fn push(&mut self, scope: OverrideScope, status: OutcomeStatus) {
        self.outcomes.push(TargetOutcome::new(scope, status));
    }

    /// Applied targets
    pub fn succeeded(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.is_applied())
    }

    /// Failed targets
    pub fn failed(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Whether no target failed
    #[inline]
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Outcome for a scope
    #[must_use]
    pub fn outcome_for(&self, scope: &OverrideScope) -> Option<&OutcomeStatus> {
        self.outcomes.iter().find(|o| o.scope == *scope).map(|o| &o.status)
    }
}

/// Result of a committed duplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DuplicationOutcome {
    /// Id of the new filter
    pub new_filter: FilterId,
    /// Scope that received the copied overrides
    pub seeded_scope: OverrideScope,
    /// False if the source overrides were unreadable and an unset descriptor was used
    pub seeded_from_source: bool,
}

fn display_error<S: Serializer>(error: &HostError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovr_model::ViewId;

    fn scope(f: u64) -> OverrideScope {
        OverrideScope::new(FilterId(f), ViewId(1))
    }

    #[test]
    fn report_counts() {
        let mut report = JobReport::new(JobKind::Propagation, Some(scope(1)));
        report.push(scope(2), OutcomeStatus::Applied { attached: false });
        report.push(
            scope(3),
            OutcomeStatus::Failed {
                error: HostError::rejected("locked"),
                attached: false,
            },
        );
        report.push(
            scope(1),
            OutcomeStatus::Skipped {
                reason: SkipReason::SameAsSource,
            },
        );

        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.is_complete_success());
        assert!(matches!(report.outcome_for(&scope(3)), Some(OutcomeStatus::Failed { .. })));
        assert_eq!(report.outcome_for(&scope(9)), None);
    }

    #[test]
    fn report_serializes_flat() {
        let mut report = JobReport::new(JobKind::Reset, None);
        report.push(
            scope(4),
            OutcomeStatus::Failed {
                error: HostError::rejected("locked"),
                attached: true,
            },
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["job"], "reset");
        assert!(json.get("source").is_none());
        assert_eq!(json["outcomes"][0]["status"], "failed");
        assert_eq!(json["outcomes"][0]["error"], "host rejected the operation: locked");
        assert_eq!(json["outcomes"][0]["attached"], true);
        assert_eq!(json["outcomes"][0]["scope"]["filter"], 4);
    }
}
