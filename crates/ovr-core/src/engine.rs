//! Engine facade
//!
//! [`OverrideEngine`] binds a document and a configuration and exposes one
//! method per job.

use crate::config::EngineConfig;
use crate::duplication::DuplicationJob;
use crate::error::EngineError;
use crate::propagation::{PropagationJob, ViewCopyJob};
use crate::recolor::RecolorJob;
use crate::report::{DuplicationOutcome, JobReport};
use crate::reset::ResetJob;
use ovr_host::HostDocument;

/// Runs override jobs against one document
pub struct OverrideEngine<'d, D: HostDocument + ?Sized> {
    doc: &'d mut D,
    config: EngineConfig,
}

impl<'d, D: HostDocument + ?Sized> OverrideEngine<'d, D> {
    /// Create engine over `doc`
    pub fn new(doc: &'d mut D, config: EngineConfig) -> Self {
        tracing::debug!(?config, "override engine ready");
        Self { doc, config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying document
    #[inline]
    pub fn document(&mut self) -> &mut D {
        &mut *self.doc
    }

    /// Run a propagation job
    ///
    /// # Errors
    /// See [`PropagationJob::run`]
    pub fn propagate(&mut self, job: &PropagationJob) -> Result<JobReport, EngineError> {
        job.run(&mut *self.doc, &self.config)
    }

    /// Copy filters from one view to others
    ///
    /// # Errors
    /// See [`ViewCopyJob::run`]
    pub fn copy_between_views(&mut self, job: &ViewCopyJob) -> Result<JobReport, EngineError> {
        job.run(&mut *self.doc, &self.config)
    }

    /// Duplicate a filter with its overrides
    ///
    /// # Errors
    /// See [`DuplicationJob::run`]
    pub fn duplicate(&mut self, job: &DuplicationJob) -> Result<DuplicationOutcome, EngineError> {
        job.run(&mut *self.doc, &self.config)
    }

    /// Clear overrides
    ///
    /// # Errors
    /// See [`ResetJob::run`]
    pub fn reset(&mut self, job: &ResetJob) -> Result<JobReport, EngineError> {
        job.run(&mut *self.doc, &self.config)
    }

    /// Stamp a color/pattern onto overrides
    ///
    /// # Errors
    /// See [`RecolorJob::run`]
    pub fn recolor(&mut self, job: &RecolorJob) -> Result<JobReport, EngineError> {
        job.run(&mut *self.doc, &self.config)
    }
}

impl<D: HostDocument + ?Sized> std::fmt::Debug for OverrideEngine<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
