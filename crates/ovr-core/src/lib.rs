//! Override Core - filter override synchronization jobs
//!
//! Reads the graphic overrides a filter carries in one view and replays them,
//! fully or selectively, onto other filters or views. Every job mutates the
//! document inside one named mutation boundary.
//!
//! # Core Concepts
//!
//! - [`PropagationJob`]: One source scope merged onto many targets, best effort
//! - [`ViewCopyJob`]: Several filters copied from one view into others
//! - [`DuplicationJob`]: Clone a filter and seed its overrides, all or nothing
//! - [`ResetJob`] / [`RecolorJob`]: Clear or restyle overrides in place
//! - [`OverrideEngine`]: Document plus [`EngineConfig`], one method per job
//!
//! # Example
//!
//! ```rust
//! use ovr_core::prelude::*;
//! use ovr_host::{HostDocument, InMemoryDocument};
//! use ovr_model::{CategorySet, Color, FilterDefinition, OverrideDescriptor, OverrideScope, RulePredicate, ViewKind};
//!
//! let mut doc = InMemoryDocument::new();
//! let view = doc.add_view("Level 1", ViewKind::View);
//! let walls = doc.add_filter(FilterDefinition::new("Walls", CategorySet::new(), RulePredicate::default()).unwrap());
//! let doors = doc.add_filter(FilterDefinition::new("Doors", CategorySet::new(), RulePredicate::default()).unwrap());
//! let red = OverrideDescriptor::unset().with_cut_line_color(Color::rgb(255, 0, 0));
//! doc.seed(OverrideScope::new(walls, view), red).unwrap();
//!
//! let mut engine = OverrideEngine::new(&mut doc, EngineConfig::default());
//! let job = PropagationJob::within_view(view, walls, [doors], FieldSelector::all());
//! let report = engine.propagate(&job).unwrap();
//! assert!(report.is_complete_success());
//!
//! assert_eq!(doc.read_override(&OverrideScope::new(doors, view)).unwrap(), red);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod duplication;
pub mod engine;
pub mod error;
pub mod propagation;
pub mod recolor;
pub mod report;
pub mod reset;

// Re-exports for convenience
pub use config::{BoundaryLabels, EngineConfig};
pub use duplication::DuplicationJob;
pub use engine::OverrideEngine;
pub use error::EngineError;
pub use propagation::{PropagationJob, ViewCopyJob};
pub use recolor::RecolorJob;
pub use report::{DuplicationOutcome, JobKind, JobReport, OutcomeStatus, SkipReason, TargetOutcome};
pub use reset::ResetJob;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running override jobs
    pub use crate::{
        DuplicationJob, EngineConfig, EngineError, JobReport, OutcomeStatus, OverrideEngine,
        PropagationJob, RecolorJob, ResetJob, ViewCopyJob,
    };
    pub use ovr_merge::{FieldSelector, FillPart, PropertyGroup, RecolorPart, RecolorPatch};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
