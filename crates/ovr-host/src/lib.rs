//! Override Host
//!
//! The narrow contract between the override engine and the document that owns
//! filters and views.
//!
//! - [`HostDocument`]: Reads, writes, attachments, filter creation, boundaries
//! - [`run_in_mutation_boundary`]: Commit-or-rollback wrapper around a body
//! - [`BoundaryError`]: Which step of a boundary run failed
//! - [`InMemoryDocument`]: Map-backed document with fault injection
//!
//! # Example
//!
//! ```rust
//! use ovr_host::{run_in_mutation_boundary, HostDocument, InMemoryDocument};
//! use ovr_model::{CategorySet, FilterDefinition, OverrideDescriptor, OverrideScope, RulePredicate, ViewKind};
//!
//! let mut doc = InMemoryDocument::new();
//! let view = doc.add_view("Level 1", ViewKind::View);
//! let walls = doc.add_filter(FilterDefinition::new("Walls", CategorySet::new(), RulePredicate::default()).unwrap());
//! let scope = OverrideScope::new(walls, view);
//!
//! run_in_mutation_boundary(&mut doc, "Attach", |d| d.attach(&scope)).unwrap();
//! assert!(doc.is_attached(&scope));
//! assert_eq!(doc.read_override(&scope).unwrap(), OverrideDescriptor::unset());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod boundary;
mod document;
mod error;
mod memory;

pub use boundary::{run_in_mutation_boundary, BoundaryError};
pub use document::HostDocument;
pub use error::HostError;
pub use memory::{DocumentSnapshot, Fault, InMemoryDocument, ViewRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
