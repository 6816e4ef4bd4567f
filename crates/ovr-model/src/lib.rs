//! Override Model
//!
//! Value types shared by every layer of the override synchronization engine.
//!
//! # Core Concepts
//!
//! - [`OverrideDescriptor`]: Full graphic override state of a filter in a view
//! - [`OverrideScope`]: (filter, view) pair addressing one descriptor
//! - [`FilterDefinition`]: Name, categories and rule of a filter
//! - [`FilterId`], [`ViewId`], [`PatternId`]: Host element identifiers
//!
//! # Example
//!
//! ```rust
//! use ovr_model::{Color, FilterId, OverrideDescriptor, OverrideScope, ViewId};
//!
//! let scope = OverrideScope::new(FilterId(12), ViewId(3));
//! let red_lines = OverrideDescriptor::unset().with_projection_line_color(Color::rgb(255, 0, 0));
//! assert!(!red_lines.is_unset());
//! assert_eq!(scope.to_string(), "filter 12 in view 3");
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod descriptor;
mod error;
mod filter;
mod ids;
mod scope;

pub use descriptor::{
    Color, DetailLevel, FillLayer, FillOverride, LineOverride, LineWeight, OverrideDescriptor,
    Transparency,
};
pub use error::ModelError;
pub use filter::{CategoryId, CategorySet, FilterDefinition, RulePredicate};
pub use ids::{FilterId, PatternId, ViewId};
pub use scope::{OverrideScope, ViewKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
