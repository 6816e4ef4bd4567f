//! Override Merge
//!
//! Selective, baseline-preserving merge of filter graphic overrides.
//!
//! # Core Concepts
//!
//! - [`FieldSelector`]: Which property groups take part, with fill refinements
//! - [`OverrideMerger`]: Copies selected, set fields from a source onto a baseline
//! - [`RecolorPatch`]: Stamps one color/pattern onto chosen parts
//!
//! # Example
//!
//! ```rust
//! use ovr_merge::{merge, FieldSelector, FillPart, PropertyGroup};
//! use ovr_model::{Color, OverrideDescriptor};
//!
//! let source = OverrideDescriptor::unset().with_projection_line_color(Color::rgb(255, 0, 0));
//! let target = OverrideDescriptor::unset().with_cut_line_color(Color::rgb(0, 0, 255));
//!
//! let selector = FieldSelector::new()
//!     .with(PropertyGroup::ProjectionLines)
//!     .with_cut_fills(FillPart::Both);
//! selector.validate().unwrap();
//!
//! let merged = merge(&source, &target, &selector);
//! assert_eq!(merged.projection_line.color, Some(Color::rgb(255, 0, 0)));
//! assert_eq!(merged.cut_line.color, Some(Color::rgb(0, 0, 255)));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod merger;
mod recolor;
mod selector;

pub use merger::{merge, OverrideMerger};
pub use recolor::{RecolorPart, RecolorPatch};
pub use selector::{FieldSelector, FillPart, PropertyGroup, SelectorError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
