//! Selective override merge
//!
//! [`OverrideMerger::merge`] copies the selected property groups from a
//! source descriptor onto a target's current descriptor. Fields outside the
//! selection, and selected fields the source leaves unset, keep the target's
//! value. The result is always built from the target baseline, never from an
//! empty descriptor: starting from empty would blank every unselected field.

use crate::selector::{FieldSelector, FillPart, PropertyGroup};
use ovr_model::{FillLayer, FillOverride, LineOverride, OverrideDescriptor, PatternId};

/// Stateless merge of override descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideMerger;

impl OverrideMerger {
    /// Create merger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Merge `source` onto `baseline` under `selector`
    ///
    /// Total over any input. A fill group whose refinement is missing copies
    /// nothing; callers are expected to reject such selectors with
    /// [`FieldSelector::validate`] first.
    #[must_use]
    pub fn merge(
        &self,
        source: &OverrideDescriptor,
        baseline: &OverrideDescriptor,
        selector: &FieldSelector,
    ) -> OverrideDescriptor {
        if selector.is_full_copy() {
            return *source;
        }

        let mut result = *baseline;

        if selector.includes(PropertyGroup::ProjectionLines) {
            merge_lines(&mut result.projection_line, &source.projection_line);
        }
        if selector.includes(PropertyGroup::CutLines) {
            merge_lines(&mut result.cut_line, &source.cut_line);
        }
        if let Some(part) = selector.projection_fill_part() {
            if selector.includes(PropertyGroup::ProjectionFills) {
                merge_fills(&mut result.projection_fill, &source.projection_fill, part);
            }
        }
        if let Some(part) = selector.cut_fill_part() {
            if selector.includes(PropertyGroup::CutFills) {
                merge_fills(&mut result.cut_fill, &source.cut_fill, part);
            }
        }
        if selector.includes(PropertyGroup::Transparency) {
            copy_set(&mut result.transparency, source.transparency);
        }
        if selector.includes(PropertyGroup::Halftone) {
            result.halftone = source.halftone;
        }
        if selector.includes(PropertyGroup::DetailLevel) {
            copy_set(&mut result.detail_level, source.detail_level);
        }

        result
    }
}

/// Merge `source` onto `baseline` under `selector`
///
/// Shorthand for [`OverrideMerger::merge`].
#[inline]
#[must_use]
pub fn merge(
    source: &OverrideDescriptor,
    baseline: &OverrideDescriptor,
    selector: &FieldSelector,
) -> OverrideDescriptor {
    OverrideMerger.merge(source, baseline, selector)
}

fn merge_lines(target: &mut LineOverride, source: &LineOverride) {
    copy_set(&mut target.color, source.color);
    copy_pattern(&mut target.pattern, source.pattern);
    copy_set(&mut target.weight, source.weight);
}

fn merge_fills(target: &mut FillOverride, source: &FillOverride, part: FillPart) {
    if part.includes_foreground() {
        merge_layer(&mut target.foreground, &source.foreground);
    }
    if part.includes_background() {
        merge_layer(&mut target.background, &source.background);
    }
}

fn merge_layer(target: &mut FillLayer, source: &FillLayer) {
    copy_pattern(&mut target.pattern, source.pattern);
    copy_set(&mut target.color, source.color);
}

#[inline]
fn copy_set<T: Copy>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

// sentinel ids count as unset
#[inline]
fn copy_pattern(target: &mut Option<PatternId>, source: Option<PatternId>) {
    if let Some(id) = source.filter(PatternId::is_valid) {
        *target = Some(id);
    }
}
