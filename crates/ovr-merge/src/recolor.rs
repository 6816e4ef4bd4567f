//! Bulk recolor patches
//!
//! A [`RecolorPatch`] stamps one color (and optionally one fill pattern) onto
//! chosen parts of a descriptor, leaving every other property as it was.

use crate::selector::SelectorError;
use ovr_model::{Color, OverrideDescriptor, PatternId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Part of a descriptor a recolor can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecolorPart {
    /// Projection fill foreground layer
    ProjectionFillForeground,
    /// Projection fill background layer
    ProjectionFillBackground,
    /// Cut fill foreground layer
    CutFillForeground,
    /// Cut fill background layer
    CutFillBackground,
    /// Projection line color
    ProjectionLineColor,
    /// Cut line color
    CutLineColor,
}

impl RecolorPart {
    /// Whether the part is a fill layer (and so can take a pattern)
    #[inline]
    #[must_use]
    pub fn is_fill(self) -> bool {
        !matches!(self, Self::ProjectionLineColor | Self::CutLineColor)
    }
}

impl FromStr for RecolorPart {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '_'], "-").as_str() {
            "projection-fill-foreground" => Ok(Self::ProjectionFillForeground),
            "projection-fill-background" => Ok(Self::ProjectionFillBackground),
            "cut-fill-foreground" => Ok(Self::CutFillForeground),
            "cut-fill-background" => Ok(Self::CutFillBackground),
            "projection-line-color" => Ok(Self::ProjectionLineColor),
            "cut-line-color" => Ok(Self::CutLineColor),
            _ => Err(SelectorError::UnknownRecolorPart(s.to_string())),
        }
    }
}

/// Color (and optional fill pattern) applied to chosen parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecolorPatch {
    parts: BTreeSet<RecolorPart>,
    color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<PatternId>,
}

impl RecolorPatch {
    /// Create patch
    pub fn new(parts: impl IntoIterator<Item = RecolorPart>, color: Color) -> Self {
        Self {
            parts: parts.into_iter().collect(),
            color,
            pattern: None,
        }
    }

    /// Also set this fill pattern on the fill parts
    #[inline]
    #[must_use]
    pub fn with_pattern(mut self, pattern: PatternId) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Targeted parts
    pub fn parts(&self) -> impl Iterator<Item = RecolorPart> + '_ {
        self.parts.iter().copied()
    }

    /// Color applied
    #[inline]
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Check the patch is usable
    ///
    /// # Errors
    /// - [`SelectorError::NoRecolorParts`] with no parts
    /// - [`SelectorError::PatternWithoutFillPart`] if a pattern is given
    ///   but only line parts are chosen
    pub fn validate(&self) -> Result<(), SelectorError> {
        if self.parts.is_empty() {
            return Err(SelectorError::NoRecolorParts);
        }
        if self.pattern.is_some() && !self.parts.iter().any(|p| p.is_fill()) {
            return Err(SelectorError::PatternWithoutFillPart);
        }
        Ok(())
    }

    /// Apply to a copy of `baseline`
    #[must_use]
    pub fn apply(&self, baseline: &OverrideDescriptor) -> OverrideDescriptor {
        let mut result = *baseline;
        let pattern = self.pattern.filter(PatternId::is_valid);

        for part in &self.parts {
            let layer = match part {
                RecolorPart::ProjectionLineColor => {
                    result.projection_line.color = Some(self.color);
                    continue;
                }
                RecolorPart::CutLineColor => {
                    result.cut_line.color = Some(self.color);
                    continue;
                }
                RecolorPart::ProjectionFillForeground => &mut result.projection_fill.foreground,
                RecolorPart::ProjectionFillBackground => &mut result.projection_fill.background,
                RecolorPart::CutFillForeground => &mut result.cut_fill.foreground,
                RecolorPart::CutFillBackground => &mut result.cut_fill.background,
            };
            layer.color = Some(self.color);
            if pattern.is_some() {
                layer.pattern = pattern;
            }
        }

        result
    }
}
