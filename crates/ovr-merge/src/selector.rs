//! Field selection for selective merges
//!
//! A [`FieldSelector`] is the user's choice of which override property groups
//! take part in a merge, plus a foreground/background refinement for each of
//! the two fill groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Override property group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyGroup {
    /// Projection line color, pattern and weight
    ProjectionLines,
    /// Cut line color, pattern and weight
    CutLines,
    /// Projection fill foreground/background patterns and colors
    ProjectionFills,
    /// Cut fill foreground/background patterns and colors
    CutFills,
    /// Surface transparency
    Transparency,
    /// Halftone flag
    Halftone,
    /// Detail level
    DetailLevel,
    /// Everything; turns the merge into a full overwrite
    All,
}

impl PropertyGroup {
    /// Every group except [`PropertyGroup::All`]
    pub const PARTIAL: [Self; 7] = [
        Self::ProjectionLines,
        Self::CutLines,
        Self::ProjectionFills,
        Self::CutFills,
        Self::Transparency,
        Self::Halftone,
        Self::DetailLevel,
    ];

    /// Whether the group needs a [`FillPart`] refinement
    #[inline]
    #[must_use]
    pub fn needs_refinement(self) -> bool {
        matches!(self, Self::ProjectionFills | Self::CutFills)
    }

    /// Stable name used in text forms
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectionLines => "projection-lines",
            Self::CutLines => "cut-lines",
            Self::ProjectionFills => "projection-fills",
            Self::CutFills => "cut-fills",
            Self::Transparency => "transparency",
            Self::Halftone => "halftone",
            Self::DetailLevel => "detail-level",
            Self::All => "all",
        }
    }
}

impl Display for PropertyGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyGroup {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::PARTIAL
            .into_iter()
            .chain([Self::All])
            .find(|g| g.as_str() == key)
            .ok_or_else(|| SelectorError::UnknownGroup(s.to_string()))
    }
}

/// Which half of a fill group participates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPart {
    /// Foreground pattern and color only
    Foreground,
    /// Background pattern and color only
    Background,
    /// Both layers, each gated independently
    Both,
}

impl FillPart {
    /// Whether the foreground layer is included
    #[inline]
    #[must_use]
    pub fn includes_foreground(self) -> bool {
        matches!(self, Self::Foreground | Self::Both)
    }

    /// Whether the background layer is included
    #[inline]
    #[must_use]
    pub fn includes_background(self) -> bool {
        matches!(self, Self::Background | Self::Both)
    }
}

impl FromStr for FillPart {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fg" | "foreground" => Ok(Self::Foreground),
            "bg" | "background" => Ok(Self::Background),
            "both" | "all" => Ok(Self::Both),
            _ => Err(SelectorError::UnknownFillPart(s.to_string())),
        }
    }
}

/// Selector errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// No group chosen
    #[error("selector is empty: choose at least one property group or 'all'")]
    Empty,

    /// Fill group chosen without a foreground/background refinement
    #[error("{0} requires a fill part refinement (foreground, background or both)")]
    MissingRefinement(PropertyGroup),

    /// Recolor request without any part
    #[error("recolor request names no part to change")]
    NoRecolorParts,

    /// Recolor pattern given but no fill part selected
    #[error("a fill pattern was given but no fill part is selected")]
    PatternWithoutFillPart,

    /// Unrecognized group name
    #[error("unknown property group: '{0}'")]
    UnknownGroup(String),

    /// Unrecognized fill part name
    #[error("unknown fill part: '{0}'")]
    UnknownFillPart(String),

    /// Unrecognized recolor part name
    #[error("unknown recolor part: '{0}'")]
    UnknownRecolorPart(String),
}

/// User-chosen subset of override property groups
///
/// Built with [`FieldSelector::new`] and the `with_*` methods, then checked
/// with [`FieldSelector::validate`] before a merge runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    groups: BTreeSet<PropertyGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    projection_fill_part: Option<FillPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cut_fill_part: Option<FillPart>,
}

impl FieldSelector {
    /// Empty selector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-overwrite selector
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::new().with(PropertyGroup::All)
    }

    /// Add a group without a refinement
    #[inline]
    #[must_use]
    pub fn with(mut self, group: PropertyGroup) -> Self {
        self.groups.insert(group);
        self
    }

    /// Add projection fills with a refinement
    #[inline]
    #[must_use]
    pub fn with_projection_fills(mut self, part: FillPart) -> Self {
        self.groups.insert(PropertyGroup::ProjectionFills);
        self.projection_fill_part = Some(part);
        self
    }

    /// Add cut fills with a refinement
    #[inline]
    #[must_use]
    pub fn with_cut_fills(mut self, part: FillPart) -> Self {
        self.groups.insert(PropertyGroup::CutFills);
        self.cut_fill_part = Some(part);
        self
    }

    /// Whether the merge is a full overwrite
    #[inline]
    #[must_use]
    pub fn is_full_copy(&self) -> bool {
        self.groups.contains(&PropertyGroup::All)
    }

    /// Whether a group participates
    ///
    /// Under `All` every group participates.
    #[inline]
    #[must_use]
    pub fn includes(&self, group: PropertyGroup) -> bool {
        self.is_full_copy() || self.groups.contains(&group)
    }

    /// Groups as chosen, in declaration order
    pub fn groups(&self) -> impl Iterator<Item = PropertyGroup> + '_ {
        self.groups.iter().copied()
    }

    /// Effective projection fill refinement
    ///
    /// `None` under `All`, where refinements are meaningless.
    #[inline]
    #[must_use]
    pub fn projection_fill_part(&self) -> Option<FillPart> {
        if self.is_full_copy() {
            None
        } else {
            self.projection_fill_part
        }
    }

    /// Effective cut fill refinement
    ///
    /// `None` under `All`, where refinements are meaningless.
    #[inline]
    #[must_use]
    pub fn cut_fill_part(&self) -> Option<FillPart> {
        if self.is_full_copy() {
            None
        } else {
            self.cut_fill_part
        }
    }

    /// Check the selector is usable for a merge
    ///
    /// # Errors
    /// - [`SelectorError::Empty`] if no group is chosen
    /// - [`SelectorError::MissingRefinement`] if a fill group lacks its
    ///   refinement outside `All`
    pub fn validate(&self) -> Result<(), SelectorError> {
        if self.groups.is_empty() {
            return Err(SelectorError::Empty);
        }
        if self.is_full_copy() {
            return Ok(());
        }
        if self.groups.contains(&PropertyGroup::ProjectionFills) && self.projection_fill_part.is_none() {
            return Err(SelectorError::MissingRefinement(PropertyGroup::ProjectionFills));
        }
        if self.groups.contains(&PropertyGroup::CutFills) && self.cut_fill_part.is_none() {
            return Err(SelectorError::MissingRefinement(PropertyGroup::CutFills));
        }
        Ok(())
    }
}

impl Display for FieldSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_full_copy() {
            return f.write_str("all");
        }
        let mut first = true;
        for group in &self.groups {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{group}")?;
            let part = match group {
                PropertyGroup::ProjectionFills => self.projection_fill_part,
                PropertyGroup::CutFills => self.cut_fill_part,
                _ => None,
            };
            if let Some(part) = part {
                write!(f, " ({part:?})")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selector_rejected() {
        assert_eq!(FieldSelector::new().validate(), Err(SelectorError::Empty));
    }

    #[test]
    fn fill_group_needs_refinement() {
        let sel = FieldSelector::new().with(PropertyGroup::ProjectionFills);
        assert_eq!(
            sel.validate(),
            Err(SelectorError::MissingRefinement(PropertyGroup::ProjectionFills))
        );

        let sel = FieldSelector::new()
            .with_projection_fills(FillPart::Both)
            .with(PropertyGroup::CutFills);
        assert_eq!(
            sel.validate(),
            Err(SelectorError::MissingRefinement(PropertyGroup::CutFills))
        );
    }

    #[test]
    fn all_ignores_refinements() {
        let sel = FieldSelector::all()
            .with(PropertyGroup::CutFills)
            .with_projection_fills(FillPart::Foreground);
        assert!(sel.validate().is_ok());
        assert!(sel.is_full_copy());
        assert_eq!(sel.projection_fill_part(), None);
        assert_eq!(sel.cut_fill_part(), None);
        assert!(sel.includes(PropertyGroup::DetailLevel));
    }

    #[test]
    fn partial_selector_valid() {
        let sel = FieldSelector::new()
            .with(PropertyGroup::ProjectionLines)
            .with_cut_fills(FillPart::Background);
        assert!(sel.validate().is_ok());
        assert!(sel.includes(PropertyGroup::CutFills));
        assert!(!sel.includes(PropertyGroup::Halftone));
        assert_eq!(sel.cut_fill_part(), Some(FillPart::Background));
    }

    #[test]
    fn group_names_parse() {
        assert_eq!("Projection Lines".parse::<PropertyGroup>().unwrap(), PropertyGroup::ProjectionLines);
        assert_eq!("cut_fills".parse::<PropertyGroup>().unwrap(), PropertyGroup::CutFills);
        assert_eq!("all".parse::<PropertyGroup>().unwrap(), PropertyGroup::All);
        assert!(matches!(
            "shadows".parse::<PropertyGroup>(),
            Err(SelectorError::UnknownGroup(_))
        ));
    }

    #[test]
    fn fill_parts_parse() {
        assert_eq!("fg".parse::<FillPart>().unwrap(), FillPart::Foreground);
        assert_eq!("Background".parse::<FillPart>().unwrap(), FillPart::Background);
        assert_eq!("both".parse::<FillPart>().unwrap(), FillPart::Both);
        assert!("middle".parse::<FillPart>().is_err());
    }

    #[test]
    fn fill_part_layers() {
        assert!(FillPart::Both.includes_foreground() && FillPart::Both.includes_background());
        assert!(!FillPart::Foreground.includes_background());
        assert!(!FillPart::Background.includes_foreground());
    }

    #[test]
    fn selector_display() {
        let sel = FieldSelector::new()
            .with(PropertyGroup::Halftone)
            .with_projection_fills(FillPart::Background);
        assert_eq!(sel.to_string(), "projection-fills (Background), halftone");
        assert_eq!(FieldSelector::all().to_string(), "all");
    }
}
