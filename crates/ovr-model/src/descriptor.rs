//! Override descriptor
//!
//! [`OverrideDescriptor`] is the full set of graphic overrides a filter can
//! carry inside one view. Every property is independently optional: `None`
//! means "the view does not override this", which is different from an
//! override that happens to equal the host default.

use crate::error::ModelError;
use crate::ids::PatternId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create color from channels
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ModelError;

    /// Accepts `#RRGGBB` or `R,G,B`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidColor(s.to_string());
        let text = s.trim();

        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        Ok(Self::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
    }
}

/// Line weight (pen number), 1 through 16
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LineWeight(u8);

impl LineWeight {
    /// Lightest pen
    pub const MIN: u8 = 1;
    /// Heaviest pen
    pub const MAX: u8 = 16;

    /// Create a weight, validating the pen range
    ///
    /// # Errors
    /// Returns [`ModelError::LineWeightOutOfRange`] outside 1..=16
    pub fn new(weight: u8) -> Result<Self, ModelError> {
        if (Self::MIN..=Self::MAX).contains(&weight) {
            Ok(Self(weight))
        } else {
            Err(ModelError::LineWeightOutOfRange(weight))
        }
    }

    /// Pen number
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LineWeight {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LineWeight> for u8 {
    fn from(weight: LineWeight) -> Self {
        weight.0
    }
}

/// Surface transparency percentage, 0 through 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Transparency(u8);

impl Transparency {
    /// Create a transparency value
    ///
    /// # Errors
    /// Returns [`ModelError::TransparencyOutOfRange`] above 100
    pub fn new(percent: u8) -> Result<Self, ModelError> {
        if percent <= 100 {
            Ok(Self(percent))
        } else {
            Err(ModelError::TransparencyOutOfRange(percent))
        }
    }

    /// Percentage value
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Transparency {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Transparency> for u8 {
    fn from(value: Transparency) -> Self {
        value.0
    }
}

/// View detail level override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// Coarse detail
    Coarse,
    /// Medium detail
    Medium,
    /// Fine detail
    Fine,
}

impl FromStr for DetailLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" => Ok(Self::Coarse),
            "medium" => Ok(Self::Medium),
            "fine" => Ok(Self::Fine),
            _ => Err(ModelError::UnknownDetailLevel(s.to_string())),
        }
    }
}

/// Line override (projection or cut)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOverride {
    /// Line color
    pub color: Option<Color>,
    /// Line pattern element
    pub pattern: Option<PatternId>,
    /// Line weight
    pub weight: Option<LineWeight>,
}

impl LineOverride {
    /// Whether nothing is overridden
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.color.is_none() && self.pattern.is_none() && self.weight.is_none()
    }
}

/// One half of a fill override: a pattern and its color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FillLayer {
    /// Fill pattern element
    pub pattern: Option<PatternId>,
    /// Pattern color
    pub color: Option<Color>,
}

impl FillLayer {
    /// Whether nothing is overridden
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.pattern.is_none() && self.color.is_none()
    }
}

/// Fill override with foreground and background layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOverride {
    /// Foreground pattern layer
    pub foreground: FillLayer,
    /// Background pattern layer
    pub background: FillLayer,
}

impl FillOverride {
    /// Whether nothing is overridden
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.foreground.is_unset() && self.background.is_unset()
    }
}

/// Full graphic override state of one filter within one view
///
/// A plain value: reading it from one scope and writing it to another never
/// shares state between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideDescriptor {
    /// Projection (surface) lines
    pub projection_line: LineOverride,
    /// Cut lines
    pub cut_line: LineOverride,
    /// Projection (surface) fill patterns
    pub projection_fill: FillOverride,
    /// Cut fill patterns
    pub cut_fill: FillOverride,
    /// Surface transparency
    pub transparency: Option<Transparency>,
    /// Halftone flag; always defined
    pub halftone: bool,
    /// Detail level
    pub detail_level: Option<DetailLevel>,
    /// Filter visibility, present only when the host reports support for it
    pub visibility: Option<bool>,
}

impl OverrideDescriptor {
    /// Descriptor with nothing overridden
    #[inline]
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// Whether every graphic property is unset
    ///
    /// Visibility is not a graphic override and is ignored here.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.projection_line.is_unset()
            && self.cut_line.is_unset()
            && self.projection_fill.is_unset()
            && self.cut_fill.is_unset()
            && self.transparency.is_none()
            && !self.halftone
            && self.detail_level.is_none()
    }

    /// Set projection line color
    #[inline]
    #[must_use]
    pub fn with_projection_line_color(mut self, color: Color) -> Self {
        self.projection_line.color = Some(color);
        self
    }

    /// Set cut line color
    #[inline]
    #[must_use]
    pub fn with_cut_line_color(mut self, color: Color) -> Self {
        self.cut_line.color = Some(color);
        self
    }

    /// Set projection fill foreground pattern
    #[inline]
    #[must_use]
    pub fn with_projection_fill_foreground(mut self, pattern: PatternId, color: Option<Color>) -> Self {
        self.projection_fill.foreground = FillLayer {
            pattern: Some(pattern),
            color,
        };
        self
    }

    /// Set projection fill background pattern
    #[inline]
    #[must_use]
    pub fn with_projection_fill_background(mut self, pattern: PatternId, color: Option<Color>) -> Self {
        self.projection_fill.background = FillLayer {
            pattern: Some(pattern),
            color,
        };
        self
    }

    /// Set transparency
    #[inline]
    #[must_use]
    pub fn with_transparency(mut self, transparency: Transparency) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Set halftone
    #[inline]
    #[must_use]
    pub fn with_halftone(mut self, halftone: bool) -> Self {
        self.halftone = halftone;
        self
    }

    /// Set detail level
    #[inline]
    #[must_use]
    pub fn with_detail_level(mut self, level: DetailLevel) -> Self {
        self.detail_level = Some(level);
        self
    }

    /// Set visibility
    #[inline]
    #[must_use]
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visibility = Some(visible);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_weight_range() {
        assert!(LineWeight::new(0).is_err());
        assert_eq!(LineWeight::new(1).unwrap().get(), 1);
        assert_eq!(LineWeight::new(16).unwrap().get(), 16);
        assert_eq!(LineWeight::new(17), Err(ModelError::LineWeightOutOfRange(17)));
    }

    #[test]
    fn transparency_range() {
        assert_eq!(Transparency::new(0).unwrap().get(), 0);
        assert_eq!(Transparency::new(100).unwrap().get(), 100);
        assert!(Transparency::new(101).is_err());
    }

    #[test]
    fn line_weight_rejected_on_deserialize() {
        let bad = serde_json::from_str::<LineWeight>("20");
        assert!(bad.is_err());
        let ok: LineWeight = serde_json::from_str("5").unwrap();
        assert_eq!(ok.get(), 5);
    }

    #[test]
    fn color_parses_hex_and_triplet() {
        assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("#00ff7f".parse::<Color>().unwrap(), Color::rgb(0, 255, 127));
        assert_eq!("0, 0,255".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
        assert!("#12345".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert!("1,2,300".parse::<Color>().is_err());
    }

    #[test]
    fn color_display_round_trips() {
        let c = Color::rgb(18, 52, 86);
        assert_eq!(c.to_string(), "#123456");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
    }

    #[test]
    fn detail_level_parse() {
        assert_eq!("Fine".parse::<DetailLevel>().unwrap(), DetailLevel::Fine);
        assert!("ultra".parse::<DetailLevel>().is_err());
    }

    #[test]
    fn unset_descriptor_is_unset() {
        let d = OverrideDescriptor::unset();
        assert!(d.is_unset());
        assert!(!d.with_halftone(true).is_unset());
        assert!(d.with_visibility(false).is_unset());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let d: OverrideDescriptor =
            serde_json::from_str(r#"{"projection_line":{"color":{"r":255,"g":0,"b":0}}}"#).unwrap();
        assert_eq!(d.projection_line.color, Some(Color::rgb(255, 0, 0)));
        assert!(d.cut_line.is_unset());
        assert!(!d.halftone);
    }

    #[test]
    fn descriptors_are_values() {
        let source = OverrideDescriptor::unset().with_cut_line_color(Color::rgb(1, 2, 3));
        let mut copy = source;
        copy.cut_line.color = None;
        assert_eq!(source.cut_line.color, Some(Color::rgb(1, 2, 3)));
    }
}
