//! Element identifiers
//!
//! Host elements (filters, views, line and fill patterns) are addressed by
//! integer ids handed out by the document. The wrappers keep them from being
//! mixed up at call sites.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifier of a filter definition in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(pub u64);

/// Identifier of a view or view template in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u64);

/// Reference to a line pattern or fill pattern element
///
/// The host uses a negative id as its "no element" sentinel. A pattern
/// reference carrying the sentinel counts as unset during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub i64);

impl PatternId {
    /// Host sentinel for "no pattern"
    pub const INVALID: Self = Self(-1);

    /// Create a pattern reference
    #[inline]
    #[must_use]
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Whether this reference points at a real element
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

macro_rules! impl_id_text {
    ($ty:ident, $inner:ty, $kind:literal) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<$inner>()
                    .map(Self)
                    .map_err(|_| ModelError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl From<$inner> for $ty {
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }
    };
}

impl_id_text!(FilterId, u64, "filter");
impl_id_text!(ViewId, u64, "view");
impl_id_text!(PatternId, i64, "pattern");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_sentinel_is_invalid() {
        assert!(!PatternId::INVALID.is_valid());
        assert!(PatternId::new(0).is_valid());
        assert!(PatternId::new(42).is_valid());
    }

    #[test]
    fn ids_parse_from_text() {
        assert_eq!(FilterId::from_str("12").unwrap(), FilterId(12));
        assert_eq!(ViewId::from_str(" 7 ").unwrap(), ViewId(7));
        assert_eq!(PatternId::from_str("-1").unwrap(), PatternId::INVALID);
    }

    #[test]
    fn ids_reject_garbage() {
        let err = FilterId::from_str("abc").unwrap_err();
        assert!(matches!(err, ModelError::InvalidId { kind: "filter", .. }));
        assert!(ViewId::from_str("-3").is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&FilterId(5)).unwrap();
        assert_eq!(json, "5");
        let back: PatternId = serde_json::from_str("-1").unwrap();
        assert_eq!(back, PatternId::INVALID);
    }
}
