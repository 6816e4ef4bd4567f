//! Filter definitions
//!
//! A filter definition is what a duplicated filter copies: its name, the
//! categories it applies to and its rule predicate. The predicate is opaque
//! here and only ever copied verbatim.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Built-in category identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

/// Ordered set of categories a filter applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<CategoryId>);

impl CategorySet {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category
    #[inline]
    pub fn insert(&mut self, category: CategoryId) -> bool {
        self.0.insert(category)
    }

    /// Whether the set contains a category
    #[inline]
    #[must_use]
    pub fn contains(&self, category: CategoryId) -> bool {
        self.0.contains(&category)
    }

    /// Number of categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate categories in id order
    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CategoryId> for CategorySet {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Element-selection rule of a filter, kept as an opaque document value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulePredicate(pub serde_json::Value);

impl RulePredicate {
    /// Wrap a host rule value
    #[inline]
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Structural definition of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Name, unique within the document's filter namespace
    pub name: String,
    /// Categories the filter applies to
    #[serde(default)]
    pub categories: CategorySet,
    /// Element-selection rule
    #[serde(default)]
    pub rule: RulePredicate,
}

impl FilterDefinition {
    /// Create a definition, rejecting blank names
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyName`] if `name` is blank
    pub fn new(
        name: impl Into<String>,
        categories: CategorySet,
        rule: RulePredicate,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            name,
            categories,
            rule,
        })
    }

    /// Same categories and rule under a different name
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyName`] if `name` is blank
    pub fn renamed(&self, name: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(name, self.categories.clone(), self.rule.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn walls_and_doors() -> CategorySet {
        [CategoryId(-2000011), CategoryId(-2000023)].into_iter().collect()
    }

    #[test]
    fn blank_names_rejected() {
        let err = FilterDefinition::new("  ", CategorySet::new(), RulePredicate::default());
        assert_eq!(err.unwrap_err(), ModelError::EmptyName);
    }

    #[test]
    fn renamed_copies_structure() {
        let original = FilterDefinition::new(
            "Fire Rated",
            walls_and_doors(),
            RulePredicate::new(json!({"param": "Fire Rating", "op": "has_value"})),
        )
        .unwrap();

        let copy = original.renamed("Fire Rated_Copy").unwrap();
        assert_eq!(copy.name, "Fire Rated_Copy");
        assert_eq!(copy.categories, original.categories);
        assert_eq!(copy.rule, original.rule);
    }

    #[test]
    fn category_set_dedupes() {
        let mut set = walls_and_doors();
        assert_eq!(set.len(), 2);
        assert!(!set.insert(CategoryId(-2000011)));
        assert!(set.contains(CategoryId(-2000023)));
    }
}
