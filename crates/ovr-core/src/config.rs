//! Engine configuration

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attach a filter to a target view that lacks it before writing
    pub auto_attach_targets: bool,
    /// Report a target equal to the source as skipped instead of rewriting it
    pub skip_source_in_targets: bool,
    /// Suffix for suggested duplicate names
    pub duplicate_suffix: String,
    /// Mutation boundary names per job
    pub boundary_labels: BoundaryLabels,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With auto-attach behavior
    #[inline]
    #[must_use]
    pub fn with_auto_attach(mut self, enabled: bool) -> Self {
        self.auto_attach_targets = enabled;
        self
    }

    /// With source-in-targets skipping
    #[inline]
    #[must_use]
    pub fn with_skip_source(mut self, enabled: bool) -> Self {
        self.skip_source_in_targets = enabled;
        self
    }

    /// With duplicate name suffix
    #[inline]
    #[must_use]
    pub fn with_duplicate_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.duplicate_suffix = suffix.into();
        self
    }

    /// Parse TOML text; missing keys keep their defaults
    ///
    /// # Errors
    /// [`EngineError::Config`] on malformed TOML
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// [`EngineError::Config`] if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_attach_targets: true,
            skip_source_in_targets: true,
            duplicate_suffix: "_Copy".to_string(),
            boundary_labels: BoundaryLabels::default(),
        }
    }
}

/// Human-readable mutation boundary names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryLabels {
    /// Propagation between filters/views
    pub propagate: String,
    /// Copying filters between views
    pub copy_between_views: String,
    /// Filter duplication
    pub duplicate: String,
    /// Override reset
    pub reset: String,
    /// Bulk recolor
    pub recolor: String,
}

impl Default for BoundaryLabels {
    fn default() -> Self {
        Self {
            propagate: "Copy Filter Overrides".to_string(),
            copy_between_views: "Copy Filters Between Views".to_string(),
            duplicate: "Duplicate Filter with Overrides".to_string(),
            reset: "Reset Filter Overrides".to_string(),
            recolor: "Change Filter Color & Pattern".to_string(),
        }
    }
}
