//! Configuration structures for receipt scanning.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::receipt::Category;
use crate::error::{Result, ScanError};

/// Main configuration for gastoscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GastoscanConfig {
    /// Review policy applied to every extraction.
    pub review: ReviewConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Review settings for extracted receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Approve drafts without user confirmation.
    pub auto_approve: bool,

    /// Category used when none could be inferred.
    pub default_category: Option<Category>,

    /// Skip drafts whose confidence is below the threshold.
    pub skip_low_confidence: bool,

    /// Confidence threshold (0 - 100).
    pub confidence_threshold: u8,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            auto_approve: false,
            default_category: None,
            skip_low_confidence: true,
            confidence_threshold: 70,
        }
    }
}

/// Output settings for the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include the normalized OCR text in JSON output.
    pub include_raw_text: bool,

    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_raw_text: true,
            pretty_json: false,
        }
    }
}

impl GastoscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot constrain on its own.
    pub fn validate(&self) -> Result<()> {
        if self.review.confidence_threshold > 100 {
            return Err(ScanError::Config(format!(
                "review.confidence_threshold must be between 0 and 100, got {}",
                self.review.confidence_threshold
            )));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GastoscanConfig =
            serde_json::from_str(r#"{"review": {"default_category": "Hogar"}}"#).unwrap();

        assert_eq!(config.review.default_category, Some(Category::Hogar));
        assert_eq!(config.review.confidence_threshold, 70);
        assert!(config.review.skip_low_confidence);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = GastoscanConfig::default();
        config.review.auto_approve = true;
        config.review.confidence_threshold = 90;
        config.save(&path).unwrap();

        let loaded = GastoscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(GastoscanConfig::from_file(&path).is_err());
        assert!(GastoscanConfig::from_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"review": {"confidence_threshold": 150}}"#).unwrap();

        let err = GastoscanConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}
