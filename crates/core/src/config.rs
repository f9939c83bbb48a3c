use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::normalize::MAX_HEADER_ROWS;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Tunables for the parse and compare pipeline.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub pricing: PricingConfig,
    pub anomaly: AnomalyConfig,
    pub similarity: SimilarityConfig,
}

// ---------------------------------------------------------------------------
// Pricing classifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Minimum confidence (0-100) for a table to count as a pricing table.
    pub confidence_threshold: u8,
    /// Upper bound on leading rows treated as header.
    pub max_header_rows: usize,
    /// A sampled cell longer than this marks the table as narrative.
    pub narrative_cell_chars: usize,
    /// Data rows inspected by the per-row signals.
    pub sample_rows: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 60,
            max_header_rows: 4,
            narrative_cell_chars: 500,
            sample_rows: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Anomaly detector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnomalyConfig {
    pub max_columns: usize,
    pub max_price_headers: usize,
    /// Sub-national region markers. Short upper-case codes match as whole
    /// words; anything longer matches case-insensitively as a phrase.
    pub region_tokens: Vec<String>,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            max_columns: 6,
            max_price_headers: 3,
            region_tokens: ["NSW", "VIC", "QLD", "SA", "WA", "TAS", "NT", "ACT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Similarity thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityConfig {
    /// Match threshold for guidance and heading records.
    pub diff_threshold: u8,
    /// Match threshold for business rules.
    pub rule_threshold: u8,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            diff_threshold: 85,
            rule_threshold: 70,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn from_toml(input: &str) -> Result<Self, CoreError> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::ConfigEncode(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let percent_fields = [
            ("pricing.confidence_threshold", self.pricing.confidence_threshold),
            ("similarity.diff_threshold", self.similarity.diff_threshold),
            ("similarity.rule_threshold", self.similarity.rule_threshold),
        ];
        for (name, value) in percent_fields {
            if value > 100 {
                return Err(CoreError::ConfigValidation(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }

        let at_least_one = [
            ("pricing.max_header_rows", self.pricing.max_header_rows),
            ("pricing.sample_rows", self.pricing.sample_rows),
            ("anomaly.max_columns", self.anomaly.max_columns),
        ];
        for (name, value) in at_least_one {
            if value == 0 {
                return Err(CoreError::ConfigValidation(format!(
                    "{name} must be at least 1"
                )));
            }
        }

        if self.pricing.max_header_rows > MAX_HEADER_ROWS {
            return Err(CoreError::ConfigValidation(format!(
                "pricing.max_header_rows must be at most {MAX_HEADER_ROWS}, got {}",
                self.pricing.max_header_rows
            )));
        }

        if let Some(blank) = self.anomaly.region_tokens.iter().find(|t| t.trim().is_empty()) {
            return Err(CoreError::ConfigValidation(format!(
                "anomaly.region_tokens contains a blank entry: {blank:?}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.pricing.confidence_threshold, 60);
        assert_eq!(config.pricing.max_header_rows, 4);
        assert_eq!(config.anomaly.max_columns, 6);
        assert_eq!(config.similarity.diff_threshold, 85);
        assert_eq!(config.similarity.rule_threshold, 70);
        assert!(config.anomaly.region_tokens.iter().any(|t| t == "NSW"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let input = r#"
[pricing]
confidence_threshold = 75

[similarity]
rule_threshold = 80
"#;
        let config = EngineConfig::from_toml(input).unwrap();
        assert_eq!(config.pricing.confidence_threshold, 75);
        assert_eq!(config.pricing.sample_rows, 5);
        assert_eq!(config.similarity.rule_threshold, 80);
        assert_eq!(config.similarity.diff_threshold, 85);
    }

    #[test]
    fn region_tokens_override() {
        let input = r#"
[anomaly]
region_tokens = ["North", "South"]
"#;
        let config = EngineConfig::from_toml(input).unwrap();
        assert_eq!(config.anomaly.region_tokens, vec!["North", "South"]);
    }

    #[test]
    fn reject_threshold_over_100() {
        let err = EngineConfig::from_toml("[similarity]\ndiff_threshold = 120\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigValidation(_)));
        assert!(err.to_string().contains("similarity.diff_threshold"));
    }

    #[test]
    fn reject_zero_header_rows() {
        let err = EngineConfig::from_toml("[pricing]\nmax_header_rows = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_header_rows"));
    }

    #[test]
    fn reject_header_rows_over_four() {
        let err = EngineConfig::from_toml("[pricing]\nmax_header_rows = 6\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigValidation(_)));
        assert!(err.to_string().contains("at most 4"));
        assert!(EngineConfig::from_toml("[pricing]\nmax_header_rows = 4\n").is_ok());
    }

    #[test]
    fn reject_blank_region_token() {
        let err = EngineConfig::from_toml("[anomaly]\nregion_tokens = [\"NSW\", \" \"]\n")
            .unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn reject_unknown_key() {
        let err = EngineConfig::from_toml("[pricing]\nthreshold = 60\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }

    #[test]
    fn toml_output_parses_back() {
        let mut config = EngineConfig::default();
        config.pricing.sample_rows = 8;
        let text = config.to_toml().unwrap();
        assert!(text.contains("[pricing]"));
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }
}
