// ==============================================================================
// config.rs - Filter Configuration
// ==============================================================================
// Description: Annotation-source allowlist and population frequency threshold
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Phenotype sources reported by default
pub const DEFAULT_ANNOTATION_SOURCES: &[&str] = &["MIM_morbid"];

/// Maximum gnomAD exome frequency for a variant to count as rare (5 in 10,000)
pub const DEFAULT_MAX_FREQUENCY: f64 = 5.0 / 10_000.0;

/// Errors raised while building a filter configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid frequency threshold: {0} (must be a finite, non-negative number)")]
    InvalidFrequency(f64),

    #[error("Unknown frequency policy '{0}' (expected last-wins or any-common-rejects)")]
    UnknownPolicy(String),

    #[error("Unknown output format '{0}' (expected tsv or json)")]
    UnknownFormat(String),
}

/// How the colocated-variant scan treats a record that has both rare and
/// common colocated variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyPolicy {
    /// Each colocated variant overrides the verdict of the previous one;
    /// the last variant with frequencies decides
    #[default]
    LastWins,
    /// Any colocated variant above the threshold drops the record
    AnyCommonRejects,
}

impl FrequencyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyPolicy::LastWins => "last-wins",
            FrequencyPolicy::AnyCommonRejects => "any-common-rejects",
        }
    }
}

impl FromStr for FrequencyPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-wins" | "lastwins" => Ok(FrequencyPolicy::LastWins),
            "any-common-rejects" | "strict" => Ok(FrequencyPolicy::AnyCommonRejects),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Parameters of the variant filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Phenotype sources kept in the PHENOTYPES column
    pub annotation_sources: Vec<String>,

    /// Colocated variants with every gnomAD exome frequency at or below this
    /// value are considered rare
    pub max_frequency: f64,

    pub frequency_policy: FrequencyPolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            annotation_sources: DEFAULT_ANNOTATION_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_frequency: DEFAULT_MAX_FREQUENCY,
            frequency_policy: FrequencyPolicy::default(),
        }
    }
}

impl FilterConfig {
    pub fn new(
        annotation_sources: Vec<String>,
        max_frequency: f64,
        frequency_policy: FrequencyPolicy,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            annotation_sources,
            max_frequency,
            frequency_policy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_frequency.is_finite() || self.max_frequency < 0.0 {
            return Err(ConfigError::InvalidFrequency(self.max_frequency));
        }
        Ok(())
    }

    pub fn is_allowed_source(&self, source: &str) -> bool {
        self.annotation_sources.iter().any(|s| s == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.annotation_sources, vec!["MIM_morbid".to_string()]);
        assert!((config.max_frequency - 0.0005).abs() < 1e-12);
        assert_eq!(config.frequency_policy, FrequencyPolicy::LastWins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let negative = FilterConfig::new(vec![], -0.1, FrequencyPolicy::LastWins);
        assert_eq!(negative.unwrap_err(), ConfigError::InvalidFrequency(-0.1));

        let nan = FilterConfig::new(vec![], f64::NAN, FrequencyPolicy::LastWins);
        assert!(nan.is_err());
    }

    #[test]
    fn test_allowed_source() {
        let config = FilterConfig::new(
            vec!["MIM_morbid".to_string(), "Orphanet".to_string()],
            0.001,
            FrequencyPolicy::LastWins,
        )
        .unwrap();

        assert!(config.is_allowed_source("Orphanet"));
        assert!(config.is_allowed_source("MIM_morbid"));
        assert!(!config.is_allowed_source("Cancer_Gene_Census"));
        assert!(!config.is_allowed_source("mim_morbid"));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("last-wins".parse::<FrequencyPolicy>().unwrap(), FrequencyPolicy::LastWins);
        assert_eq!(
            "Any-Common-Rejects".parse::<FrequencyPolicy>().unwrap(),
            FrequencyPolicy::AnyCommonRejects
        );
        assert!(matches!(
            "sometimes".parse::<FrequencyPolicy>(),
            Err(ConfigError::UnknownPolicy(_))
        ));
        assert_eq!(FrequencyPolicy::AnyCommonRejects.as_str(), "any-common-rejects");
    }
}
