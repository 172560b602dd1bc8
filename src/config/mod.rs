//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// How the GUID domain produces values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidMode {
    /// Version-4 UUIDs from the cryptographic random source
    #[default]
    Random,
    /// Version-7 UUIDs ordered by the injected clock
    TimeOrdered,
}

/// What happens when a non-enumerable binding is registered twice for the
/// same service shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The new binding replaces the old one
    #[default]
    Replace,
    /// Re-registration fails with `DuplicateBinding`
    Reject,
}

/// Options for the identifier generators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// GUID domain mode
    #[serde(default)]
    pub guid_mode: GuidMode,

    /// Fixed seed for the integer and string counter streams.
    ///
    /// When absent, each key seeds from the clock's millisecond tick count
    /// at first use, keeping values roughly increasing across restarts.
    #[serde(default)]
    pub integer_seed: Option<i64>,

    /// Minimum width, in hex digits, of the string-domain counter suffix.
    ///
    /// A floor, not a truncation: wider counter values render at their full
    /// width so uniqueness is never sacrificed to formatting.
    #[serde(default = "default_suffix_width")]
    pub string_suffix_width: usize,
}

fn default_suffix_width() -> usize {
    16
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            guid_mode: GuidMode::default(),
            integer_seed: None,
            string_suffix_width: default_suffix_width(),
        }
    }
}

/// Options for the composition registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Duplicate-binding behavior for non-enumerable registration
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Complete configuration for the weave framework
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaveConfig {
    /// Identifier generation options
    #[serde(default)]
    pub identifier: IdentifierConfig,

    /// Composition registry options
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl WeaveConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_config() -> Self {
        Self {
            identifier: IdentifierConfig {
                guid_mode: GuidMode::Random,
                integer_seed: Some(1000),
                string_suffix_width: 16,
            },
            registry: RegistryConfig {
                duplicate_policy: DuplicatePolicy::Replace,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = WeaveConfig::default();
        assert_eq!(config.identifier.guid_mode, GuidMode::Random);
        assert_eq!(config.identifier.integer_seed, None);
        assert_eq!(config.identifier.string_suffix_width, 16);
        assert_eq!(config.registry.duplicate_policy, DuplicatePolicy::Replace);
    }

    #[test]
    fn test_from_yaml_str_partial() {
        let config = WeaveConfig::from_yaml_str(
            r#"
identifier:
  guid_mode: time_ordered
  integer_seed: 1000
"#,
        )
        .unwrap();
        assert_eq!(config.identifier.guid_mode, GuidMode::TimeOrdered);
        assert_eq!(config.identifier.integer_seed, Some(1000));
        // Unspecified sections fall back to defaults
        assert_eq!(config.identifier.string_suffix_width, 16);
        assert_eq!(config.registry.duplicate_policy, DuplicatePolicy::Replace);
    }

    #[test]
    fn test_from_yaml_str_empty_document() {
        let config = WeaveConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.identifier.integer_seed, None);
    }

    #[test]
    fn test_from_yaml_str_rejects_malformed() {
        assert!(WeaveConfig::from_yaml_str("identifier: [not, a, map]").is_err());
    }

    #[test]
    fn test_duplicate_policy_round_trip() {
        let config = WeaveConfig::from_yaml_str(
            r#"
registry:
  duplicate_policy: reject
"#,
        )
        .unwrap();
        assert_eq!(config.registry.duplicate_policy, DuplicatePolicy::Reject);

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("reject"));
    }
}
