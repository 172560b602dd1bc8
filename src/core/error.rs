//! Typed error handling for the weave framework
//!
//! This module provides the error type hierarchy for composition,
//! identifier generation, options, and configuration loading. All of these
//! errors are construction/registration-time or first-use errors: none are
//! transient and none should be retried automatically.
//!
//! # Error Categories
//!
//! - [`CompositionError`]: slot resolution and shape-closing failures
//! - [`IdentifierError`]: identifier stream failures
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! use weave::prelude::*;
//!
//! match composer.compose(&service, &implementation, &opts) {
//!     Ok(pair) => register(pair),
//!     Err(CompositionError::UnresolvedSlot { slot, shape }) => {
//!         eprintln!("{} declares {} but the descriptor does not bind it", shape, slot);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::slot::Slot;
use serde::Serialize;
use std::fmt;

/// The main error type for the weave framework
///
/// This enum encompasses all possible errors that can occur within the
/// framework. Each variant contains a more specific error type for that
/// category.
#[derive(Debug)]
pub enum WeaveError {
    /// Composition errors (slot resolution, shape closing, registration)
    Composition(CompositionError),

    /// Identifier generation errors
    Identifier(IdentifierError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal framework errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for WeaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeaveError::Composition(e) => write!(f, "{}", e),
            WeaveError::Identifier(e) => write!(f, "{}", e),
            WeaveError::Config(e) => write!(f, "{}", e),
            WeaveError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WeaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeaveError::Composition(e) => Some(e),
            WeaveError::Identifier(e) => Some(e),
            WeaveError::Config(e) => Some(e),
            WeaveError::Internal(_) => None,
        }
    }
}

/// Error report structure for diagnostics and logs
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl WeaveError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            WeaveError::Composition(e) => e.error_code(),
            WeaveError::Identifier(e) => e.error_code(),
            WeaveError::Config(_) => "CONFIG_ERROR",
            WeaveError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            WeaveError::Composition(CompositionError::UnresolvedSlot { slot, shape }) => {
                Some(serde_json::json!({
                    "slot": slot.as_str(),
                    "shape": shape
                }))
            }
            WeaveError::Composition(CompositionError::ArityMismatch {
                shape,
                expected,
                actual,
            }) => Some(serde_json::json!({
                "shape": shape,
                "expected": expected,
                "actual": actual
            })),
            WeaveError::Identifier(IdentifierError::CounterOverflow { key }) => {
                Some(serde_json::json!({ "key": key }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Composition Errors
// =============================================================================

/// Errors related to slot resolution and shape closing
///
/// All of these are surfaced at registration time, before any composed
/// service can be resolved.
#[derive(Debug)]
pub enum CompositionError {
    /// A declared slot has no mapping in the descriptor
    UnresolvedSlot {
        slot: Slot,
        shape: String,
    },

    /// A populate transform produced the wrong number of type arguments
    ArityMismatch {
        shape: String,
        expected: usize,
        actual: usize,
    },

    /// The shape is explicitly excluded from composition
    UnsupportedConfiguration {
        shape: String,
    },

    /// The descriptor or builder input is structurally invalid
    InvalidConfiguration {
        message: String,
    },

    /// A non-enumerable binding already exists for the service shape
    DuplicateBinding {
        service: String,
    },
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionError::UnresolvedSlot { slot, shape } => {
                write!(
                    f,
                    "Shape '{}' declares slot '{}' but the descriptor does not bind it",
                    shape, slot
                )
            }
            CompositionError::ArityMismatch {
                shape,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Shape '{}' declares {} type parameters but the populate transform produced {}",
                    shape, expected, actual
                )
            }
            CompositionError::UnsupportedConfiguration { shape } => {
                write!(f, "Shape '{}' is not configurable", shape)
            }
            CompositionError::InvalidConfiguration { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            CompositionError::DuplicateBinding { service } => {
                write!(
                    f,
                    "Service '{}' already has a binding and the registry rejects duplicates",
                    service
                )
            }
        }
    }
}

impl std::error::Error for CompositionError {}

impl CompositionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CompositionError::UnresolvedSlot { .. } => "UNRESOLVED_SLOT",
            CompositionError::ArityMismatch { .. } => "ARITY_MISMATCH",
            CompositionError::UnsupportedConfiguration { .. } => "UNSUPPORTED_CONFIGURATION",
            CompositionError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            CompositionError::DuplicateBinding { .. } => "DUPLICATE_BINDING",
        }
    }
}

impl From<CompositionError> for WeaveError {
    fn from(err: CompositionError) -> Self {
        WeaveError::Composition(err)
    }
}

// =============================================================================
// Identifier Errors
// =============================================================================

/// Errors related to identifier generation
#[derive(Debug)]
pub enum IdentifierError {
    /// The integer counter for a key would exceed its representable range.
    ///
    /// Fatal for that key; the stream never wraps silently.
    CounterOverflow {
        key: String,
    },

    /// A required collaborator (the clock or the random source) is
    /// unavailable at construction
    MissingCollaborator {
        collaborator: String,
    },

    /// Advisory cancellation was observed before the atomic step; no value
    /// was consumed from the stream
    Cancelled {
        key: String,
    },

    /// An identifier operation failed
    OperationFailed {
        key: String,
        message: String,
    },
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierError::CounterOverflow { key } => {
                write!(f, "Identifier counter for key '{}' overflowed", key)
            }
            IdentifierError::MissingCollaborator { collaborator } => {
                write!(f, "Required collaborator '{}' is unavailable", collaborator)
            }
            IdentifierError::Cancelled { key } => {
                write!(f, "Identifier generation for key '{}' was cancelled", key)
            }
            IdentifierError::OperationFailed { key, message } => {
                write!(f, "Identifier generation for key '{}' failed: {}", key, message)
            }
        }
    }
}

impl std::error::Error for IdentifierError {}

impl IdentifierError {
    pub fn error_code(&self) -> &'static str {
        match self {
            IdentifierError::CounterOverflow { .. } => "COUNTER_OVERFLOW",
            IdentifierError::MissingCollaborator { .. } => "MISSING_COLLABORATOR",
            IdentifierError::Cancelled { .. } => "CANCELLED",
            IdentifierError::OperationFailed { .. } => "IDENTIFIER_OPERATION_FAILED",
        }
    }
}

impl From<IdentifierError> for WeaveError {
    fn from(err: IdentifierError) -> Self {
        WeaveError::Identifier(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound {
        path: String,
    },

    /// IO error while reading configuration
    IoError {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for WeaveError {
    fn from(err: ConfigError) -> Self {
        WeaveError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for WeaveError {
    fn from(err: serde_yaml::Error) -> Self {
        WeaveError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for WeaveError {
    fn from(err: std::io::Error) -> Self {
        WeaveError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error for integration seams
impl From<anyhow::Error> for WeaveError {
    fn from(err: anyhow::Error) -> Self {
        WeaveError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for weave operations
pub type WeaveResult<T> = Result<T, WeaveError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_slot_display() {
        let err = CompositionError::UnresolvedSlot {
            slot: Slot::Tenant,
            shape: "audit_store".to_string(),
        };
        assert!(err.to_string().contains("Tenant"));
        assert!(err.to_string().contains("audit_store"));
    }

    #[test]
    fn test_arity_mismatch_display() {
        let err = CompositionError::ArityMismatch {
            shape: "read_service".to_string(),
            expected: 2,
            actual: 3,
        };
        let display = err.to_string();
        assert!(display.contains("2"));
        assert!(display.contains("3"));
    }

    #[test]
    fn test_composition_error_codes() {
        assert_eq!(
            CompositionError::UnsupportedConfiguration {
                shape: "opts".to_string()
            }
            .error_code(),
            "UNSUPPORTED_CONFIGURATION"
        );
        assert_eq!(
            CompositionError::DuplicateBinding {
                service: "svc".to_string()
            }
            .error_code(),
            "DUPLICATE_BINDING"
        );
    }

    #[test]
    fn test_identifier_error_codes() {
        assert_eq!(
            IdentifierError::CounterOverflow {
                key: "ArticleId".to_string()
            }
            .error_code(),
            "COUNTER_OVERFLOW"
        );
        assert_eq!(
            IdentifierError::Cancelled {
                key: "ArticleId".to_string()
            }
            .error_code(),
            "CANCELLED"
        );
    }

    #[test]
    fn test_weave_error_conversion() {
        let comp_err = CompositionError::UnresolvedSlot {
            slot: Slot::GenId,
            shape: "store".to_string(),
        };
        let weave_err: WeaveError = comp_err.into();
        assert_eq!(weave_err.error_code(), "UNRESOLVED_SLOT");
    }

    #[test]
    fn test_error_report_serialization() {
        let err = WeaveError::Composition(CompositionError::UnresolvedSlot {
            slot: Slot::Migration,
            shape: "migration_store".to_string(),
        });
        let report = err.to_report();
        assert_eq!(report.code, "UNRESOLVED_SLOT");
        assert!(report.details.is_some());
    }

    #[test]
    fn test_missing_collaborator_display() {
        let err = IdentifierError::MissingCollaborator {
            collaborator: "Clock".to_string(),
        };
        assert!(err.to_string().contains("Clock"));
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(": invalid: [").unwrap_err();
        let weave_err: WeaveError = yaml_err.into();
        assert!(matches!(
            weave_err,
            WeaveError::Config(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FileNotFound {
            path: "/etc/weave.yaml".to_string(),
        };
        assert!(err.to_string().contains("/etc/weave.yaml"));
    }
}
