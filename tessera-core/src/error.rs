//! Error types for Tessera operations
//!
//! Only conditions that stop a build are errors. Unresolvable references, cycles and
//! malformed composites are reported as [`crate::Diagnostic`]s instead.

use thiserror::Error;

/// Token document errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Token document is missing or empty")]
    Missing,

    #[error("Token document is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("Token document root must be an object, found {found}")]
    NotAnObject { found: String },

    #[error("Motion source is invalid: {reason}")]
    InvalidMotionSource { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configured group not present in document: {group}")]
    UnknownGroup { group: String },
}

/// Master error type for all Tessera errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TesseraError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Tessera operations.
pub type TesseraResult<T> = Result<T, TesseraError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_display_not_an_object() {
        let err = DocumentError::NotAnObject {
            found: "array".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("must be an object"));
        assert!(msg.contains("array"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "header.banner".to_string(),
            value: "".to_string(),
            reason: "banner must not be empty".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("header.banner"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_tessera_error_from_variants() {
        let doc = TesseraError::from(DocumentError::Missing);
        assert!(matches!(doc, TesseraError::Document(_)));

        let config = TesseraError::from(ConfigError::UnknownGroup {
            group: "Shadows".to_string(),
        });
        assert!(matches!(config, TesseraError::Config(_)));
        assert!(config.to_string().contains("Shadows"));
    }
}
