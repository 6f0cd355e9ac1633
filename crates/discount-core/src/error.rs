//! # Error Types
//!
//! Domain-specific error types for discount-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  discount-core errors (this file)                                      │
//! │  ├── CoreError        - Umbrella for callers that want one type        │
//! │  ├── ConfigError      - Why a configuration document means "no discount"│
//! │  └── ValidationError  - Admin-side input validation failures           │
//! │                                                                         │
//! │  discount-function errors (separate crate)                             │
//! │  └── RunnerError      - Input/output failures of the runner binary     │
//! │                                                                         │
//! │  ConfigError never reaches the pricing pipeline: the engine turns it   │
//! │  into an empty operation set.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for the crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The configuration document cannot be turned into a rule.
    #[error("Invalid discount configuration: {0}")]
    Config(#[from] ConfigError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Config Error
// =============================================================================

/// Reasons a stored configuration document is rejected.
///
/// ## Fail Open
/// Every variant here degrades to "no discount" inside the engine.
/// They exist so the rejection can be logged and tested, not so it can
/// be propagated to checkout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No document is attached to the discount (or it is JSON `null`).
    #[error("no configuration document")]
    Absent,

    /// The document is not a JSON object.
    #[error("configuration must be an object, got {found}")]
    NotAnObject { found: String },

    /// `percentage` did not coerce to a finite number.
    #[error("percentage is not a finite number: {raw}")]
    NonNumericPercentage { raw: String },

    /// `productIds` is missing or not an array.
    #[error("productIds must be a list")]
    ProductIdsNotList,

    /// The `kind` discriminator names a rule this engine doesn't know.
    #[error("unknown discount rule kind: {0}")]
    UnknownRuleKind(String),

    /// A tiered rule has a missing, empty or malformed tier list.
    #[error("invalid quantity tiers: {reason}")]
    InvalidTiers { reason: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the administrative side before a configuration is persisted.
/// Unlike [`ConfigError`], these are hard failures: the first one aborts
/// the save.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., not a number, not a product GID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::NonNumericPercentage {
            raw: "\"abc\"".to_string(),
        };
        assert_eq!(err.to_string(), "percentage is not a finite number: \"abc\"");
        assert_eq!(
            ConfigError::ProductIdsNotList.to_string(),
            "productIds must be a list"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "message".to_string(),
        };
        assert_eq!(err.to_string(), "message is required");

        let err = ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(err.to_string(), "percentage must be between 0 and 100");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ConfigError::Absent.into();
        assert!(matches!(core_err, CoreError::Config(ConfigError::Absent)));

        let core_err: CoreError = ValidationError::Required {
            field: "product".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
