//! # Validation Module
//!
//! Validation for the administrative side: the form a merchant fills in to
//! create a discount, and the document persisted from it.
//!
//! ## Two Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Happens                           │
//! │                                                                         │
//! │  Admin form submit                                                      │
//! │  ├── THIS MODULE: strict, first error aborts the save                   │
//! │  └── FunctionConfiguration persisted to metafield                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Cart pricing (engine)                                                  │
//! │  └── config::DiscountRule::parse: permissive, bad input = no discount   │
//! │                                                                         │
//! │  The engine must NOT call these validators: a document that slipped     │
//! │  past them (or was written by hand) still never blocks checkout.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use discount_core::validation::{ConfigurationForm, FunctionConfiguration};
//!
//! let form = ConfigurationForm {
//!     quantity: Some(" 2 ".to_string()),
//!     percentage: "15".to_string(),
//!     message: Some("15% off".to_string()),
//!     product: Some(r#"[{"id":"gid://shopify/Product/1","title":"Tee"}]"#.to_string()),
//! };
//!
//! let config = FunctionConfiguration::from_form(form).unwrap();
//! assert_eq!(config.product_ids, vec!["gid://shopify/Product/1"]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::{
    MAX_MESSAGE_LENGTH, MAX_QUANTITY_HINT, METAFIELD_KEY, METAFIELD_NAMESPACE, METAFIELD_TYPE,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Prefix of a product global id.
const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be finite
/// - Must be between 0 and 100 inclusive
///
/// ## Example
/// ```rust
/// use discount_core::validation::validate_percentage;
///
/// assert!(validate_percentage(15.0).is_ok());
/// assert!(validate_percentage(100.0).is_ok());
/// assert!(validate_percentage(120.0).is_err());
/// ```
pub fn validate_percentage(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "percentage".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates the shopper-facing message.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most MAX_MESSAGE_LENGTH characters
pub fn validate_message(message: &str) -> ValidationResult<()> {
    let message = message.trim();

    if message.is_empty() {
        return Err(ValidationError::Required {
            field: "message".to_string(),
        });
    }

    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_MESSAGE_LENGTH,
        });
    }

    Ok(())
}

/// Validates the optional quantity hint.
///
/// ## Rules
/// - Absent or blank is allowed
/// - Otherwise a whole number between 1 and MAX_QUANTITY_HINT
pub fn validate_quantity_hint(quantity: Option<&str>) -> ValidationResult<()> {
    let Some(raw) = quantity.map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(());
    };

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY_HINT {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1.0,
            max: MAX_QUANTITY_HINT as f64,
        });
    }

    Ok(())
}

/// Validates a product global id.
///
/// ## Example
/// ```rust
/// use discount_core::validation::validate_product_id;
///
/// assert!(validate_product_id("gid://shopify/Product/8123").is_ok());
/// assert!(validate_product_id("gid://shopify/ProductVariant/1").is_err());
/// assert!(validate_product_id("").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    let numeric = id.strip_prefix(PRODUCT_GID_PREFIX).unwrap_or_default();
    if numeric.is_empty() || !numeric.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: format!("expected {PRODUCT_GID_PREFIX}<number>"),
        });
    }

    Ok(())
}

// =============================================================================
// Admin Form
// =============================================================================

/// Raw form fields as submitted by the admin page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationForm {
    pub quantity: Option<String>,
    pub percentage: String,
    pub message: Option<String>,
    /// JSON array of resources picked in the product picker.
    pub product: Option<String>,
}

/// Minimal projection of a picked product.
#[derive(Debug, Deserialize)]
struct PickedProduct {
    id: String,
}

/// The configuration document persisted on the discount's metafield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FunctionConfiguration {
    /// Quantity hint, kept as the merchant typed it.
    pub quantity: Option<String>,
    pub percentage: f64,
    pub message: String,
    pub product_ids: Vec<String>,
}

impl FunctionConfiguration {
    /// Builds a document from form input.
    ///
    /// Fields are checked in form order and the first failure is returned.
    pub fn from_form(form: ConfigurationForm) -> ValidationResult<Self> {
        let quantity = form
            .quantity
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        validate_quantity_hint(quantity.as_deref())?;

        let percentage: f64 = form.percentage.trim().parse().map_err(|_| {
            ValidationError::InvalidFormat {
                field: "percentage".to_string(),
                reason: "must be a number".to_string(),
            }
        })?;
        validate_percentage(percentage)?;

        let message = form.message.unwrap_or_default().trim().to_string();
        validate_message(&message)?;

        let product_ids = parse_picked_products(form.product.as_deref())?;

        Ok(FunctionConfiguration {
            quantity,
            percentage,
            message,
            product_ids,
        })
    }

    /// The JSON value written to the metafield.
    pub fn to_json(&self) -> Value {
        json!({
            "quantity": self.quantity,
            "percentage": self.percentage,
            "message": self.message,
            "productIds": self.product_ids,
        })
    }

    /// The metafield entry attached to the discount record on save.
    pub fn to_metafield(&self) -> MetafieldInput {
        MetafieldInput {
            namespace: METAFIELD_NAMESPACE.to_string(),
            key: METAFIELD_KEY.to_string(),
            value_type: METAFIELD_TYPE.to_string(),
            value: self.to_json().to_string(),
        }
    }
}

/// A metafield entry as sent with the discount create/update mutation.
///
/// `value` holds the JSON document as text; the function later receives it
/// decoded as `jsonValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetafieldInput {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

fn parse_picked_products(raw: Option<&str>) -> ValidationResult<Vec<String>> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    let picked: Vec<PickedProduct> =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: e.to_string(),
        })?;

    if picked.is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    for product in &picked {
        validate_product_id(&product.id)?;
    }

    Ok(picked.into_iter().map(|p| p.id).collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
