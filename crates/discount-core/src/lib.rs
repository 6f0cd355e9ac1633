//! # discount-core: Pure Product Discount Logic
//!
//! This crate decides which cart lines qualify for a merchant-configured
//! product discount and emits the operations the cart pricing pipeline
//! applies. It runs on the hot path of checkout, so it has zero I/O and
//! never fails: a missing or broken configuration means "no discount".
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Product Discount Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Admin surface (out of scope, external)               │   │
//! │  │   form ──► FunctionConfiguration ──► metafield custom/           │   │
//! │  │                                      function-configuration      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ persisted JSON                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               Cart pricing pipeline (external)                   │   │
//! │  │        cart snapshot + discount classes + metafield jsonValue    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ FunctionRunInput                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ discount-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  config   │  │  engine   │  │ validation│  │   │
//! │  │   │ Cart/Line │  │  parse →  │  │ evaluate  │  │ admin-side│  │   │
//! │  │   │ Operation │  │   Rule    │  │  gates    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO SHARED STATE • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Function input projection and output operations
//! - [`config`] - Loosely typed document → [`DiscountRule`]
//! - [`engine`] - The evaluation routine
//! - [`validation`] - Admin-side validation and the persisted document
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use discount_core::engine::evaluate_with;
//! use discount_core::types::{Cart, CartLine, DiscountClass, Merchandise, ProductRef};
//! use serde_json::json;
//!
//! let cart = Cart {
//!     lines: vec![CartLine {
//!         id: "L1".to_string(),
//!         quantity: 3,
//!         merchandise: Merchandise::ProductVariant {
//!             id: None,
//!             product: ProductRef { id: "P1".to_string() },
//!         },
//!     }],
//! };
//! let config = json!({ "percentage": 15, "productIds": ["P1"], "message": "15% off" });
//!
//! let result = evaluate_with(&cart, &[DiscountClass::Product], Some(&config));
//! assert_eq!(result.operations.len(), 1);
//!
//! // Anything malformed is "no discount", never an error.
//! let broken = json!({ "percentage": "abc", "productIds": ["P1"] });
//! assert!(evaluate_with(&cart, &[DiscountClass::Product], Some(&broken)).is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::DiscountRule;
pub use engine::{evaluate, evaluate_with};
pub use error::{ConfigError, CoreError, ValidationError};
pub use types::*;
pub use validation::{FunctionConfiguration, MetafieldInput};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Metafield namespace holding the configuration document.
pub const METAFIELD_NAMESPACE: &str = "custom";

/// Metafield key holding the configuration document.
pub const METAFIELD_KEY: &str = "function-configuration";

/// Metafield type of the configuration document.
pub const METAFIELD_TYPE: &str = "json";

/// Maximum length of the shopper-facing message accepted by the admin side.
pub const MAX_MESSAGE_LENGTH: usize = 255;

/// Largest quantity hint the admin side accepts.
pub const MAX_QUANTITY_HINT: i64 = 999;
