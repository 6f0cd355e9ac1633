//! # Domain Types
//!
//! The input projection the pricing pipeline hands to the function, and the
//! operation set handed back.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (read-only snapshot)                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │ FunctionRunInput│──►│      Cart       │──►│    CartLine     │        │
//! │  │  cart           │   │  lines (ordered)│   │  id / quantity  │        │
//! │  │  discount ──┐   │   └─────────────────┘   │  merchandise    │        │
//! │  └─────────────┼───┘                         └─────────────────┘        │
//! │                ▼                                                        │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Discount     │──►│   Metafield     │  jsonValue = raw config      │
//! │  │ discountClasses │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  OUTPUT (fresh per call, never mutated)                                 │
//! │  FunctionRunResult ──► Operation::ProductDiscountsAdd                   │
//! │                          └─► candidates ──► value + targets             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the pipeline's camelCase JSON so these types
//! deserialize the function input directly.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// Discount Class
// =============================================================================

/// A discount class requested for an evaluation.
///
/// Classes are independent flags; a context may request several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountClass {
    /// Discounts applied to individual cart lines.
    Product,
    /// Discounts applied to the order subtotal.
    Order,
    /// Discounts applied to delivery.
    Shipping,
    /// Any class this engine doesn't know about.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Cart
// =============================================================================

/// Read-only cart snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in the order the pipeline supplied them.
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Checks if the cart has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Opaque line identifier, used to target operations.
    pub id: String,

    /// Quantity on the line.
    pub quantity: i64,

    /// What the line is selling.
    pub merchandise: Merchandise,
}

/// Merchandise reference on a cart line, discriminated by `__typename`.
///
/// Decoding never fails: a missing or unknown `__typename`, or a variant
/// without a usable `product.id`, becomes [`Merchandise::Other`] so one odd
/// line can't void the rest of the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__typename")]
pub enum Merchandise {
    /// A variant of a catalog product.
    ProductVariant {
        /// Variant identifier.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// The parent product.
        product: ProductRef,
    },
    /// Any other merchandise kind (custom lines, bundles, ...).
    Other,
}

impl<'de> Deserialize<'de> for Merchandise {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;

        if raw.get("__typename").and_then(Value::as_str) != Some("ProductVariant") {
            return Ok(Merchandise::Other);
        }

        let product_id = raw
            .get("product")
            .and_then(|p| p.get("id"))
            .and_then(Value::as_str);

        Ok(match product_id {
            Some(id) => Merchandise::ProductVariant {
                id: raw.get("id").and_then(Value::as_str).map(str::to_string),
                product: ProductRef { id: id.to_string() },
            },
            None => Merchandise::Other,
        })
    }
}

impl Merchandise {
    /// Returns the parent product id when this is a product variant.
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Merchandise::ProductVariant { product, .. } => Some(product.id.as_str()),
            Merchandise::Other => None,
        }
    }
}

/// Reference to a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product identifier (e.g. `gid://shopify/Product/1`).
    pub id: String,
}

// =============================================================================
// Discount Context
// =============================================================================

/// The discount being evaluated: requested classes plus its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Classes requested for this evaluation.
    #[serde(default)]
    pub discount_classes: Vec<DiscountClass>,

    /// Configuration metafield, when one is attached.
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

impl Discount {
    /// Checks whether `class` was requested.
    pub fn has_class(&self, class: DiscountClass) -> bool {
        self.discount_classes.contains(&class)
    }

    /// The raw configuration document, if any.
    pub fn config(&self) -> Option<&Value> {
        self.metafield.as_ref().and_then(|m| m.json_value.as_ref())
    }
}

/// A metafield as delivered to the function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metafield {
    /// Already-decoded JSON value. `null` decodes to `None`.
    #[serde(default)]
    pub json_value: Option<Value>,
}

/// Complete function input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionRunInput {
    /// The cart being priced.
    #[serde(default)]
    pub cart: Cart,

    /// The discount being evaluated.
    #[serde(default)]
    pub discount: Discount,
}

// =============================================================================
// Percentage
// =============================================================================

/// A percentage value as emitted in operations.
///
/// No clamping: whatever finite value the configuration holds is carried
/// through. Whole numbers serialize as JSON integers (`15`, not `15.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

/// Largest integer an f64 represents exactly.
pub(crate) const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Percentage {
    /// Wraps a finite value. Returns `None` for NaN or infinities.
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Percentage(value))
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

// =============================================================================
// Output Operations
// =============================================================================

/// How the pipeline chooses among an operation's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStrategy {
    /// Apply every candidate.
    All,
    /// Apply the first candidate.
    First,
}

/// Result of one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionRunResult {
    /// Operations in cart line order.
    pub operations: Vec<Operation>,
}

impl FunctionRunResult {
    /// The "no discount" result.
    pub fn empty() -> Self {
        FunctionRunResult::default()
    }

    /// Checks if no operations were produced.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A discount operation for the pricing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Add product-level discount candidates.
    ProductDiscountsAdd(ProductDiscountsAddOperation),
}

impl Operation {
    /// Builds a single-candidate percentage discount targeting one line.
    pub fn product_percentage(
        line_id: &str,
        percentage: Percentage,
        message: Option<String>,
        selection_strategy: SelectionStrategy,
    ) -> Self {
        Operation::ProductDiscountsAdd(ProductDiscountsAddOperation {
            selection_strategy,
            candidates: vec![ProductDiscountCandidate {
                message,
                value: CandidateValue::Percentage(PercentageValue { value: percentage }),
                targets: vec![CandidateTarget::CartLine(CartLineTarget {
                    id: line_id.to_string(),
                })],
            }],
        })
    }
}

/// Payload of [`Operation::ProductDiscountsAdd`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscountsAddOperation {
    pub selection_strategy: SelectionStrategy,
    pub candidates: Vec<ProductDiscountCandidate>,
}

/// One discount candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDiscountCandidate {
    /// Text shown to the shopper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub value: CandidateValue,
    pub targets: Vec<CandidateTarget>,
}

/// Discount value of a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateValue {
    /// Percentage off the targeted lines.
    Percentage(PercentageValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageValue {
    pub value: Percentage,
}

/// What a candidate applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateTarget {
    /// A single cart line.
    CartLine(CartLineTarget),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineTarget {
    pub id: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
