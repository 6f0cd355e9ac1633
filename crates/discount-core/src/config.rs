//! # Discount Configuration
//!
//! Turns the loosely typed configuration document into a [`DiscountRule`].
//!
//! The document lives in a JSON metafield with no schema enforced at the
//! storage layer, so anything can show up here. Parsing is the single
//! place that decides "well-formed rule" versus "no discount"; the matching
//! code in [`crate::engine`] only ever sees a valid rule.
//!
//! ## Document Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kind absent | "flatPercentage"                                         │
//! │  { "quantity": "2", "percentage": 15, "message": "15% off",             │
//! │    "productIds": ["gid://shopify/Product/1"] }                          │
//! │                                                                         │
//! │  kind "quantityTiers"                                                   │
//! │  { "kind": "quantityTiers",                                             │
//! │    "productIds": [...],               (optional)                        │
//! │    "tiers": [ { "minQty": 2, "percentage": 10, "message": "..." } ] }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::types::{CartLine, Percentage, MAX_EXACT_INTEGER};

/// Discriminator value for the flat percentage rule.
pub const KIND_FLAT_PERCENTAGE: &str = "flatPercentage";

/// Discriminator value for the quantity tier rule.
pub const KIND_QUANTITY_TIERS: &str = "quantityTiers";

// =============================================================================
// Rule Types
// =============================================================================

/// A validated discount rule.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountRule {
    /// One percentage for every line whose product is in the set.
    FlatPercentage(FlatPercentageRule),
    /// Per-line percentage picked from quantity thresholds.
    QuantityTiers(QuantityTierRule),
}

/// Flat percentage off, gated by product membership.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPercentageRule {
    pub percentage: Percentage,
    pub message: Option<String>,
    pub product_ids: HashSet<String>,
    /// Quantity hint from the admin form. Carried, never used for matching.
    pub quantity: Option<i64>,
}

/// Quantity threshold rule. Highest satisfied threshold wins.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityTierRule {
    /// Sorted by `min_qty` descending.
    pub tiers: Vec<QuantityTier>,
    /// `None` means every product variant is eligible.
    pub product_ids: Option<HashSet<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantityTier {
    pub min_qty: i64,
    pub percentage: Percentage,
    pub message: Option<String>,
}

impl FlatPercentageRule {
    /// Checks whether `line` sells a variant of a configured product.
    pub fn matches(&self, line: &CartLine) -> bool {
        line.merchandise
            .product_id()
            .is_some_and(|id| self.product_ids.contains(id))
    }
}

impl QuantityTierRule {
    /// Returns the tier `line` qualifies for, if any.
    pub fn tier_for(&self, line: &CartLine) -> Option<&QuantityTier> {
        let product_id = line.merchandise.product_id()?;
        if let Some(ids) = &self.product_ids {
            if !ids.contains(product_id) {
                return None;
            }
        }
        self.tiers.iter().find(|t| line.quantity >= t.min_qty)
    }
}

// =============================================================================
// Parsing
// =============================================================================

impl DiscountRule {
    /// Parses a configuration document.
    ///
    /// ## Rules
    /// - `None` or JSON `null` → [`ConfigError::Absent`]
    /// - non-object → [`ConfigError::NotAnObject`]
    /// - `kind` selects the rule; absent means flat percentage
    pub fn parse(config: Option<&Value>) -> Result<Self, ConfigError> {
        let doc = match config {
            None | Some(Value::Null) => return Err(ConfigError::Absent),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ConfigError::NotAnObject {
                    found: json_type_name(other).to_string(),
                })
            }
        };

        match doc.get("kind") {
            None => parse_flat(doc).map(DiscountRule::FlatPercentage),
            Some(Value::String(kind)) if kind == KIND_FLAT_PERCENTAGE => {
                parse_flat(doc).map(DiscountRule::FlatPercentage)
            }
            Some(Value::String(kind)) if kind == KIND_QUANTITY_TIERS => {
                parse_tiers(doc).map(DiscountRule::QuantityTiers)
            }
            Some(Value::String(kind)) => Err(ConfigError::UnknownRuleKind(kind.clone())),
            Some(other) => Err(ConfigError::UnknownRuleKind(other.to_string())),
        }
    }
}

fn parse_flat(doc: &Map<String, Value>) -> Result<FlatPercentageRule, ConfigError> {
    let message = coerce_message(doc.get("message"));
    let percentage = coerce_percentage(doc.get("percentage"))?;
    let product_ids = match doc.get("productIds") {
        Some(Value::Array(items)) => collect_ids(items),
        _ => return Err(ConfigError::ProductIdsNotList),
    };

    Ok(FlatPercentageRule {
        percentage,
        message,
        product_ids,
        quantity: coerce_quantity(doc.get("quantity")),
    })
}

fn parse_tiers(doc: &Map<String, Value>) -> Result<QuantityTierRule, ConfigError> {
    let raw_tiers = match doc.get("tiers") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_)) => {
            return Err(ConfigError::InvalidTiers {
                reason: "tier list is empty".to_string(),
            })
        }
        _ => {
            return Err(ConfigError::InvalidTiers {
                reason: "tiers must be a list".to_string(),
            })
        }
    };

    let product_ids = match doc.get("productIds") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(collect_ids(items)),
        Some(_) => return Err(ConfigError::ProductIdsNotList),
    };

    let mut tiers = raw_tiers
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_tier(i, raw))
        .collect::<Result<Vec<_>, _>>()?;

    // Stable: equal thresholds keep document order.
    tiers.sort_by(|a, b| b.min_qty.cmp(&a.min_qty));

    Ok(QuantityTierRule { tiers, product_ids })
}

fn parse_tier(index: usize, raw: &Value) -> Result<QuantityTier, ConfigError> {
    let Value::Object(tier) = raw else {
        return Err(ConfigError::InvalidTiers {
            reason: format!("tier {index} is not an object"),
        });
    };

    let min_qty = tier
        .get("minQty")
        .and_then(whole_number)
        .ok_or_else(|| ConfigError::InvalidTiers {
            reason: format!("tier {index} has no integer minQty"),
        })?;

    Ok(QuantityTier {
        min_qty,
        percentage: coerce_percentage(tier.get("percentage"))?,
        message: coerce_message(tier.get("message")),
    })
}

// =============================================================================
// Coercions
// =============================================================================

/// Strings are used verbatim; any other JSON value becomes its compact JSON
/// text, with whole-valued floats written as integers (`1.0` → `1`) the way
/// the admin UI's `JSON.stringify` writes them. A missing key stays missing.
pub fn coerce_message(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        other => Some(integral_floats_as_ints(other).to_string()),
    }
}

/// Numbers pass through; strings are trimmed and parsed as decimals or as
/// `0x`/`0o`/`0b` integer literals. Everything else, and anything
/// non-finite, is rejected. No range clamping.
pub fn coerce_percentage(value: Option<&Value>) -> Result<Percentage, ConfigError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric_text(s.trim()),
        _ => None,
    };

    parsed
        .and_then(Percentage::new)
        .ok_or_else(|| ConfigError::NonNumericPercentage {
            raw: value.map_or_else(|| "missing".to_string(), Value::to_string),
        })
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let radix = match text.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return text.parse::<f64>().ok(),
    };

    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

fn integral_floats_as_ints(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.as_i64().is_none() && n.as_u64().is_none() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER)
            .map_or_else(|| value.clone(), |f| Value::from(f as i64)),
        Value::Array(items) => Value::Array(items.iter().map(integral_floats_as_ints).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), integral_floats_as_ints(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn coerce_quantity(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::String(s) => s.trim().parse().ok(),
        other => whole_number(other),
    }
}

fn whole_number(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Non-string entries can never equal a product id, so they are dropped.
fn collect_ids(items: &[Value]) -> HashSet<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
