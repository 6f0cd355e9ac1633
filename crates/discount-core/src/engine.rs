//! # Discount Evaluation Engine
//!
//! `(cart, discount context, config) -> operations`. Pure, deterministic,
//! no I/O.
//!
//! ## Gates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config absent? ─────────────────────────────► empty                    │
//! │  config malformed? (percentage, productIds) ─► empty                    │
//! │  cart has no lines? ─────────────────────────► empty                    │
//! │  PRODUCT class not requested? ───────────────► empty                    │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  for line in cart.lines (input order):                                  │
//! │      rule matches line? ──► one Operation targeting line.id             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fail Open
//! A broken discount configuration must never break cart pricing. Every
//! gate above returns an empty operation set instead of an error. Turning
//! any of these into an error is a breaking behaviour change for checkout.

use serde_json::Value;
use tracing::debug;

use crate::config::DiscountRule;
use crate::types::{
    Cart, CartLine, DiscountClass, FunctionRunInput, FunctionRunResult, Operation,
    SelectionStrategy,
};

/// Evaluates a complete function input.
///
/// ## Example
/// ```rust
/// use discount_core::engine::evaluate;
/// use discount_core::types::FunctionRunInput;
/// use serde_json::json;
///
/// let input: FunctionRunInput = serde_json::from_value(json!({
///     "cart": { "lines": [{
///         "id": "L1",
///         "quantity": 3,
///         "merchandise": { "__typename": "ProductVariant", "product": { "id": "P1" } }
///     }] },
///     "discount": {
///         "discountClasses": ["PRODUCT"],
///         "metafield": { "jsonValue": {
///             "percentage": 15, "productIds": ["P1"], "message": "15% off"
///         } }
///     }
/// })).unwrap();
///
/// let result = evaluate(&input);
/// assert_eq!(result.operations.len(), 1);
/// ```
pub fn evaluate(input: &FunctionRunInput) -> FunctionRunResult {
    evaluate_with(
        &input.cart,
        &input.discount.discount_classes,
        input.discount.config(),
    )
}

/// Evaluates a cart against a raw configuration document.
///
/// Never fails: every unqualifying state yields [`FunctionRunResult::empty`].
pub fn evaluate_with(
    cart: &Cart,
    classes: &[DiscountClass],
    config: Option<&Value>,
) -> FunctionRunResult {
    let rule = match DiscountRule::parse(config) {
        Ok(rule) => rule,
        Err(reason) => {
            debug!(%reason, "Configuration rejected, no discount");
            return FunctionRunResult::empty();
        }
    };

    if cart.is_empty() {
        debug!("Cart has no lines, no discount");
        return FunctionRunResult::empty();
    }

    if !classes.contains(&DiscountClass::Product) {
        debug!(?classes, "PRODUCT class not requested, no discount");
        return FunctionRunResult::empty();
    }

    let operations: Vec<Operation> = cart
        .lines
        .iter()
        .filter_map(|line| operation_for_line(&rule, line))
        .collect();

    debug!(
        lines = cart.lines.len(),
        operations = operations.len(),
        "Evaluated discount"
    );

    FunctionRunResult { operations }
}

/// Builds the operation for one line, or `None` if the line doesn't qualify.
fn operation_for_line(rule: &DiscountRule, line: &CartLine) -> Option<Operation> {
    match rule {
        DiscountRule::FlatPercentage(flat) => flat.matches(line).then(|| {
            Operation::product_percentage(
                &line.id,
                flat.percentage,
                flat.message.clone(),
                SelectionStrategy::All,
            )
        }),
        DiscountRule::QuantityTiers(tiered) => tiered.tier_for(line).map(|tier| {
            Operation::product_percentage(
                &line.id,
                tier.percentage,
                tier.message.clone(),
                SelectionStrategy::First,
            )
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
