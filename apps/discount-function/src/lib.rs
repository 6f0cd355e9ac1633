//! # discount-function: Function Runner
//!
//! Reads the pricing pipeline's input document, hands it to
//! [`discount_core::evaluate`], and writes the resulting operations.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load RunnerConfig (environment)                                     │
//! │  2. Initialize tracing → stderr (stdout is reserved for the result)     │
//! │  3. Read input (DISCOUNT_FUNCTION_INPUT file, else stdin)               │
//! │  4. Decode FunctionRunInput                                             │
//! │       └── undecodable? log error, answer {"operations":[]}              │
//! │  5. evaluate()                                                          │
//! │  6. Write FunctionRunResult JSON to stdout                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;

use std::fs;
use std::io::{self, Read, Write};

use discount_core::{evaluate, FunctionRunInput, FunctionRunResult};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::RunnerConfig;
use crate::error::{RunnerError, RunnerResult};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - otherwise `fallback` (from `DISCOUNT_FUNCTION_LOG`, default `warn`)
///
/// Logs always go to stderr.
pub fn init_tracing(fallback: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}

/// Runs one evaluation end to end using the process streams.
pub fn run(config: &RunnerConfig) -> RunnerResult<FunctionRunResult> {
    let raw = read_input(config)?;
    let result = evaluate_document(&raw);

    let stdout = io::stdout();
    write_result(&result, stdout.lock(), config.pretty)?;
    Ok(result)
}

/// Decodes and evaluates an input document.
///
/// An input that doesn't decode produces the empty result: a broken
/// payload must not fail cart pricing.
pub fn evaluate_document(raw: &str) -> FunctionRunResult {
    let input: FunctionRunInput = match serde_json::from_str(raw) {
        Ok(input) => input,
        Err(e) => {
            error!(error = %e, "Undecodable function input, returning no operations");
            return FunctionRunResult::empty();
        }
    };

    debug!(
        lines = input.cart.lines.len(),
        classes = ?input.discount.discount_classes,
        has_config = input.discount.config().is_some(),
        "Decoded function input"
    );

    let result = evaluate(&input);
    info!(operations = result.operations.len(), "Function evaluated");
    result
}

/// Writes `result` as JSON followed by a newline.
pub fn write_result<W: Write>(
    result: &FunctionRunResult,
    mut writer: W,
    pretty: bool,
) -> RunnerResult<()> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(result)
    } else {
        serde_json::to_vec(result)
    }
    .map_err(RunnerError::Encode)?;

    writer.write_all(&encoded).map_err(RunnerError::Output)?;
    writer.write_all(b"\n").map_err(RunnerError::Output)?;
    writer.flush().map_err(RunnerError::Output)
}

fn read_input(config: &RunnerConfig) -> RunnerResult<String> {
    match &config.input_path {
        Some(path) => {
            debug!(path = %path.display(), "Reading input file");
            fs::read_to_string(path).map_err(|source| RunnerError::InputFile {
                path: path.clone(),
                source,
            })
        }
        None => {
            let mut raw = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut raw)
                .map_err(RunnerError::Stdin)?;
            Ok(raw)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "cart": { "lines": [
            { "id": "gid://shopify/CartLine/1", "quantity": 3,
              "merchandise": { "__typename": "ProductVariant",
                               "id": "gid://shopify/ProductVariant/10",
                               "product": { "id": "gid://shopify/Product/1" } } }
        ] },
        "discount": {
            "discountClasses": ["PRODUCT"],
            "metafield": { "jsonValue": {
                "quantity": "", "percentage": 15, "message": "15% off",
                "productIds": ["gid://shopify/Product/1"]
            } }
        }
    }"#;

    #[test]
    fn test_evaluate_document() {
        let result = evaluate_document(INPUT);
        assert_eq!(result.operations.len(), 1);
    }

    #[test]
    fn test_undecodable_input_fails_open() {
        assert!(evaluate_document("{ not json").is_empty());
        assert!(evaluate_document(r#"{"cart": {"lines": "nope"}}"#).is_empty());
    }

    #[test]
    fn test_line_without_typename_only_skips_that_line() {
        let raw = r#"{
            "cart": { "lines": [
                { "id": "L1", "quantity": 1,
                  "merchandise": { "__typename": "ProductVariant", "product": { "id": "P1" } } },
                { "id": "L2", "quantity": 1, "merchandise": {} }
            ] },
            "discount": {
                "discountClasses": ["PRODUCT"],
                "metafield": { "jsonValue": {
                    "percentage": 10, "message": "10% off", "productIds": ["P1"]
                } }
            }
        }"#;

        let result = serde_json::to_value(evaluate_document(raw)).unwrap();
        let operations = result["operations"].as_array().unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(
            operations[0]["productDiscountsAdd"]["candidates"][0]["targets"][0]["cartLine"]["id"],
            "L1"
        );
    }

    #[test]
    fn test_write_result_compact() {
        let mut out = Vec::new();
        write_result(&FunctionRunResult::empty(), &mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"operations\":[]}\n");
    }

    #[test]
    fn test_write_result_pretty() {
        let mut out = Vec::new();
        write_result(&evaluate_document(INPUT), &mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  \"operations\": ["));
        assert!(text.contains("\"selectionStrategy\": \"ALL\""));
    }
}
