#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;

fn function_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("discount-function").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DISCOUNT_FUNCTION_INPUT")
        .env_remove("DISCOUNT_FUNCTION_PRETTY")
        .env_remove("DISCOUNT_FUNCTION_LOG");
    cmd
}

fn input(lines: Value, classes: Value, config: Value) -> String {
    json!({
        "cart": { "lines": lines },
        "discount": {
            "discountClasses": classes,
            "metafield": { "jsonValue": config }
        }
    })
    .to_string()
}

fn variant(id: &str, product: &str, quantity: i64) -> Value {
    json!({
        "id": id,
        "quantity": quantity,
        "merchandise": { "__typename": "ProductVariant", "product": { "id": product } }
    })
}

// ============================================================================
// Evaluation through stdin/stdout
// ============================================================================

#[test]
fn test_single_matching_line() {
    let stdin = input(
        json!([variant("L1", "P1", 3)]),
        json!(["PRODUCT"]),
        json!({ "percentage": 15, "productIds": ["P1"], "message": "15% off" }),
    );

    function_cmd()
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout(concat!(
            r#"{"operations":[{"productDiscountsAdd":{"selectionStrategy":"ALL","candidates":"#,
            r#"[{"message":"15% off","value":{"percentage":{"value":15}},"#,
            r#""targets":[{"cartLine":{"id":"L1"}}]}]}}]}"#,
            "\n"
        ));
}

#[test]
fn test_partial_match_keeps_cart_order() {
    let stdin = input(
        json!([
            variant("L1", "P1", 1),
            variant("L2", "P2", 1),
            { "id": "L3", "quantity": 1, "merchandise": { "__typename": "CustomProduct" } },
            variant("L4", "P1", 2)
        ]),
        json!(["ORDER", "PRODUCT"]),
        json!({ "percentage": "12.5", "productIds": ["P1"], "message": "Deal" }),
    );

    let output = function_cmd().write_stdin(stdin).output().unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    let targets: Vec<&str> = result["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| {
            op["productDiscountsAdd"]["candidates"][0]["targets"][0]["cartLine"]["id"]
                .as_str()
                .unwrap()
        })
        .collect();
    assert_eq!(targets, vec!["L1", "L4"]);
    assert_eq!(
        result["operations"][0]["productDiscountsAdd"]["candidates"][0]["value"]["percentage"]
            ["value"],
        json!(12.5)
    );
}

#[test]
fn test_bad_percentage_yields_no_operations() {
    let stdin = input(
        json!([variant("L1", "p1", 1)]),
        json!(["PRODUCT"]),
        json!({ "percentage": "abc", "productIds": ["p1"], "message": "x" }),
    );

    function_cmd()
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout("{\"operations\":[]}\n");
}

#[test]
fn test_missing_metafield_yields_no_operations() {
    let stdin = json!({
        "cart": { "lines": [variant("L1", "P1", 1)] },
        "discount": { "discountClasses": ["PRODUCT"], "metafield": null }
    })
    .to_string();

    function_cmd()
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout("{\"operations\":[]}\n");
}

#[test]
fn test_undecodable_input_fails_open_and_logs() {
    function_cmd()
        .write_stdin("this is not json")
        .assert()
        .success()
        .stdout("{\"operations\":[]}\n")
        .stderr(predicate::str::contains("Undecodable function input"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_input_file_and_pretty_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("input.json");
    fs::write(
        &path,
        input(
            json!([variant("L1", "P1", 1)]),
            json!(["PRODUCT"]),
            json!({ "percentage": 5, "productIds": ["P1"], "message": "5% off" }),
        ),
    )
    .unwrap();

    function_cmd()
        .env("DISCOUNT_FUNCTION_INPUT", &path)
        .env("DISCOUNT_FUNCTION_PRETTY", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"selectionStrategy\": \"ALL\""))
        .stdout(predicate::str::contains("\"message\": \"5% off\""));
}

#[test]
fn test_missing_input_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("absent.json");

    function_cmd()
        .env("DISCOUNT_FUNCTION_INPUT", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_invalid_pretty_flag_fails() {
    function_cmd()
        .env("DISCOUNT_FUNCTION_PRETTY", "sometimes")
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid value for DISCOUNT_FUNCTION_PRETTY",
        ));
}
