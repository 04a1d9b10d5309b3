//! Property-Based Tests — Validator Invariants
//!
//! Uses `proptest` to verify the field-name-dispatched validator across
//! random inputs, including the explicit "unknown field = pass" default.

use proptest::prelude::*;
use serde_json::json;

use polymarket_skill_gateway::domain::validate::validate_param;

/// Field names that carry a validation rule.
const KNOWN_FIELDS: &[&str] = &[
  "token_id",
  "token",
  "condition_id",
  "market",
  "address",
  "order_id",
  "order_ids",
  "asset_type",
  "side",
  "order_type",
  "interval",
  "price",
  "size",
  "amount",
  "query",
  "limit",
  "offset",
  "slug",
  "date",
];

proptest! {
  /// A field name with no rule never rejects, whatever the value.
  #[test]
  fn unknown_fields_always_pass(
    name in "[a-z_]{1,16}",
    value in "\\PC{0,64}",
  ) {
    prop_assume!(!KNOWN_FIELDS.contains(&name.as_str()));
    prop_assert!(validate_param(&name, &json!(value)).is_none());
  }

  /// Digits-only strings of plausible length are valid token ids.
  #[test]
  fn digit_token_ids_pass(id in "[0-9]{1,100}") {
    prop_assert!(validate_param("token_id", &json!(id)).is_none());
  }

  /// Any token id containing a non-digit is rejected.
  #[test]
  fn non_digit_token_ids_fail(
    prefix in "[0-9]{0,10}",
    bad in "[a-zA-Z]{1,5}",
    suffix in "[0-9]{0,10}",
  ) {
    let id = format!("{prefix}{bad}{suffix}");
    prop_assert!(validate_param("token_id", &json!(id)).is_some());
  }

  /// Prices strictly inside (0, 1) pass.
  #[test]
  fn fractional_prices_pass(cents in 1u32..10_000) {
    let price = format!("0.{cents:04}");
    prop_assert!(validate_param("price", &json!(price)).is_none());
  }

  /// Prices at or above 1 fail the probability bound.
  #[test]
  fn prices_at_or_above_one_fail(whole in 1u32..1_000) {
    prop_assert!(validate_param("price", &json!(whole.to_string())).is_some());
  }

  /// Sizes are any positive decimal.
  #[test]
  fn positive_sizes_pass(whole in 1u64..1_000_000, frac in 0u32..100) {
    let size = format!("{whole}.{frac:02}");
    prop_assert!(validate_param("size", &json!(size)).is_none());
  }

  /// Limits in [1, 100] pass; everything above fails.
  #[test]
  fn limit_range(n in 1i64..10_000) {
    let result = validate_param("limit", &json!(n));
    if n <= 100 {
      prop_assert!(result.is_none());
    } else {
      prop_assert!(result.is_some());
    }
  }

  /// Well-formed addresses pass.
  #[test]
  fn addresses_pass(hex in "[0-9a-fA-F]{40}") {
    let address = format!("0x{hex}");
    prop_assert!(validate_param("address", &json!(address)).is_none());
  }

  /// Condition ids must be exactly 64 hex digits; any other length fails.
  #[test]
  fn condition_id_length_is_exact(hex in "[0-9a-f]{1,63}") {
    let id = format!("0x{hex}");
    prop_assert!(validate_param("condition_id", &json!(id)).is_some());
  }

  /// Lowercase slugs pass.
  #[test]
  fn slugs_pass(slug in "[a-z0-9-]{1,200}") {
    prop_assert!(validate_param("slug", &json!(slug)).is_none());
  }
}
