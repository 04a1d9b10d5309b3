//! Parameter Validator - Field-name-keyed Syntactic Checks
//!
//! Validation dispatches on the parameter *name*, not the action, so the
//! same semantic field is validated identically everywhere it appears.
//! A field name with no rule passes silently; that keeps the validator
//! additive when new actions introduce new optional parameters.
//!
//! Every failure is a human-readable message that the runner surfaces as
//! a non-retryable ValidationError before any process is spawned.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use super::param_text;

static TOKEN_ID_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]{1,100}$").unwrap());
static CONDITION_ID_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap());
static ADDRESS_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap());
static ORDER_ID_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z_-]{1,128}$").unwrap());
static ORDER_IDS_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z_-]{1,128}(,[0-9a-zA-Z_-]{1,128})*$").unwrap());
static SLUG_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-z0-9-]{1,200}$").unwrap());
static DECIMAL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap());
static DATE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Check that every required parameter is present and non-null.
pub fn validate_presence(
  params: &super::Params,
  required_params: &[&str],
) -> Option<String> {
  for key in required_params {
    match params.get(*key) {
      None | Some(Value::Null) => {
        return Some(format!("missing required parameter: {key}"));
      }
      Some(_) => {}
    }
  }
  None
}

/// Validate one parameter by name, returning an error message on failure.
///
/// Null values pass (presence is checked separately); unknown names pass.
pub fn validate_param(name: &str, value: &Value) -> Option<String> {
  if value.is_null() {
    return None;
  }

  let v = param_text(value);

  match name {
    "token_id" | "token" if !TOKEN_ID_RE.is_match(&v) => {
      Some(format!("{name} must be a digits-only string"))
    }
    "condition_id" | "market" if !CONDITION_ID_RE.is_match(&v) => {
      Some(format!("{name} must be 0x followed by 64 hex digits"))
    }
    "address" if !ADDRESS_RE.is_match(&v) => {
      Some("address must be 0x followed by 40 hex digits".to_string())
    }
    "order_id" if !ORDER_ID_RE.is_match(&v) => {
      Some("order_id has an invalid format".to_string())
    }
    "order_ids" if !ORDER_IDS_RE.is_match(&v) => {
      Some("order_ids must be a comma-separated list of order ids".to_string())
    }
    "asset_type" if !matches!(v.as_str(), "collateral" | "conditional") => {
      Some("asset_type must be collateral or conditional".to_string())
    }
    "side" if !matches!(v.as_str(), "buy" | "sell") => {
      Some("side must be buy or sell".to_string())
    }
    "order_type" if !matches!(v.as_str(), "GTC" | "FOK" | "GTD" | "FAK") => {
      Some("order_type must be one of GTC/FOK/GTD/FAK".to_string())
    }
    "interval" if !matches!(v.as_str(), "1m" | "1h" | "6h" | "1d" | "1w" | "max") => {
      Some("interval must be one of 1m/1h/6h/1d/1w/max".to_string())
    }
    "price" | "size" | "amount" => validate_positive_decimal(name, &v),
    "query" => {
      if v.trim().is_empty() || v.len() > 200 {
        Some("query length must be between 1 and 200".to_string())
      } else {
        None
      }
    }
    "limit" => match v.parse::<i64>() {
      Ok(n) if (1..=100).contains(&n) => None,
      Ok(_) => Some("limit must be between 1 and 100".to_string()),
      Err(_) => Some("limit must be an integer".to_string()),
    },
    "offset" => match v.parse::<i64>() {
      Ok(n) if n >= 0 => None,
      Ok(_) => Some("offset must not be negative".to_string()),
      Err(_) => Some("offset must be an integer".to_string()),
    },
    "slug" if !SLUG_RE.is_match(&v) => {
      Some("slug may only contain lowercase letters, digits, and hyphens".to_string())
    }
    "date" if !DATE_RE.is_match(&v) => {
      Some("date must use the YYYY-MM-DD format".to_string())
    }
    _ => None,
  }
}

fn validate_positive_decimal(name: &str, v: &str) -> Option<String> {
  if !DECIMAL_RE.is_match(v) {
    return Some(format!("{name} must be a positive decimal"));
  }
  let Ok(numeric) = v.parse::<Decimal>() else {
    return Some(format!("{name} must be a positive decimal"));
  };
  if numeric <= Decimal::ZERO {
    return Some(format!("{name} must be greater than 0"));
  }
  // Prediction-market prices are probabilities, so strictly below 1.
  if name == "price" && numeric >= Decimal::ONE {
    return Some("price must be less than 1".to_string());
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_presence_reports_first_missing() {
    let mut params = super::super::Params::new();
    params.insert("side".into(), json!("buy"));
    params.insert("price".into(), Value::Null);

    let err = validate_presence(&params, &["side", "price"]).unwrap();
    assert!(err.contains("price"));
    assert!(validate_presence(&params, &["side"]).is_none());
  }

  #[test]
  fn test_price_bounds() {
    assert!(validate_param("price", &json!("1.2")).is_some());
    assert!(validate_param("price", &json!("-1")).is_some());
    assert!(validate_param("price", &json!("0")).is_some());
    assert!(validate_param("price", &json!("1")).is_some());
    assert!(validate_param("price", &json!("0.55")).is_none());
  }

  #[test]
  fn test_token_id_digits_only() {
    assert!(validate_param("token_id", &json!("abc")).is_some());
    assert!(validate_param("token_id", &json!("123456")).is_none());
    assert!(validate_param("token", &json!("0x12")).is_some());
  }

  #[test]
  fn test_market_is_condition_id_shaped() {
    let ok = format!("0x{}", "a".repeat(64));
    assert!(validate_param("market", &json!(ok)).is_none());
    assert!(validate_param("market", &json!("0xabc")).is_some());
  }

  #[test]
  fn test_address_shape() {
    assert!(
      validate_param("address", &json!("0x1234567890abcdef1234567890abcdef12345678"))
        .is_none()
    );
    assert!(validate_param("address", &json!("0x1234")).is_some());
  }

  #[test]
  fn test_enum_fields() {
    assert!(validate_param("side", &json!("buy")).is_none());
    assert!(validate_param("side", &json!("hold")).is_some());
    assert!(validate_param("order_type", &json!("GTC")).is_none());
    assert!(validate_param("order_type", &json!("gtc")).is_some());
    assert!(validate_param("interval", &json!("6h")).is_none());
    assert!(validate_param("interval", &json!("2h")).is_some());
    assert!(validate_param("asset_type", &json!("conditional")).is_none());
    assert!(validate_param("asset_type", &json!("cash")).is_some());
  }

  #[test]
  fn test_limit_and_offset_ranges() {
    assert!(validate_param("limit", &json!(1)).is_none());
    assert!(validate_param("limit", &json!(100)).is_none());
    assert!(validate_param("limit", &json!(0)).is_some());
    assert!(validate_param("limit", &json!(101)).is_some());
    assert!(validate_param("limit", &json!("abc")).is_some());
    assert!(validate_param("offset", &json!(0)).is_none());
    assert!(validate_param("offset", &json!(-1)).is_some());
  }

  #[test]
  fn test_order_ids_list() {
    assert!(validate_param("order_ids", &json!("a,b,c")).is_none());
    assert!(validate_param("order_ids", &json!("a,,b")).is_some());
    assert!(validate_param("order_ids", &json!("")).is_some());
  }

  #[test]
  fn test_slug_and_date() {
    assert!(validate_param("slug", &json!("btc-above-100k")).is_none());
    assert!(validate_param("slug", &json!("BTC")).is_some());
    assert!(validate_param("date", &json!("2026-08-29")).is_none());
    assert!(validate_param("date", &json!("29-08-2026")).is_some());
  }

  #[test]
  fn test_unknown_field_passes() {
    assert!(validate_param("fidelity", &json!("whatever")).is_none());
    assert!(validate_param("cursor", &json!("??")).is_none());
  }

  #[test]
  fn test_null_value_passes() {
    assert!(validate_param("price", &Value::Null).is_none());
  }
}
