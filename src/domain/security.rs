//! Security Guard - Redaction, Placeholder Detection, Exposure Estimation
//!
//! Three independent guards around write safety:
//! - `sanitize_cmd` redacts credential values before anything is logged.
//! - `is_placeholder_key` is the last line of defense against trading
//!   with a non-functional demo key.
//! - `estimate_amount` produces the notional estimate checked against the
//!   human-approval ceiling.

use rust_decimal::Decimal;

use crate::config::SkillSettings;

use super::{Params, param_text};

/// Flags whose following value must never appear in logs.
const SENSITIVE_FLAGS: &[&str] = &["--private-key"];

/// Marker substrings identifying synthetic stand-in credentials.
const PLACEHOLDER_MARKERS: &[&str] = &["__PLACEHOLDER__", "__OPENCLAW_"];

/// Redaction marker substituted for sensitive values.
pub const REDACTED: &str = "***REDACTED***";

/// Replace the value following any sensitive flag with a redaction marker.
///
/// Redaction is positional (flag + next token) and idempotent; the real
/// argument list handed to the process is never altered.
pub fn sanitize_cmd(command: &[String]) -> Vec<String> {
  let mut sanitized = Vec::with_capacity(command.len());
  let mut mask_next = false;
  for arg in command {
    if mask_next {
      sanitized.push(REDACTED.to_string());
      mask_next = false;
      continue;
    }
    sanitized.push(arg.clone());
    if SENSITIVE_FLAGS.contains(&arg.as_str()) {
      mask_next = true;
    }
  }
  sanitized
}

/// Whether a private key looks like a non-functional stand-in.
///
/// True when the key is absent/empty, shorter than 10 characters, contains
/// the configured placeholder marker, or matches a known placeholder
/// pattern (including the all-zero 32-byte hex value).
pub fn is_placeholder_key(private_key: Option<&str>, settings: &SkillSettings) -> bool {
  let Some(key) = private_key else {
    return true;
  };
  let value = key.trim();
  if value.len() < 10 {
    return true;
  }
  if !settings.placeholder_private_key.is_empty()
    && value.contains(&settings.placeholder_private_key)
  {
    return true;
  }
  if PLACEHOLDER_MARKERS.iter().any(|m| value.contains(m)) {
    return true;
  }
  value.contains(&format!("0x{}", "0".repeat(64)))
}

/// Best-effort notional exposure of a write action, in USDC.
///
/// Limit orders estimate `price * size`; market buys take `amount`
/// directly. Market sells return `None`: sell-side notional depends on
/// the execution price, which is not known in advance. Any unparsable
/// field also yields `None` rather than failing the request.
pub fn estimate_amount(action: &str, params: &Params) -> Option<Decimal> {
  let field = |key: &str| -> Option<Decimal> {
    params.get(key).and_then(|v| param_text(v).parse().ok())
  };

  match action {
    "clob_create_order" => Some(field("price")? * field("size")?),
    "clob_market_order" => {
      let side = params.get("side").map(param_text).unwrap_or_default();
      if side.to_lowercase() == "buy" {
        field("amount")
      } else {
        None
      }
    }
    _ => None,
  }
}
