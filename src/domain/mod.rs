//! Domain Module - Pure Gateway Logic
//!
//! Action registry, parameter validation, security guards, and the error
//! taxonomy. Nothing in this module performs I/O; everything is a total
//! function over its inputs so the safety gates can be tested in isolation.

pub mod action;
pub mod errors;
pub mod security;
pub mod validate;

use serde_json::Value;

/// Parameter mapping as received from the caller.
pub type Params = serde_json::Map<String, Value>;

/// Render a parameter value the way it appears on the command line.
///
/// Strings pass through without quotes; booleans become `true`/`false`;
/// numbers use their JSON rendering. Composite values fall back to
/// compact JSON (the validator rejects them before any builder runs).
pub fn param_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
    Value::Number(n) => n.to_string(),
    other => other.to_string(),
  }
}
