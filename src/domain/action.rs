//! Action Registry - Static Action Table and Argument Builders
//!
//! Maps every supported action name to its capability category, required
//! parameters, and a pure argument-list builder. The category is the
//! single source of truth for which safety gates apply: miscategorizing
//! an action changes the blast radius of trading safety, so WRITE is
//! reserved strictly for state-mutating subcommands.
//!
//! Builders assume required parameters are present (the runner validates
//! presence first) and perform no validation of their own.

use serde::Serialize;
use serde_json::Value;

use super::{Params, param_text};

/// Capability category determining which safety gates apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
  /// Public market data, no credential needed.
  Read,
  /// Reads that depend on credentialed account state.
  ReadAuth,
  /// State-mutating, subject to all write gates.
  Write,
}

/// Immutable descriptor for one gateway action.
pub struct ActionSpec {
  /// Action name as exposed to callers.
  pub name: &'static str,
  /// Capability category.
  pub category: ActionCategory,
  /// Parameters that must be present before the builder runs.
  pub required_params: &'static [&'static str],
  /// Pure function mapping validated params to CLI arguments.
  pub builder: fn(&Params) -> Vec<String>,
}

impl ActionSpec {
  /// Whether this action mutates exchange state.
  pub const fn is_write(&self) -> bool {
    matches!(self.category, ActionCategory::Write)
  }
}

/// Look up an action by name.
pub fn lookup(name: &str) -> Option<&'static ActionSpec> {
  ACTIONS.iter().find(|spec| spec.name == name)
}

// ── Builder helpers ─────────────────────────────────────

fn req(params: &Params, key: &str) -> String {
  param_text(&params[key])
}

fn opt_or(params: &Params, key: &str, default: &str) -> String {
  params
    .get(key)
    .filter(|v| !v.is_null())
    .map_or_else(|| default.to_string(), param_text)
}

fn push_opt(args: &mut Vec<String>, params: &Params, key: &str, flag: &str) {
  if let Some(value) = params.get(key) {
    if !value.is_null() {
      args.push(flag.to_string());
      args.push(param_text(value));
    }
  }
}

/// Push a flag whose value is coerced to `true`/`false` by truthiness,
/// so `active: 1` renders as `--active true`.
fn push_opt_bool(args: &mut Vec<String>, params: &Params, key: &str, flag: &str) {
  if let Some(value) = params.get(key) {
    if !value.is_null() {
      args.push(flag.to_string());
      args.push(bool_text(value).to_string());
    }
  }
}

fn bool_text(value: &Value) -> &'static str {
  let truthy = match value {
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(items) => !items.is_empty(),
    Value::Object(map) => !map.is_empty(),
    Value::Null => false,
  };
  if truthy { "true" } else { "false" }
}

/// Push a bare flag when the parameter is explicitly `true`.
fn push_if_true(args: &mut Vec<String>, params: &Params, key: &str, flag: &str) {
  if params.get(key) == Some(&Value::Bool(true)) {
    args.push(flag.to_string());
  }
}

fn listing_args(args: &mut Vec<String>, params: &Params) {
  push_opt(args, params, "tag", "--tag");
  push_opt_bool(args, params, "active", "--active");
  push_opt_bool(args, params, "closed", "--closed");
  push_opt(args, params, "order", "--order");
  push_if_true(args, params, "ascending", "--ascending");
}

// ── Builders ────────────────────────────────────────────

fn build_markets_search(params: &Params) -> Vec<String> {
  vec![
    "markets".into(),
    "search".into(),
    req(params, "query"),
    "--limit".into(),
    opt_or(params, "limit", "10"),
  ]
}

fn build_markets_get(params: &Params) -> Vec<String> {
  vec!["markets".into(), "get".into(), req(params, "id_or_slug")]
}

fn build_markets_list(params: &Params) -> Vec<String> {
  let mut args = vec![
    "markets".into(),
    "list".into(),
    "--limit".into(),
    opt_or(params, "limit", "25"),
  ];
  push_opt(&mut args, params, "offset", "--offset");
  push_opt_bool(&mut args, params, "active", "--active");
  push_opt_bool(&mut args, params, "closed", "--closed");
  push_opt(&mut args, params, "order", "--order");
  push_if_true(&mut args, params, "ascending", "--ascending");
  args
}

fn build_events_list(params: &Params) -> Vec<String> {
  let mut args = vec![
    "events".into(),
    "list".into(),
    "--limit".into(),
    opt_or(params, "limit", "25"),
  ];
  listing_args(&mut args, params);
  args
}

fn build_events_get(params: &Params) -> Vec<String> {
  vec!["events".into(), "get".into(), req(params, "id")]
}

fn build_clob_book(params: &Params) -> Vec<String> {
  vec!["clob".into(), "book".into(), req(params, "token_id")]
}

fn build_clob_midpoint(params: &Params) -> Vec<String> {
  vec!["clob".into(), "midpoint".into(), req(params, "token_id")]
}

fn build_clob_spread(params: &Params) -> Vec<String> {
  let mut args = vec!["clob".into(), "spread".into(), req(params, "token_id")];
  push_opt(&mut args, params, "side", "--side");
  args
}

fn build_clob_price(params: &Params) -> Vec<String> {
  vec![
    "clob".into(),
    "price".into(),
    req(params, "token_id"),
    "--side".into(),
    req(params, "side"),
  ]
}

fn build_clob_price_history(params: &Params) -> Vec<String> {
  let mut args = vec![
    "clob".into(),
    "price-history".into(),
    req(params, "token_id"),
    "--interval".into(),
    opt_or(params, "interval", "1d"),
  ];
  push_opt(&mut args, params, "fidelity", "--fidelity");
  args
}

fn build_clob_balance(params: &Params) -> Vec<String> {
  let mut args = vec![
    "clob".into(),
    "balance".into(),
    "--asset-type".into(),
    req(params, "asset_type"),
  ];
  push_opt(&mut args, params, "token", "--token");
  args
}

fn build_clob_orders(params: &Params) -> Vec<String> {
  let mut args = vec!["clob".into(), "orders".into()];
  push_opt(&mut args, params, "market", "--market");
  push_opt(&mut args, params, "asset", "--asset");
  push_opt(&mut args, params, "cursor", "--cursor");
  args
}

fn build_clob_order(params: &Params) -> Vec<String> {
  vec!["clob".into(), "order".into(), req(params, "order_id")]
}

fn build_clob_create_order(params: &Params) -> Vec<String> {
  let mut args = vec![
    "clob".into(),
    "create-order".into(),
    "--token".into(),
    req(params, "token"),
    "--side".into(),
    req(params, "side"),
    "--price".into(),
    req(params, "price"),
    "--size".into(),
    req(params, "size"),
    "--order-type".into(),
    opt_or(params, "order_type", "GTC"),
  ];
  push_if_true(&mut args, params, "post_only", "--post-only");
  args
}

fn build_clob_market_order(params: &Params) -> Vec<String> {
  vec![
    "clob".into(),
    "market-order".into(),
    "--token".into(),
    req(params, "token"),
    "--side".into(),
    req(params, "side"),
    "--amount".into(),
    req(params, "amount"),
    "--order-type".into(),
    opt_or(params, "order_type", "FOK"),
  ]
}

fn build_clob_cancel(params: &Params) -> Vec<String> {
  vec!["clob".into(), "cancel".into(), req(params, "order_id")]
}

fn build_clob_cancel_orders(params: &Params) -> Vec<String> {
  vec![
    "clob".into(),
    "cancel-orders".into(),
    req(params, "order_ids"),
  ]
}

fn build_clob_cancel_all(_params: &Params) -> Vec<String> {
  vec!["clob".into(), "cancel-all".into()]
}

fn build_data_positions(params: &Params) -> Vec<String> {
  let mut args = vec![
    "data".into(),
    "positions".into(),
    req(params, "address"),
    "--limit".into(),
    opt_or(params, "limit", "25"),
  ];
  push_opt(&mut args, params, "offset", "--offset");
  args
}

fn build_data_value(params: &Params) -> Vec<String> {
  vec!["data".into(), "value".into(), req(params, "address")]
}

fn build_data_trades(params: &Params) -> Vec<String> {
  let mut args = vec![
    "data".into(),
    "trades".into(),
    req(params, "address"),
    "--limit".into(),
    opt_or(params, "limit", "25"),
  ];
  push_opt(&mut args, params, "offset", "--offset");
  args
}

fn build_data_leaderboard(params: &Params) -> Vec<String> {
  let mut args = vec![
    "data".into(),
    "leaderboard".into(),
    "--limit".into(),
    opt_or(params, "limit", "25"),
  ];
  push_opt(&mut args, params, "period", "--period");
  push_opt(&mut args, params, "order_by", "--order-by");
  push_opt(&mut args, params, "offset", "--offset");
  args
}

/// The full action table, in the order exposed by `list_actions`.
pub static ACTIONS: &[ActionSpec] = &[
  ActionSpec {
    name: "markets_search",
    category: ActionCategory::Read,
    required_params: &["query"],
    builder: build_markets_search,
  },
  ActionSpec {
    name: "markets_get",
    category: ActionCategory::Read,
    required_params: &["id_or_slug"],
    builder: build_markets_get,
  },
  ActionSpec {
    name: "markets_list",
    category: ActionCategory::Read,
    required_params: &[],
    builder: build_markets_list,
  },
  ActionSpec {
    name: "events_list",
    category: ActionCategory::Read,
    required_params: &[],
    builder: build_events_list,
  },
  ActionSpec {
    name: "events_get",
    category: ActionCategory::Read,
    required_params: &["id"],
    builder: build_events_get,
  },
  ActionSpec {
    name: "clob_book",
    category: ActionCategory::Read,
    required_params: &["token_id"],
    builder: build_clob_book,
  },
  ActionSpec {
    name: "clob_midpoint",
    category: ActionCategory::Read,
    required_params: &["token_id"],
    builder: build_clob_midpoint,
  },
  ActionSpec {
    name: "clob_spread",
    category: ActionCategory::Read,
    required_params: &["token_id"],
    builder: build_clob_spread,
  },
  ActionSpec {
    name: "clob_price",
    category: ActionCategory::Read,
    required_params: &["token_id", "side"],
    builder: build_clob_price,
  },
  ActionSpec {
    name: "clob_price_history",
    category: ActionCategory::Read,
    required_params: &["token_id"],
    builder: build_clob_price_history,
  },
  ActionSpec {
    name: "clob_balance",
    category: ActionCategory::ReadAuth,
    required_params: &["asset_type"],
    builder: build_clob_balance,
  },
  ActionSpec {
    name: "clob_orders",
    category: ActionCategory::ReadAuth,
    required_params: &[],
    builder: build_clob_orders,
  },
  ActionSpec {
    name: "clob_order",
    category: ActionCategory::ReadAuth,
    required_params: &["order_id"],
    builder: build_clob_order,
  },
  ActionSpec {
    name: "clob_create_order",
    category: ActionCategory::Write,
    required_params: &["token", "side", "price", "size"],
    builder: build_clob_create_order,
  },
  ActionSpec {
    name: "clob_market_order",
    category: ActionCategory::Write,
    required_params: &["token", "side", "amount"],
    builder: build_clob_market_order,
  },
  ActionSpec {
    name: "clob_cancel",
    category: ActionCategory::Write,
    required_params: &["order_id"],
    builder: build_clob_cancel,
  },
  ActionSpec {
    name: "clob_cancel_orders",
    category: ActionCategory::Write,
    required_params: &["order_ids"],
    builder: build_clob_cancel_orders,
  },
  ActionSpec {
    name: "clob_cancel_all",
    category: ActionCategory::Write,
    required_params: &[],
    builder: build_clob_cancel_all,
  },
  ActionSpec {
    name: "data_positions",
    category: ActionCategory::Read,
    required_params: &["address"],
    builder: build_data_positions,
  },
  ActionSpec {
    name: "data_value",
    category: ActionCategory::Read,
    required_params: &["address"],
    builder: build_data_value,
  },
  ActionSpec {
    name: "data_trades",
    category: ActionCategory::Read,
    required_params: &["address"],
    builder: build_data_trades,
  },
  ActionSpec {
    name: "data_leaderboard",
    category: ActionCategory::Read,
    required_params: &[],
    builder: build_data_leaderboard,
  },
];
