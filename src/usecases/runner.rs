//! Skill Runner - Execute/Healthcheck Orchestrator
//!
//! Drives each `execute` call through the gate sequence: version gate,
//! registry lookup, presence validation, field validation, argument
//! build, write-only safety gates, then lock-scoped execution. Every
//! terminal outcome is one uniform `{ok, action, data|error, meta}`
//! envelope; nothing escapes as an unhandled fault.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::adapters::process::CliExecutor;
use crate::config::SkillSettings;
use crate::domain::action::{self, ActionSpec};
use crate::domain::errors::{ErrorKind, SkillError};
use crate::domain::security::{estimate_amount, is_placeholder_key};
use crate::domain::validate::{validate_param, validate_presence};
use crate::domain::{Params, param_text};
use crate::ports::{CommandRunner, EnvOverrides, ExecMeta};

/// Wallet identity used when the caller supplies neither a wallet id
/// nor an address.
const DEFAULT_WALLET: &str = "default-wallet";

/// Uniform response envelope for every `execute` call.
#[derive(Debug, Clone, Serialize)]
pub struct SkillResponse {
  pub ok: bool,
  pub action: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dry_run: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<SkillError>,
  pub meta: ExecMeta,
}

/// Healthcheck result: binary reachable and version as pinned.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
  pub ok: bool,
  pub version: Option<String>,
  pub error: Option<String>,
}

/// Orchestrator tying the action registry, validators, security guards,
/// executor, and wallet locks into the execute/healthcheck contract.
pub struct SkillRunner {
  settings: Arc<SkillSettings>,
  executor: Arc<dyn CommandRunner>,
  locks: super::WalletLockManager,
  /// Version gate satisfied for this process lifetime. Relaxed racing
  /// first calls may both probe; duplicate probes are harmless.
  version_checked: AtomicBool,
}

impl SkillRunner {
  /// Build a runner backed by the real CLI executor.
  pub fn new(settings: Arc<SkillSettings>) -> Self {
    let executor = Arc::new(CliExecutor::new(settings.clone()));
    Self::with_executor(settings, executor)
  }

  /// Build a runner with an explicit executor (tests inject mocks here).
  pub fn with_executor(settings: Arc<SkillSettings>, executor: Arc<dyn CommandRunner>) -> Self {
    Self {
      settings,
      executor,
      locks: super::WalletLockManager::new(),
      version_checked: AtomicBool::new(false),
    }
  }

  /// Probe the external binary and report its version.
  pub async fn healthcheck(&self) -> HealthReport {
    match self.executor.check_cli_version().await {
      Ok(version) => HealthReport {
        ok: true,
        version: Some(version),
        error: None,
      },
      Err(message) => HealthReport {
        ok: false,
        version: None,
        error: Some(message),
      },
    }
  }

  /// Execute one action through the full gate sequence.
  pub async fn execute(&self, action: &str, params: Params, context: Params) -> SkillResponse {
    // 1. Version gate, checked once per process lifetime.
    if self.settings.enforce_cli_version && !self.version_checked.load(Ordering::Relaxed) {
      if let Err(message) = self.executor.check_cli_version().await {
        warn!(action, "Blocking execution on CLI version gate");
        return self.fail(action, SkillError::new(ErrorKind::CliVersionMismatch, message));
      }
      self.version_checked.store(true, Ordering::Relaxed);
    }

    // 2. Registry lookup.
    let Some(spec) = action::lookup(action) else {
      return self.fail(
        action,
        SkillError::new(ErrorKind::UnknownAction, format!("unknown action: {action}")),
      );
    };

    // 3. Required-parameter presence.
    if let Some(message) = validate_presence(&params, spec.required_params) {
      return self.fail(action, SkillError::new(ErrorKind::ValidationError, message));
    }

    // 4. Field validation over every supplied parameter.
    for (key, value) in &params {
      if let Some(message) = validate_param(key, value) {
        return self.fail(action, SkillError::new(ErrorKind::ValidationError, message));
      }
    }

    // 5. Argument build; pure, cannot fail past this point.
    let args = (spec.builder)(&params);

    // 6. Write-only safety gates.
    if spec.is_write() {
      if let Some(response) = self.write_gates(spec, &params, &context, &args) {
        return response;
      }
    }

    // 7. Execution, lock-scoped for writes.
    let timeout = if spec.is_write() {
      self.settings.write_timeout
    } else {
      self.settings.read_timeout
    };
    let env_overrides = self.build_env_overrides(&context);

    info!(action, category = ?spec.category, "Dispatching action");

    let result = if spec.is_write() {
      let wallet_id = resolve_wallet_id(&context);
      self
        .locks
        .run_locked(&wallet_id, self.executor.run(&args, timeout, &env_overrides))
        .await
    } else {
      self.executor.run(&args, timeout, &env_overrides).await
    };

    let mut meta = result.meta;
    meta.action = action.to_string();
    let response = SkillResponse {
      ok: result.ok,
      action: action.to_string(),
      dry_run: None,
      data: result.data,
      error: result.error,
      meta,
    };

    // 8. A write timeout must never look retryable: blind resubmission
    //    can double-fill an order that actually went through.
    fix_timeout_retryable(response, spec.is_write())
  }

  /// Run the write-only gates; `Some` is a terminal response.
  fn write_gates(
    &self,
    spec: &ActionSpec,
    params: &Params,
    context: &Params,
    args: &[String],
  ) -> Option<SkillResponse> {
    let action = spec.name;

    if !self.settings.allow_trading {
      warn!(action, "Write action rejected: trading disabled");
      return Some(self.fail(
        action,
        SkillError::new(
          ErrorKind::TradingDisabledError,
          "trading is disabled; set OPENCLAW_PM_ALLOW_TRADING=true to enable it",
        ),
      ));
    }

    let private_key = resolve_private_key(context);
    if is_placeholder_key(private_key.as_deref(), &self.settings) {
      warn!(action, "Write action rejected: placeholder private key");
      return Some(self.fail(
        action,
        SkillError::new(
          ErrorKind::PlaceholderKeyError,
          "the configured private key is a placeholder; refusing to trade with it",
        ),
      ));
    }

    if self.settings.dry_run {
      let mut would_execute = vec![
        self.settings.polymarket_bin.clone(),
        "-o".to_string(),
        "json".to_string(),
      ];
      would_execute.extend_from_slice(args);
      info!(action, "Dry-run short-circuit");
      return Some(SkillResponse {
        ok: true,
        action: action.to_string(),
        dry_run: Some(true),
        data: Some(json!({
          "would_execute": would_execute,
          "warnings": ["dry-run mode is active; no trade was executed"],
        })),
        error: None,
        meta: zero_meta(action),
      });
    }

    if let Some(estimated) = estimate_amount(action, params) {
      if estimated > self.settings.max_auto_amount {
        warn!(action, amount = %estimated, "Write action needs human approval");
        let mut error = SkillError::new(
          ErrorKind::HumanApprovalRequired,
          format!(
            "estimated amount ${} exceeds the auto-approval ceiling ${}; human confirmation required",
            estimated.round_dp(2),
            self.settings.max_auto_amount.round_dp(2)
          ),
        );
        error.approval_context = Some(json!({
          "estimated_amount": estimated.to_string(),
        }));
        return Some(self.fail(action, error));
      }
    }

    None
  }

  /// Compose env overrides from runtime context over settings defaults.
  fn build_env_overrides(&self, context: &Params) -> EnvOverrides {
    let private_key = resolve_runtime_value(context, "private_key", "POLYMARKET_PRIVATE_KEY");
    let signature_type =
      resolve_runtime_value(context, "signature_type", "POLYMARKET_SIGNATURE_TYPE")
        .unwrap_or_else(|| self.settings.default_signature_type.clone());
    vec![
      ("POLYMARKET_PRIVATE_KEY".to_string(), private_key),
      ("POLYMARKET_SIGNATURE_TYPE".to_string(), Some(signature_type)),
    ]
  }

  fn fail(&self, action: &str, error: SkillError) -> SkillResponse {
    SkillResponse {
      ok: false,
      action: action.to_string(),
      dry_run: None,
      data: None,
      error: Some(error),
      meta: zero_meta(action),
    }
  }
}

fn zero_meta(action: &str) -> ExecMeta {
  ExecMeta {
    action: action.to_string(),
    ..ExecMeta::default()
  }
}

/// First present value from the runtime context under either name.
fn resolve_runtime_value(context: &Params, key: &str, raw_key: &str) -> Option<String> {
  context
    .get(key)
    .or_else(|| context.get(raw_key))
    .filter(|v| !v.is_null())
    .map(param_text)
}

/// Credential precedence: runtime `private_key`, then the raw env-named
/// runtime field, then the ambient process environment. This order
/// determines which credential actually signs a transaction.
fn resolve_private_key(context: &Params) -> Option<String> {
  resolve_runtime_value(context, "private_key", "POLYMARKET_PRIVATE_KEY")
    .or_else(|| std::env::var("POLYMARKET_PRIVATE_KEY").ok())
}

/// Wallet-lock key: explicit wallet id, then address, then a fixed
/// default identity. An empty field counts as absent, so `wallet_id: ""`
/// still falls through to the address and locks the same account as a
/// request carrying only the address.
fn resolve_wallet_id(context: &Params) -> String {
  let nonempty = |key: &str| {
    context
      .get(key)
      .filter(|v| !v.is_null())
      .map(param_text)
      .filter(|v| !v.is_empty())
  };
  nonempty("wallet_id")
    .or_else(|| nonempty("address"))
    .unwrap_or_else(|| DEFAULT_WALLET.to_string())
}

/// Force write timeouts non-retryable and append reconciliation guidance.
fn fix_timeout_retryable(mut response: SkillResponse, is_write: bool) -> SkillResponse {
  if let Some(error) = response.error.as_mut() {
    if error.kind == ErrorKind::TimeoutError {
      error.retryable = !is_write;
      if is_write {
        error.message.push_str(
          "; the write timed out, query clob_orders / data_trades to reconcile before retrying",
        );
      }
    }
  }
  response
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ctx(pairs: &[(&str, &str)]) -> Params {
    let mut map = Params::new();
    for (k, v) in pairs {
      map.insert((*k).to_string(), Value::String((*v).to_string()));
    }
    map
  }

  #[test]
  fn test_wallet_id_resolution_order() {
    assert_eq!(
      resolve_wallet_id(&ctx(&[("wallet_id", "w1"), ("address", "0xabc")])),
      "w1"
    );
    assert_eq!(resolve_wallet_id(&ctx(&[("address", "0xabc")])), "0xabc");
    assert_eq!(resolve_wallet_id(&ctx(&[])), DEFAULT_WALLET);
  }

  #[test]
  fn test_empty_wallet_id_falls_through_to_address() {
    // Both shapes describe the same account and must share a lock key.
    let with_blank = ctx(&[("wallet_id", ""), ("address", "0xabc")]);
    let without = ctx(&[("address", "0xabc")]);
    assert_eq!(resolve_wallet_id(&with_blank), "0xabc");
    assert_eq!(resolve_wallet_id(&with_blank), resolve_wallet_id(&without));

    let all_blank = ctx(&[("wallet_id", ""), ("address", "")]);
    assert_eq!(resolve_wallet_id(&all_blank), DEFAULT_WALLET);
  }

  #[test]
  fn test_private_key_prefers_runtime_field() {
    let context = ctx(&[
      ("private_key", "0xruntime"),
      ("POLYMARKET_PRIVATE_KEY", "0xraw"),
    ]);
    assert_eq!(resolve_private_key(&context).as_deref(), Some("0xruntime"));

    let context = ctx(&[("POLYMARKET_PRIVATE_KEY", "0xraw")]);
    assert_eq!(resolve_private_key(&context).as_deref(), Some("0xraw"));
  }

  #[test]
  fn test_write_timeout_forced_non_retryable() {
    let response = SkillResponse {
      ok: false,
      action: "clob_create_order".to_string(),
      dry_run: None,
      data: None,
      error: Some(SkillError::new(ErrorKind::TimeoutError, "command timed out after 60s")),
      meta: zero_meta("clob_create_order"),
    };
    let fixed = fix_timeout_retryable(response, true);
    let error = fixed.error.unwrap();
    assert!(!error.retryable);
    assert!(error.message.contains("clob_orders"));
  }

  #[test]
  fn test_read_timeout_keeps_retryable() {
    let response = SkillResponse {
      ok: false,
      action: "clob_book".to_string(),
      dry_run: None,
      data: None,
      error: Some(SkillError::new(ErrorKind::TimeoutError, "command timed out after 15s")),
      meta: zero_meta("clob_book"),
    };
    let fixed = fix_timeout_retryable(response, false);
    assert!(fixed.error.unwrap().retryable);
  }
}
