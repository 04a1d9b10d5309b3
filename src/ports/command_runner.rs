//! Command Runner Port - External Binary Invocation Interface
//!
//! Defines the trait for running the trading binary and probing its
//! version. Implementors own process lifecycle, timeouts, and output
//! parsing; callers only see a `CommandResult`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::errors::SkillError;

/// Environment overrides merged over the inherited environment.
///
/// A `None` value is a deliberate no-op, not a deletion: it preserves
/// the ambient credential when no runtime override was supplied.
pub type EnvOverrides = Vec<(String, Option<String>)>;

/// Execution metadata recorded for every invocation, success or failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecMeta {
  /// Action name; filled in by the runner when composing the envelope.
  pub action: String,
  /// Wall-clock duration in milliseconds (0 when no process ran).
  pub duration_ms: u64,
  /// Command line with sensitive values redacted.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cmd_sanitized: Option<Vec<String>>,
  /// Process exit code, when the process ran to completion.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exit_code: Option<i32>,
}

/// Outcome of one external-process invocation.
#[derive(Debug, Clone)]
pub struct CommandResult {
  /// Whether the process exited cleanly.
  pub ok: bool,
  /// Parsed JSON stdout, or raw trimmed text; present iff ok.
  pub data: Option<Value>,
  /// Classified failure; present iff not ok.
  pub error: Option<SkillError>,
  /// Execution metadata, recorded regardless of outcome.
  pub meta: ExecMeta,
}

/// Trait for invoking the external trading binary.
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
  /// Probe the binary with `--version`.
  ///
  /// Returns the version token on success, or a blocking diagnostic
  /// message when the probe fails or the version is unexpected.
  async fn check_cli_version(&self) -> Result<String, String>;

  /// Spawn the binary with the given subcommand arguments.
  ///
  /// Never returns an error at the Rust level: every failure mode is
  /// folded into the `CommandResult` so the runner can compose one
  /// uniform envelope.
  async fn run(
    &self,
    args: &[String],
    timeout: Duration,
    env_overrides: &EnvOverrides,
  ) -> CommandResult;
}
