//! CLI Executor - Tokio Process Adapter for the Trading Binary
//!
//! Spawns `<bin> -o json <args...>` with merged environment overrides,
//! enforces a wall-clock timeout, parses stdout, and classifies every
//! failure into the gateway error taxonomy. A timed-out child is
//! abandoned, not killed: process lifecycle cleanup is an external
//! concern at this layer.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::SkillSettings;
use crate::domain::errors::{ErrorKind, SkillError, classify_error};
use crate::domain::security::sanitize_cmd;
use crate::ports::{CommandResult, CommandRunner, EnvOverrides, ExecMeta};

/// How long the `--version` probe may take.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Executor invoking the external trading binary as a child process.
pub struct CliExecutor {
  settings: Arc<SkillSettings>,
}

impl CliExecutor {
  pub fn new(settings: Arc<SkillSettings>) -> Self {
    Self { settings }
  }
}

#[async_trait]
impl CommandRunner for CliExecutor {
  async fn check_cli_version(&self) -> Result<String, String> {
    let bin = &self.settings.polymarket_bin;
    let output = tokio::time::timeout(
      VERSION_PROBE_TIMEOUT,
      Command::new(bin)
        .arg("--version")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output(),
    )
    .await;

    let output = match output {
      Ok(Ok(output)) => output,
      Ok(Err(_)) | Err(_) => {
        return Err(format!(
          "unable to run {bin} --version; check that the binary is installed and on PATH"
        ));
      }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.trim();
    if line.is_empty() {
      return Err(format!("{bin} --version produced no output"));
    }
    let version = line.split_whitespace().last().unwrap_or_default();
    if version != self.settings.cli_version {
      return Err(format!(
        "CLI version mismatch: expected {}, found {version}",
        self.settings.cli_version
      ));
    }
    Ok(version.to_string())
  }

  async fn run(
    &self,
    args: &[String],
    timeout: Duration,
    env_overrides: &EnvOverrides,
  ) -> CommandResult {
    let mut command: Vec<String> = vec![
      self.settings.polymarket_bin.clone(),
      "-o".to_string(),
      "json".to_string(),
    ];
    command.extend_from_slice(args);

    let mut meta = ExecMeta {
      cmd_sanitized: Some(sanitize_cmd(&command)),
      ..ExecMeta::default()
    };

    let mut child = Command::new(&command[0]);
    child
      .args(&command[1..])
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());
    for (key, value) in env_overrides {
      // A None override keeps whatever the inherited environment has.
      if let Some(value) = value {
        child.env(key, value);
      }
    }

    debug!(cmd = ?meta.cmd_sanitized, timeout_s = timeout.as_secs(), "Spawning CLI");

    let started = Instant::now();
    let output = match tokio::time::timeout(timeout, child.output()).await {
      Ok(Ok(output)) => output,
      Ok(Err(e)) => {
        meta.duration_ms = started.elapsed().as_millis() as u64;
        let error = if e.kind() == std::io::ErrorKind::NotFound {
          SkillError::new(
            ErrorKind::BinaryNotFound,
            format!("command not found: {}", self.settings.polymarket_bin),
          )
        } else {
          SkillError::new(ErrorKind::UnknownError, format!("failed to spawn: {e}"))
        };
        return failure(error, meta);
      }
      Err(_) => {
        meta.duration_ms = started.elapsed().as_millis() as u64;
        warn!(cmd = ?meta.cmd_sanitized, "CLI invocation timed out");
        let error = SkillError::new(
          ErrorKind::TimeoutError,
          format!("command timed out after {}s", timeout.as_secs()),
        );
        return failure(error, meta);
      }
    };

    meta.duration_ms = started.elapsed().as_millis() as u64;
    meta.exit_code = output.status.code();

    let raw_stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let raw_stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let parsed: Option<serde_json::Value> = if raw_stdout.is_empty() {
      None
    } else {
      serde_json::from_str(&raw_stdout).ok()
    };

    if output.status.success() {
      let data = parsed.unwrap_or(serde_json::Value::String(raw_stdout));
      return CommandResult {
        ok: true,
        data: Some(data),
        error: None,
        meta,
      };
    }

    // On failure a JSON error object on stdout is authoritative; fall
    // back to stderr, then stdout, then a generic exit-code message.
    let (message, cli_error) = match &parsed {
      Some(value) if value.get("error").is_some() => {
        let message = match &value["error"] {
          serde_json::Value::String(s) => s.clone(),
          other => other.to_string(),
        };
        (message, parsed.clone())
      }
      _ => {
        let message = if !raw_stderr.is_empty() {
          raw_stderr
        } else if !raw_stdout.is_empty() {
          raw_stdout
        } else {
          format!(
            "command failed with exit code {}",
            meta.exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
          )
        };
        (message, None)
      }
    };

    let kind = classify_error(&message);
    warn!(kind = %kind, exit_code = ?meta.exit_code, "CLI invocation failed");
    let mut error = SkillError::new(kind, message);
    error.cli_error = cli_error;
    failure(error, meta)
  }
}

fn failure(error: SkillError, meta: ExecMeta) -> CommandResult {
  CommandResult {
    ok: false,
    data: None,
    error: Some(error),
    meta,
  }
}
