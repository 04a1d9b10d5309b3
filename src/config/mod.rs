//! Configuration Module - Environment-sourced Gateway Settings
//!
//! Loads an immutable `SkillSettings` snapshot from environment variables
//! once at startup. The snapshot is shared read-only by every in-flight
//! request; nothing here is ever mutated after construction.
//!
//! Safety-relevant defaults are deliberately conservative: trading is
//! disabled and dry-run is enabled unless the environment says otherwise.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// Immutable gateway configuration snapshot.
#[derive(Debug, Clone)]
pub struct SkillSettings {
  /// Path or name of the external `polymarket` binary.
  pub polymarket_bin: String,
  /// Signature type passed to the binary when the caller supplies none.
  pub default_signature_type: String,
  /// Marker substring identifying a placeholder private key.
  pub placeholder_private_key: String,
  /// Master switch for write actions. Off = every write is rejected.
  pub allow_trading: bool,
  /// When on, write actions are validated and gated but never executed.
  pub dry_run: bool,
  /// Notional ceiling (USDC) above which writes need human approval.
  pub max_auto_amount: Decimal,
  /// Timeout for read-category invocations.
  pub read_timeout: Duration,
  /// Timeout for write-category invocations.
  pub write_timeout: Duration,
  /// Expected output of `polymarket --version`.
  pub cli_version: String,
  /// Whether a version mismatch blocks execution.
  pub enforce_cli_version: bool,
}

impl Default for SkillSettings {
  fn default() -> Self {
    Self {
      polymarket_bin: "polymarket".to_string(),
      default_signature_type: "proxy".to_string(),
      placeholder_private_key: "__PLACEHOLDER__".to_string(),
      allow_trading: false,
      dry_run: true,
      max_auto_amount: Decimal::from(10),
      read_timeout: Duration::from_secs(15),
      write_timeout: Duration::from_secs(60),
      cli_version: "0.1.4".to_string(),
      enforce_cli_version: true,
    }
  }
}

impl SkillSettings {
  /// Load settings from the process environment.
  ///
  /// # Errors
  /// Returns detailed error if a numeric variable fails to parse or a
  /// validation rule is violated.
  pub fn from_env() -> Result<Self> {
    let defaults = Self::default();

    let settings = Self {
      polymarket_bin: env_or("OPENCLAW_PM_BIN", &defaults.polymarket_bin),
      default_signature_type: env_or(
        "POLYMARKET_SIGNATURE_TYPE",
        &defaults.default_signature_type,
      ),
      placeholder_private_key: env_or(
        "OPENCLAW_PM_PLACEHOLDER_KEY",
        &defaults.placeholder_private_key,
      ),
      allow_trading: env_flag("OPENCLAW_PM_ALLOW_TRADING", false),
      // Dry-run stays on unless explicitly set to "false".
      dry_run: !matches!(
        std::env::var("OPENCLAW_PM_DRY_RUN").as_deref(),
        Ok("false")
      ),
      max_auto_amount: env_parsed("OPENCLAW_PM_MAX_AUTO_AMOUNT", defaults.max_auto_amount)?,
      read_timeout: Duration::from_secs(env_parsed(
        "OPENCLAW_PM_READ_TIMEOUT_SECONDS",
        defaults.read_timeout.as_secs(),
      )?),
      write_timeout: Duration::from_secs(env_parsed(
        "OPENCLAW_PM_WRITE_TIMEOUT_SECONDS",
        defaults.write_timeout.as_secs(),
      )?),
      cli_version: env_or("OPENCLAW_PM_CLI_VERSION", &defaults.cli_version),
      enforce_cli_version: env_flag("OPENCLAW_PM_ENFORCE_VERSION", true),
    };

    settings.validate()?;
    Ok(settings)
  }

  /// Validate all settings values.
  fn validate(&self) -> Result<()> {
    anyhow::ensure!(
      !self.polymarket_bin.is_empty(),
      "OPENCLAW_PM_BIN must not be empty"
    );
    anyhow::ensure!(
      self.max_auto_amount >= Decimal::ZERO,
      "OPENCLAW_PM_MAX_AUTO_AMOUNT must not be negative, got {}",
      self.max_auto_amount
    );
    anyhow::ensure!(
      self.read_timeout.as_secs() > 0,
      "OPENCLAW_PM_READ_TIMEOUT_SECONDS must be positive"
    );
    anyhow::ensure!(
      self.write_timeout.as_secs() > 0,
      "OPENCLAW_PM_WRITE_TIMEOUT_SECONDS must be positive"
    );
    Ok(())
  }
}

fn env_or(key: &str, default: &str) -> String {
  std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str, default: bool) -> bool {
  std::env::var(key).map_or(default, |v| v.eq_ignore_ascii_case("true"))
}

fn env_parsed<T>(key: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match std::env::var(key) {
    Ok(raw) => raw
      .parse()
      .with_context(|| format!("Failed to parse {key}={raw}")),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_are_safe() {
    let settings = SkillSettings::default();
    assert!(!settings.allow_trading);
    assert!(settings.dry_run);
    assert!(settings.enforce_cli_version);
    assert_eq!(settings.max_auto_amount, Decimal::from(10));
  }

  #[test]
  fn test_validate_rejects_empty_binary() {
    let settings = SkillSettings {
      polymarket_bin: String::new(),
      ..SkillSettings::default()
    };
    assert!(settings.validate().is_err());
  }

  #[test]
  fn test_validate_rejects_zero_timeout() {
    let settings = SkillSettings {
      read_timeout: Duration::from_secs(0),
      ..SkillSettings::default()
    };
    assert!(settings.validate().is_err());
  }
}
