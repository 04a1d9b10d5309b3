//! Error Taxonomy - Typed Failures and Text Classification
//!
//! Every failure the gateway can produce carries a kind, a message, and a
//! retryable flag so automated callers can decide whether to re-issue.
//! Downstream failures arrive as free text from the external binary and
//! are classified with a first-match-wins pattern table.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Failure kinds, serialized verbatim into the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
  /// Unregistered action name.
  UnknownAction,
  /// Malformed or missing parameter.
  ValidationError,
  /// Write attempted while trading is disabled in config.
  TradingDisabledError,
  /// Credential looks like a synthetic stand-in.
  PlaceholderKeyError,
  /// Monetary threshold exceeded; carries the estimated amount.
  HumanApprovalRequired,
  /// External binary version drift.
  CliVersionMismatch,
  /// Executable missing.
  BinaryNotFound,
  /// Process exceeded its allotted time.
  TimeoutError,
  /// Transient connectivity failure inferred from message text.
  NetworkError,
  /// Downstream rate limiting.
  RateLimitError,
  /// Credential or wallet problem reported downstream.
  AuthError,
  /// Geographic restriction.
  GeoblockError,
  /// Account balance too low.
  InsufficientFundsError,
  /// Unclassified failure text.
  UnknownError,
}

impl std::fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{self:?}")
  }
}

impl ErrorKind {
  /// Default retryability for this kind. The runner overrides this for
  /// write timeouts.
  pub const fn default_retryable(self) -> bool {
    matches!(
      self,
      Self::TimeoutError | Self::NetworkError | Self::RateLimitError
    )
  }
}

/// Structured failure carried in the response envelope.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SkillError {
  /// Failure kind.
  #[serde(rename = "type")]
  pub kind: ErrorKind,
  /// Human-readable description.
  pub message: String,
  /// Whether the caller may safely re-issue the same action.
  pub retryable: bool,
  /// Raw error object from the external binary, when it emitted one.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cli_error: Option<Value>,
  /// Context for a human approver (estimated amount, etc.).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub approval_context: Option<Value>,
}

impl SkillError {
  /// Build an error with the kind's default retryability.
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      retryable: kind.default_retryable(),
      cli_error: None,
      approval_context: None,
    }
  }
}

/// Pattern table for classifying downstream failure text.
///
/// Order matters: "invalid key" must hit AuthError before the generic
/// "invalid" rule claims it for ValidationError.
static ERROR_PATTERNS: LazyLock<Vec<(Regex, ErrorKind)>> = LazyLock::new(|| {
  vec![
    (
      Regex::new(r"(?i)(connect|timeout|network|dns|unreachable)").unwrap(),
      ErrorKind::NetworkError,
    ),
    (
      Regex::new(r"(?i)(authenticate|private\s*key|no wallet|invalid\s*key)").unwrap(),
      ErrorKind::AuthError,
    ),
    (
      Regex::new(r"(?i)(invalid|must be|expected|parse)").unwrap(),
      ErrorKind::ValidationError,
    ),
    (
      Regex::new(r"(?i)(rate\s*limit|429|too many)").unwrap(),
      ErrorKind::RateLimitError,
    ),
    (
      Regex::new(r"(?i)(geoblock|restricted|geo)").unwrap(),
      ErrorKind::GeoblockError,
    ),
    (
      Regex::new(r"(?i)(insufficient|not enough|balance.*low)").unwrap(),
      ErrorKind::InsufficientFundsError,
    ),
  ]
});

/// Classify a downstream failure message; first matching rule wins.
pub fn classify_error(message: &str) -> ErrorKind {
  for (pattern, kind) in ERROR_PATTERNS.iter() {
    if pattern.is_match(message) {
      return *kind;
    }
  }
  ErrorKind::UnknownError
}
