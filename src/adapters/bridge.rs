//! Stdio Bridge - Line-oriented JSON Request Loop
//!
//! Reads one JSON request per line on stdin, dispatches by `method`
//! (`list_actions`, `healthcheck`, `execute`), and writes exactly one
//! JSON response per line on stdout. A caller-supplied `id` is echoed
//! verbatim, including `null`. Malformed framing produces its own
//! error envelope; the serving loop never crashes.
//!
//! Stdout is the protocol channel; all logging goes to stderr.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error};

use crate::domain::action::ACTIONS;
use crate::usecases::SkillRunner;

/// Framing-level error envelope (distinct from the runner's envelope).
fn error_response(request_id: Value, code: &str, message: &str) -> Value {
  json!({
    "id": request_id,
    "ok": false,
    "error": { "code": code, "message": message },
  })
}

/// Registry listing shared by the bridge and the CLI.
pub fn action_listing() -> Vec<Value> {
  ACTIONS
    .iter()
    .map(|spec| {
      json!({
        "name": spec.name,
        "category": spec.category,
        "required_params": spec.required_params,
      })
    })
    .collect()
}

/// Dispatch one parsed request object to the runner.
pub async fn handle_request(runner: &SkillRunner, request: &Value) -> Value {
  let request_id = request.get("id").cloned().unwrap_or(Value::Null);
  let method = request
    .get("method")
    .and_then(Value::as_str)
    .unwrap_or("execute");

  match method {
    "list_actions" => json!({
      "id": request_id,
      "ok": true,
      "result": { "actions": action_listing() },
    }),
    "healthcheck" => {
      let report = runner.healthcheck().await;
      json!({
        "id": request_id,
        "ok": report.ok,
        "result": report,
      })
    }
    "execute" => {
      let Some(action) = request.get("action").and_then(Value::as_str) else {
        return error_response(request_id, "ValidationError", "missing action field");
      };

      let params = match object_field(request, "params") {
        Ok(map) => map,
        Err(message) => return error_response(request_id, "ValidationError", &message),
      };
      let context = match object_field(request, "context") {
        Ok(map) => map,
        Err(message) => return error_response(request_id, "ValidationError", &message),
      };

      let result = runner.execute(action, params, context).await;
      let ok = result.ok;
      json!({
        "id": request_id,
        "ok": ok,
        "result": result,
      })
    }
    other => error_response(
      request_id,
      "UnsupportedMethod",
      &format!("unsupported method: {other}"),
    ),
  }
}

/// Extract an optional object-valued field; absence is an empty map,
/// presence with any other type is a validation failure.
fn object_field(request: &Value, key: &str) -> Result<crate::domain::Params, String> {
  match request.get(key) {
    None | Some(Value::Null) => Ok(crate::domain::Params::new()),
    Some(Value::Object(map)) => Ok(map.clone()),
    Some(_) => Err(format!("{key} must be a JSON object")),
  }
}

/// Serve requests over stdin/stdout until EOF.
pub async fn serve_stdio(runner: SkillRunner) -> Result<()> {
  let stdin = BufReader::new(tokio::io::stdin());
  let mut stdout = tokio::io::stdout();
  let mut lines = stdin.lines();

  while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
    let payload = line.trim();
    if payload.is_empty() {
      continue;
    }

    let response = match serde_json::from_str::<Value>(payload) {
      Err(_) => error_response(Value::Null, "InvalidJson", "input is not valid JSON"),
      Ok(request) if !request.is_object() => {
        error_response(Value::Null, "ValidationError", "request must be a JSON object")
      }
      Ok(request) => {
        debug!(method = ?request.get("method"), "Handling bridge request");
        handle_request(&runner, &request).await
      }
    };

    let mut encoded = serde_json::to_vec(&response).unwrap_or_else(|e| {
      error!(error = %e, "Failed to encode response");
      b"{\"ok\":false,\"error\":{\"code\":\"InternalError\",\"message\":\"encoding failure\"}}"
        .to_vec()
    });
    encoded.push(b'\n');
    stdout
      .write_all(&encoded)
      .await
      .context("Failed to write response")?;
    stdout.flush().await.context("Failed to flush stdout")?;
  }

  Ok(())
}
