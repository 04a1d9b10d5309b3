//! Polymarket Skill Gateway — Entry Point
//!
//! Initializes settings and logging, then dispatches one of four
//! subcommands:
//! - `list-actions`  — print the action registry
//! - `healthcheck`   — probe the external binary and its version
//! - `execute`       — run a single action and print its envelope
//! - `serve-stdio`   — line-oriented JSON bridge for automation callers
//!
//! Stdout carries protocol output only; logs go to stderr.

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::bridge;
use config::SkillSettings;
use usecases::SkillRunner;

#[derive(Parser)]
#[command(name = "polymarket-skill-gateway", version, about)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List supported actions with categories and required parameters.
  ListActions,
  /// Check that the polymarket binary is present and version-pinned.
  Healthcheck,
  /// Execute a single action and print the response envelope.
  Execute {
    /// Action name, e.g. clob_book.
    #[arg(long)]
    action: String,
    /// Action parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,
    /// Runtime context as a JSON object (private_key, wallet_id, ...).
    #[arg(long, default_value = "{}")]
    context: String,
  },
  /// Serve the line-oriented stdio bridge until EOF.
  ServeStdio,
}

fn parse_object(raw: &str, name: &str) -> Result<domain::Params> {
  if raw.is_empty() {
    return Ok(domain::Params::new());
  }
  let value: serde_json::Value =
    serde_json::from_str(raw).with_context(|| format!("{name} is not valid JSON"))?;
  match value {
    serde_json::Value::Object(map) => Ok(map),
    _ => anyhow::bail!("{name} must be a JSON object"),
  }
}

fn print_line(value: &serde_json::Value) {
  // Envelopes always serialize; the types carry no non-JSON values.
  println!("{}", serde_json::to_string(value).unwrap_or_default());
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .json()
    .init();

  let cli = Cli::parse();

  match run(cli).await {
    Ok(code) => code,
    Err(e) => {
      eprintln!("{e:#}");
      ExitCode::from(2)
    }
  }
}

async fn run(cli: Cli) -> Result<ExitCode> {
  match cli.command {
    Command::ListActions => {
      print_line(&json!({ "ok": true, "actions": bridge::action_listing() }));
      Ok(ExitCode::SUCCESS)
    }
    Command::Healthcheck => {
      let runner = build_runner()?;
      let report = runner.healthcheck().await;
      print_line(&serde_json::to_value(&report)?);
      Ok(exit_for(report.ok))
    }
    Command::Execute {
      action,
      params,
      context,
    } => {
      let params = parse_object(&params, "--params")?;
      let context = parse_object(&context, "--context")?;
      let runner = build_runner()?;
      let response = runner.execute(&action, params, context).await;
      print_line(&serde_json::to_value(&response)?);
      Ok(exit_for(response.ok))
    }
    Command::ServeStdio => {
      let runner = build_runner()?;
      bridge::serve_stdio(runner).await?;
      Ok(ExitCode::SUCCESS)
    }
  }
}

fn build_runner() -> Result<SkillRunner> {
  let settings = SkillSettings::from_env().context("Failed to load settings from environment")?;
  tracing::info!(
    bin = %settings.polymarket_bin,
    allow_trading = settings.allow_trading,
    dry_run = settings.dry_run,
    "Gateway starting"
  );
  Ok(SkillRunner::new(Arc::new(settings)))
}

fn exit_for(ok: bool) -> ExitCode {
  if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
