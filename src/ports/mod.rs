//! Ports Module - External-effect Seams
//!
//! The gateway has exactly one external effect: invoking the trading
//! binary. `CommandRunner` is the trait boundary that usecases depend on,
//! so tests can substitute a mock executor.

pub mod command_runner;

pub use command_runner::{CommandResult, CommandRunner, EnvOverrides, ExecMeta};
