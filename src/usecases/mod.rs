//! Usecases Module - Orchestration Layer
//!
//! The skill runner composes the domain gates with the command-runner
//! port; the wallet lock manager serializes write execution per wallet.

pub mod locks;
pub mod runner;

pub use locks::WalletLockManager;
pub use runner::{HealthReport, SkillResponse, SkillRunner};
