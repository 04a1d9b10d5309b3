//! Wallet Lock Manager - Per-wallet Write Serialization
//!
//! One async mutex per distinct wallet id, created lazily on first
//! reference and kept for the process lifetime. At most one write
//! action per wallet has its external-process invocation in flight at
//! any instant; distinct wallets proceed fully concurrently, and reads
//! never touch this table at all.
//!
//! Entries are never evicted. Growth is bounded by the number of
//! distinct wallets seen, which stays small for a long-lived gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lazily-grown table of per-wallet exclusive locks.
#[derive(Default)]
pub struct WalletLockManager {
  locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl WalletLockManager {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fetch or create the lock for a wallet id.
  fn lock_for(&self, wallet_id: &str) -> Arc<tokio::sync::Mutex<()>> {
    let mut table = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
    table
      .entry(wallet_id.to_string())
      .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
      .clone()
  }

  /// Run `task` while holding the wallet's exclusive lock.
  ///
  /// Waiters are served in lock-arrival order; the lock is released
  /// unconditionally when the task completes.
  pub async fn run_locked<T>(&self, wallet_id: &str, task: impl Future<Output = T>) -> T {
    let lock = self.lock_for(wallet_id);
    let _guard = lock.lock().await;
    task.await
  }
}
