//! Adapters Module - Outer-ring I/O
//!
//! Concrete bindings to the outside world: the tokio process executor
//! behind the `CommandRunner` port, and the line-oriented stdio bridge
//! that fronts the runner for automation callers.

pub mod bridge;
pub mod process;
