//! Filesystem helpers for storage adapters.
//!
//! Async wrappers so adapters can prepare their data directories without
//! blocking the executor thread.

pub use tokio::fs::create_dir_all;
