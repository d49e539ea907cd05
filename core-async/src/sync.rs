//! Synchronization primitives.
//!
//! All primitives are Tokio's async-aware types: `Send + Sync`, safe to share
//! across tasks, and they never block the executor thread.
//!
//! Storage adapters use:
//! - [`Mutex`] to serialize read-modify-write cycles against one record
//! - [`watch`] to publish the latest committed record to every subscriber
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::Mutex;
//!
//! async fn example() {
//!     let write_lock = Mutex::new(());
//!     let _guard = write_lock.lock().await;
//!     // critical section
//! }
//! ```

pub use tokio::sync::{watch, Mutex, MutexGuard};
