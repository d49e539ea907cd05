//! Async abstraction layer for the task preferences core.
//!
//! Every crate in the workspace reaches the executor through this crate
//! instead of depending on Tokio directly. Storage adapters use the
//! re-exported [`sync`] primitives for their single-writer lock and change
//! notifications; the logging layer uses [`runtime`] to forward events to a
//! host sink from outside an async context.
//!
//! # Modules
//!
//! - `task`: Task spawning
//! - `fs`: Directory creation for storage adapters
//! - `sync`: Synchronization primitives (Mutex, watch channels)
//! - `runtime`: Executor handles and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::watch;
//!
//! let (tx, rx) = watch::channel(0u32);
//! tx.send_replace(1);
//! assert_eq!(*rx.borrow(), 1);
//! ```

pub mod fs;
pub mod runtime;
pub mod sync;
pub mod task;

pub use task::spawn;
