//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the preferences core and
//! platform-specific storage. Each trait represents a capability the core
//! requires but that must be implemented differently per platform.
//!
//! ## Traits
//!
//! ### Storage
//! - [`RecordStore`](storage::RecordStore) - Durable, observable storage for one structured record
//! - [`RecordCodec`](storage::RecordCodec) - Byte format of a stored record
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ SQLite |
//! | Android  | TBD                 | 📋 Planned |
//! | iOS      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Read
//! faults must be classified so the core can tell a transient I/O problem
//! (recoverable, see [`BridgeError::is_transient`](error::BridgeError::is_transient))
//! from corruption or programming errors (fatal to the subscriber).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent usage
//! across async tasks.

pub mod error;
pub mod logging;
pub mod storage;

pub use error::BridgeError;

pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::{RecordCodec, RecordStore, RecordStream, UpdateFn};
