//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `RecordStore` using a SQLite-backed record table ([`SqliteDataStore`])
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::SqliteDataStore;
//! use bridge_traits::RecordStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SqliteDataStore::open("prefs.db".into(), "user_preferences", Arc::new(MyCodec))
//!         .await
//!         .expect("open store");
//!
//!     // Hand `Arc::new(store)` to the core as its RecordStore
//! }
//! ```

mod data_store;

pub use data_store::SqliteDataStore;
