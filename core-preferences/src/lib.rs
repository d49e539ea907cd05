//! # Task Preferences Module
//!
//! Owns the user's task-list preferences and the rules for changing them.
//!
//! ## Overview
//!
//! This module manages:
//! - The preference model ([`UserPreferences`], [`SortOrder`])
//! - The two sort facets (deadline, priority) packed into one [`SortOrder`]
//! - The persisted JSON representation ([`JsonPreferencesCodec`])
//! - [`PreferencesRepository`]: a live preferences stream plus atomic
//!   mutations on top of any [`RecordStore`](bridge_traits::RecordStore)

pub mod codec;
pub mod error;
pub mod models;
pub mod repository;

pub use codec::JsonPreferencesCodec;
pub use error::{PreferencesError, Result};
pub use models::{ParseSortOrderError, SortFacets, SortOrder, UserPreferences};
pub use repository::{PreferencesRepository, PreferencesStream};
