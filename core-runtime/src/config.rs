//! # Core Configuration Module
//!
//! Provides configuration management for the task preferences core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! that says where preferences are persisted. It enforces fail-fast validation
//! so a bad path or store name is reported before any storage is opened.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/path/to/preferences.db")
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert_eq!(config.store_name, "user_preferences");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates every value and returns actionable messages:
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Panics: no database path was given
//! let config = CoreConfig::builder()
//!     .store_name("user_preferences")
//!     .build()
//!     .expect("Should fail - missing database path");
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the record holding the user's preferences
pub const DEFAULT_STORE_NAME: &str = "user_preferences";

/// File created inside a data directory given to [`CoreConfigBuilder::data_dir`]
pub const DEFAULT_DATABASE_FILE: &str = "preferences.db";

/// Core configuration for the task preferences core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Path to the SQLite database file holding the preferences record
    pub database_path: PathBuf,

    /// Name of the preferences record inside the database
    pub store_name: String,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Store name is not empty and only uses ASCII letters, digits and `_`
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if self.store_name.is_empty() {
            return Err(Error::Config("Store name cannot be empty".to_string()));
        }

        if !self
            .store_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::Config(format!(
                "Store name '{}' may only contain ASCII letters, digits and '_'",
                self.store_name
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    store_name: Option<String>,
}

impl CoreConfigBuilder {
    /// Sets the path to the SQLite database file.
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Places the database as [`DEFAULT_DATABASE_FILE`] inside `dir`.
    pub fn data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.database_path = Some(dir.as_ref().join(DEFAULT_DATABASE_FILE));
        self
    }

    /// Sets the name of the preferences record.
    ///
    /// Defaults to [`DEFAULT_STORE_NAME`].
    pub fn store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - No database path (or data directory) was set
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let database_path = self.database_path.ok_or_else(|| {
            Error::Config(
                "Database path is required. Use .database_path() or .data_dir() to set it."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            database_path,
            store_name: self
                .store_name
                .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}
