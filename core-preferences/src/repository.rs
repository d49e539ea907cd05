//! Preferences repository
//!
//! The single entry point the UI uses to observe and change preferences.
//! The repository keeps no copy of the preferences: every mutation is one
//! atomic read-modify-write on the underlying [`RecordStore`], and the
//! observable stream is a projection of the store's change feed.
//!
//! ## Example
//!
//! ```no_run
//! use core_preferences::{PreferencesRepository, UserPreferences};
//! use futures::StreamExt;
//! # use bridge_traits::RecordStore;
//! # use std::sync::Arc;
//! # async fn example(store: Arc<dyn RecordStore<UserPreferences>>) -> core_preferences::Result<()> {
//! let repository = PreferencesRepository::new(store);
//!
//! let mut preferences = repository.preferences();
//! repository.enable_sort_by_deadline(true).await?;
//!
//! while let Some(update) = preferences.next().await {
//!     let prefs = update?;
//!     println!("sort by {}", prefs.sort_order);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{PreferencesError, Result};
use crate::models::UserPreferences;
use bridge_traits::storage::RecordStore;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Live preferences as seen by one subscriber
pub type PreferencesStream = BoxStream<'static, Result<UserPreferences>>;

/// Reads and updates the user's task-list preferences
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct PreferencesRepository {
    store: Arc<dyn RecordStore<UserPreferences>>,
}

impl PreferencesRepository {
    pub fn new(store: Arc<dyn RecordStore<UserPreferences>>) -> Self {
        debug!("Initializing PreferencesRepository");
        Self { store }
    }

    /// Subscribe to the current preferences
    ///
    /// Emits the stored preferences, then again after every change. A
    /// transient read fault is reported as [`UserPreferences::default()`]
    /// and the stream keeps going; any other read fault is yielded as
    /// [`PreferencesError::Read`] and ends the stream. Dropping the stream
    /// unsubscribes.
    pub fn preferences(&self) -> PreferencesStream {
        let records = self.store.data();

        Box::pin(stream::unfold(Some(records), |records| async move {
            let mut records = records?;
            match records.next().await? {
                Ok(prefs) => Some((Ok(prefs), Some(records))),
                Err(err) if err.is_transient() => {
                    warn!(error = %err, "Error reading preferences, using defaults");
                    Some((Ok(UserPreferences::default()), Some(records)))
                }
                Err(err) => {
                    error!(error = %err, "Unrecoverable error reading preferences");
                    Some((Err(PreferencesError::Read(err)), None))
                }
            }
        }))
    }

    /// The preferences as they are right now
    pub async fn current(&self) -> Result<UserPreferences> {
        self.preferences()
            .next()
            .await
            .unwrap_or(Err(PreferencesError::StreamClosed))
    }

    pub async fn set_show_completed(&self, show: bool) -> Result<()> {
        self.edit("show_completed", move |prefs| prefs.with_show_completed(show))
            .await
    }

    pub async fn enable_sort_by_deadline(&self, enable: bool) -> Result<()> {
        self.edit("sort_by_deadline", move |prefs| {
            prefs.with_sort_by_deadline(enable)
        })
        .await
    }

    pub async fn enable_sort_by_priority(&self, enable: bool) -> Result<()> {
        self.edit("sort_by_priority", move |prefs| {
            prefs.with_sort_by_priority(enable)
        })
        .await
    }

    async fn edit<F>(&self, facet: &'static str, transform: F) -> Result<()>
    where
        F: FnOnce(UserPreferences) -> UserPreferences + Send + 'static,
    {
        let stored = self
            .store
            .update(Box::new(transform))
            .await
            .map_err(|err| {
                error!(facet, error = %err, "Failed to update preferences");
                PreferencesError::Write(err)
            })?;

        debug!(
            facet,
            show_completed = stored.show_completed,
            sort_order = %stored.sort_order,
            "Updated preferences"
        );
        Ok(())
    }
}
