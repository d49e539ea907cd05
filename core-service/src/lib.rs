//! Core service façade and bootstrap helpers.
//!
//! This crate wires a host-provided record store into the preferences core.
//! Desktop apps typically enable the `desktop-shims` feature (on by default),
//! which persists preferences in SQLite through `bridge-desktop`. Other hosts
//! supply their own [`RecordStore`] through [`CoreDependencies`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::storage::RecordStore;
use core_preferences::{PreferencesRepository, UserPreferences};
use tracing::debug;

#[cfg(feature = "desktop-shims")]
use bridge_desktop::SqliteDataStore;
#[cfg(feature = "desktop-shims")]
use core_preferences::JsonPreferencesCodec;
#[cfg(feature = "desktop-shims")]
use core_runtime::config::CoreConfig;
#[cfg(feature = "desktop-shims")]
use tracing::info;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub preferences_store: Arc<dyn RecordStore<UserPreferences>>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(preferences_store: Arc<dyn RecordStore<UserPreferences>>) -> Self {
        Self { preferences_store }
    }

    pub fn builder() -> CoreDependenciesBuilder {
        CoreDependenciesBuilder::default()
    }
}

/// Collects bridge handles one at a time, for hosts that discover them
/// incrementally.
#[derive(Default)]
pub struct CoreDependenciesBuilder {
    preferences_store: Option<Arc<dyn RecordStore<UserPreferences>>>,
}

impl CoreDependenciesBuilder {
    pub fn preferences_store(mut self, store: Arc<dyn RecordStore<UserPreferences>>) -> Self {
        self.preferences_store = Some(store);
        self
    }

    /// Fails with [`CoreError::CapabilityMissing`] if a required bridge was
    /// never provided.
    pub fn build(self) -> Result<CoreDependencies> {
        let preferences_store =
            self.preferences_store
                .ok_or_else(|| CoreError::CapabilityMissing {
                    capability: "preferences_store".to_string(),
                    message: "No RecordStore for user preferences was provided".to_string(),
                })?;

        Ok(CoreDependencies::new(preferences_store))
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    deps: Arc<CoreDependencies>,
    preferences: PreferencesRepository,
}

impl CoreService {
    /// Create a new service from the provided dependencies.
    pub fn new(deps: CoreDependencies) -> Self {
        debug!("Initializing CoreService");
        let preferences = PreferencesRepository::new(Arc::clone(&deps.preferences_store));
        Self {
            deps: Arc::new(deps),
            preferences,
        }
    }

    /// The preferences repository backed by this service's store.
    pub fn preferences(&self) -> &PreferencesRepository {
        &self.preferences
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Opens (creating if needed) the SQLite database named by the config and
/// stores preferences as JSON under `config.store_name`.
///
/// ```no_run
/// # #[cfg(feature = "desktop-shims")]
/// # async fn example() -> core_service::Result<()> {
/// use core_runtime::config::CoreConfig;
/// use core_service::bootstrap_desktop;
///
/// let config = CoreConfig::builder()
///     .data_dir("/home/me/.local/share/tasks")
///     .build()?;
/// let core = bootstrap_desktop(&config).await?;
/// core.preferences().set_show_completed(true).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap_desktop(config: &CoreConfig) -> Result<CoreService> {
    config.validate()?;

    let store = SqliteDataStore::open(
        config.database_path.clone(),
        config.store_name.clone(),
        Arc::new(JsonPreferencesCodec),
    )
    .await
    .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

    info!(store = %config.store_name, "Preferences core ready");

    Ok(CoreService::new(CoreDependencies::new(Arc::new(store))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::storage::{RecordStream, UpdateFn};
    use futures::{future, stream};

    struct FixedStore(UserPreferences);

    #[async_trait]
    impl RecordStore<UserPreferences> for FixedStore {
        fn data(&self) -> RecordStream<UserPreferences> {
            Box::pin(stream::once(future::ready(Ok(self.0))))
        }

        async fn update(
            &self,
            transform: UpdateFn<UserPreferences>,
        ) -> BridgeResult<UserPreferences> {
            Ok(transform(self.0))
        }
    }

    #[tokio::test]
    async fn test_service_wires_repository_to_store() {
        let stored = UserPreferences::new(true, core_preferences::SortOrder::ByPriority);
        let deps = CoreDependencies::builder()
            .preferences_store(Arc::new(FixedStore(stored)))
            .build()
            .unwrap();
        let service = CoreService::new(deps);

        assert_eq!(service.preferences().current().await.unwrap(), stored);
        service.preferences().set_show_completed(false).await.unwrap();
        assert_eq!(Arc::strong_count(&service.dependencies()), 2);
    }
}
