//! Desktop bootstrap against a real SQLite file.

#![cfg(feature = "desktop-shims")]

use core_preferences::{SortOrder, UserPreferences};
use core_runtime::config::CoreConfig;
use core_service::{bootstrap_desktop, CoreDependencies, CoreError, CoreService};
use futures::StreamExt;
use std::path::PathBuf;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("task-prefs-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_bootstrap_persists_across_restarts() {
    let dir = scratch_dir();
    let config = CoreConfig::builder().data_dir(&dir).build().unwrap();

    {
        let core = bootstrap_desktop(&config).await.unwrap();
        let prefs = core.preferences();
        let mut observed = prefs.preferences();
        assert_eq!(
            observed.next().await.unwrap().unwrap(),
            UserPreferences::default()
        );

        prefs.enable_sort_by_deadline(true).await.unwrap();
        prefs.enable_sort_by_priority(true).await.unwrap();
        prefs.enable_sort_by_deadline(false).await.unwrap();
        prefs.set_show_completed(true).await.unwrap();
    }

    let core = bootstrap_desktop(&config).await.unwrap();
    assert_eq!(
        core.preferences().current().await.unwrap(),
        UserPreferences::new(true, SortOrder::ByPriority)
    );

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_store_names_are_isolated() {
    let dir = scratch_dir();
    let work = CoreConfig::builder()
        .data_dir(&dir)
        .store_name("work")
        .build()
        .unwrap();
    let home = CoreConfig::builder()
        .data_dir(&dir)
        .store_name("home")
        .build()
        .unwrap();

    let work_core = bootstrap_desktop(&work).await.unwrap();
    work_core
        .preferences()
        .enable_sort_by_priority(true)
        .await
        .unwrap();

    let home_core = bootstrap_desktop(&home).await.unwrap();
    assert_eq!(
        home_core.preferences().current().await.unwrap(),
        UserPreferences::default()
    );

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_bootstrap_rejects_invalid_config() {
    let config = CoreConfig {
        database_path: scratch_dir().join("prefs.db"),
        store_name: "not valid".to_string(),
    };

    let err = bootstrap_desktop(&config).await.err().unwrap();
    assert!(matches!(err, CoreError::Runtime(_)));
}

#[tokio::test]
async fn test_services_share_store_through_dependencies() {
    let dir = scratch_dir();
    let config = CoreConfig::builder().data_dir(&dir).build().unwrap();
    let core = bootstrap_desktop(&config).await.unwrap();

    let sibling = CoreService::new(CoreDependencies::new(
        core.dependencies().preferences_store.clone(),
    ));
    sibling.preferences().set_show_completed(true).await.unwrap();

    assert!(core.preferences().current().await.unwrap().show_completed);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_builder_requires_preferences_store() {
    let err = CoreDependencies::builder().build().err().unwrap();
    assert!(matches!(
        err,
        CoreError::CapabilityMissing { ref capability, .. } if capability == "preferences_store"
    ));
}
