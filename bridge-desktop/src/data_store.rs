//! Record Storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{RecordCodec, RecordStore, RecordStream, UpdateFn},
};
use chrono::Utc;
use core_async::sync::{watch, Mutex};
use futures::stream;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};

const CREATE_RECORDS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        name TEXT PRIMARY KEY,
        payload BLOB NOT NULL,
        updated_at INTEGER NOT NULL
    )
"#;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_IOERR: i32 = 10;
const SQLITE_FULL: i32 = 13;
const SQLITE_CANTOPEN: i32 = 14;

const SELECT_PAYLOAD: &str = "SELECT payload FROM records WHERE name = ?";

const UPSERT_PAYLOAD: &str = r#"
    INSERT INTO records (name, payload, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(name) DO UPDATE SET
        payload = excluded.payload,
        updated_at = excluded.updated_at
"#;

/// SQLite-backed record store implementation
///
/// Persists one named record as an encoded blob:
/// - Single writer per store (in-process lock + SQL transaction)
/// - Change notifications published only after commit
/// - Cold, per-subscriber `data()` streams
///
/// Cloning is cheap and every clone shares the same writer lock and
/// subscribers.
pub struct SqliteDataStore<T> {
    inner: Arc<StoreInner<T>>,
}

struct StoreInner<T> {
    pool: SqlitePool,
    name: String,
    codec: Arc<dyn RecordCodec<T>>,
    write_lock: Mutex<()>,
    changes: watch::Sender<Option<T>>,
}

impl<T> Clone for SqliteDataStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SqliteDataStore<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Open (or create) the store `name` inside the database at `db_path`
    pub async fn open(
        db_path: PathBuf,
        name: impl Into<String>,
        codec: Arc<dyn RecordCodec<T>>,
    ) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            core_async::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::with_pool(pool, name.into(), codec).await?;

        debug!(path = ?db_path, store = %store.inner.name, "Initialized record store");

        Ok(store)
    }

    /// Create an in-memory record store (for testing)
    ///
    /// The pool is pinned to one long-lived connection; every connection to
    /// `sqlite::memory:` would otherwise see its own empty database.
    pub async fn in_memory(name: impl Into<String>, codec: Arc<dyn RecordCodec<T>>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(map_sqlx_error)?;

        Self::with_pool(pool, name.into(), codec).await
    }

    async fn with_pool(
        pool: SqlitePool,
        name: String,
        codec: Arc<dyn RecordCodec<T>>,
    ) -> Result<Self> {
        sqlx::query(CREATE_RECORDS_TABLE)
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)?;

        let (changes, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(StoreInner {
                pool,
                name,
                codec,
                write_lock: Mutex::new(()),
                changes,
            }),
        })
    }

    /// Name of the record this store manages
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of live `data()` subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.changes.receiver_count()
    }

    /// Close the underlying connection pool
    ///
    /// Reads fail with a transient error afterwards and updates fail outright.
    pub async fn close(&self) {
        self.inner.pool.close().await;
        debug!(store = %self.inner.name, "Closed record store");
    }
}

impl<T> StoreInner<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    async fn read_current(&self) -> Result<T> {
        let payload = sqlx::query_scalar::<_, Vec<u8>>(SELECT_PAYLOAD)
            .bind(self.name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(store = %self.name, stored = payload.is_some(), "Read record");
        self.materialize(payload)
    }

    fn materialize(&self, payload: Option<Vec<u8>>) -> Result<T> {
        match payload {
            Some(bytes) => self.codec.decode(&bytes).inspect_err(|err| {
                error!(store = %self.name, error = %err, "Failed to decode stored record");
            }),
            None => Ok(self.codec.default_value()),
        }
    }

    async fn apply(&self, transform: UpdateFn<T>) -> Result<T> {
        let _writer = self.write_lock.lock().await;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let payload = sqlx::query_scalar::<_, Vec<u8>>(SELECT_PAYLOAD)
            .bind(self.name.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let current = self.materialize(payload)?;
        let next = transform(current.clone());

        if next == current {
            debug!(store = %self.name, "Update left record unchanged");
            return Ok(current);
        }

        let encoded = self.codec.encode(&next)?;

        sqlx::query(UPSERT_PAYLOAD)
            .bind(self.name.as_str())
            .bind(encoded)
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        self.changes.send_replace(Some(next.clone()));

        debug!(store = %self.name, "Committed record update");
        Ok(next)
    }
}

/// Position of one `data()` subscriber
enum Feed<T> {
    Load {
        inner: Arc<StoreInner<T>>,
        changes: watch::Receiver<Option<T>>,
    },
    Follow {
        changes: watch::Receiver<Option<T>>,
        last: Option<T>,
    },
    Done,
}

#[async_trait]
impl<T> RecordStore<T> for SqliteDataStore<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn data(&self) -> RecordStream<T> {
        // Subscribe before the first read so no commit can slip between them.
        let changes = self.inner.changes.subscribe();
        let start = Feed::Load {
            inner: Arc::clone(&self.inner),
            changes,
        };

        Box::pin(stream::unfold(start, |feed| async move {
            match feed {
                Feed::Load { inner, changes } => match inner.read_current().await {
                    Ok(value) => Some((
                        Ok(value.clone()),
                        Feed::Follow {
                            changes,
                            last: Some(value),
                        },
                    )),
                    Err(err) if err.is_transient() => {
                        warn!(store = %inner.name, error = %err, "Transient read fault");
                        Some((Err(err), Feed::Follow { changes, last: None }))
                    }
                    Err(err) => Some((Err(err), Feed::Done)),
                },
                Feed::Follow { mut changes, last } => loop {
                    if changes.changed().await.is_err() {
                        return None;
                    }

                    let latest = changes.borrow_and_update().clone();
                    if let Some(value) = latest {
                        if last.as_ref() != Some(&value) {
                            return Some((
                                Ok(value.clone()),
                                Feed::Follow {
                                    changes,
                                    last: Some(value),
                                },
                            ));
                        }
                    }
                },
                Feed::Done => None,
            }
        }))
    }

    async fn update(&self, transform: UpdateFn<T>) -> Result<T> {
        self.inner.apply(transform).await.inspect_err(|err| {
            error!(store = %self.inner.name, error = %err, "Record update failed");
        })
    }
}

fn map_sqlx_error(err: sqlx::Error) -> BridgeError {
    match err {
        sqlx::Error::Io(io) => BridgeError::Io(io),
        sqlx::Error::PoolTimedOut => {
            BridgeError::Unavailable("Timed out acquiring a database connection".to_string())
        }
        sqlx::Error::PoolClosed => {
            BridgeError::Unavailable("Database connection pool is closed".to_string())
        }
        sqlx::Error::Database(db) => map_database_error(&*db),
        other => BridgeError::DatabaseError(other.to_string()),
    }
}

/// Classify a SQLite result code by its primary code (low byte of the
/// extended code).
fn map_database_error(db: &dyn sqlx::error::DatabaseError) -> BridgeError {
    let primary = db
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| code & 0xff);
    let message = db.message().to_string();

    match primary {
        Some(SQLITE_BUSY | SQLITE_LOCKED | SQLITE_CANTOPEN) => BridgeError::Unavailable(message),
        Some(SQLITE_IOERR | SQLITE_FULL) => BridgeError::Io(io::Error::other(message)),
        _ => BridgeError::DatabaseError(format!(
            "{} (code: {})",
            message,
            db.code().unwrap_or_default()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockall::mock;
    use uuid::Uuid;

    struct TextCodec;

    impl RecordCodec<String> for TextCodec {
        fn default_value(&self) -> String {
            "empty".to_string()
        }

        fn decode(&self, bytes: &[u8]) -> Result<String> {
            String::from_utf8(bytes.to_vec()).map_err(|e| BridgeError::Corrupted(e.to_string()))
        }

        fn encode(&self, value: &String) -> Result<Vec<u8>> {
            Ok(value.as_bytes().to_vec())
        }
    }

    mock! {
        Codec {}

        impl RecordCodec<String> for Codec {
            fn default_value(&self) -> String;
            fn decode(&self, bytes: &[u8]) -> Result<String>;
            fn encode(&self, value: &String) -> Result<Vec<u8>>;
        }
    }

    async fn text_store() -> SqliteDataStore<String> {
        SqliteDataStore::in_memory("text", Arc::new(TextCodec))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_read_yields_default() {
        let store = text_store().await;
        let mut data = store.data();

        assert_eq!(data.next().await.unwrap().unwrap(), "empty");
        assert_eq!(store.name(), "text");
    }

    #[tokio::test]
    async fn test_update_persists_and_notifies() {
        let store = text_store().await;
        let mut data = store.data();
        assert_eq!(data.next().await.unwrap().unwrap(), "empty");

        let stored = store
            .update(Box::new(|current| format!("{}+a", current)))
            .await
            .unwrap();
        assert_eq!(stored, "empty+a");
        assert_eq!(data.next().await.unwrap().unwrap(), "empty+a");

        let mut late = store.data();
        assert_eq!(late.next().await.unwrap().unwrap(), "empty+a");
    }

    #[tokio::test]
    async fn test_unchanged_update_is_not_published() {
        let store = text_store().await;
        let mut data = store.data();
        assert_eq!(data.next().await.unwrap().unwrap(), "empty");

        let stored = store.update(Box::new(|current| current)).await.unwrap();
        assert_eq!(stored, "empty");

        store
            .update(Box::new(|_| "changed".to_string()))
            .await
            .unwrap();
        assert_eq!(data.next().await.unwrap().unwrap(), "changed");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_serialized() {
        let store = SqliteDataStore::in_memory("text", Arc::new(TextCodec))
            .await
            .unwrap();
        store.update(Box::new(|_| String::new())).await.unwrap();

        let mut handles = vec![];
        for _ in 0..16 {
            let store = store.clone();
            handles.push(core_async::spawn(async move {
                store
                    .update(Box::new(|current| format!("{}x", current)))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut data = store.data();
        assert_eq!(data.next().await.unwrap().unwrap(), "x".repeat(16));
    }

    #[tokio::test]
    async fn test_dropping_stream_releases_subscription() {
        let store = text_store().await;
        let data = store.data();
        assert_eq!(store.subscriber_count(), 1);

        drop(data);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let db_path = std::env::temp_dir()
            .join(format!("bridge-desktop-test-{}", Uuid::new_v4()))
            .join("prefs.db");

        let store = SqliteDataStore::open(db_path.clone(), "text", Arc::new(TextCodec))
            .await
            .unwrap();
        store
            .update(Box::new(|_| "persisted".to_string()))
            .await
            .unwrap();
        store.close().await;
        drop(store);

        let reopened = SqliteDataStore::open(db_path.clone(), "text", Arc::new(TextCodec))
            .await
            .unwrap();
        let mut data = reopened.data();
        assert_eq!(data.next().await.unwrap().unwrap(), "persisted");

        reopened.close().await;
        if let Some(dir) = db_path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[tokio::test]
    async fn test_records_are_isolated_by_name() {
        let db_path = std::env::temp_dir()
            .join(format!("bridge-desktop-test-{}", Uuid::new_v4()))
            .join("prefs.db");

        let first = SqliteDataStore::open(db_path.clone(), "first", Arc::new(TextCodec))
            .await
            .unwrap();
        let second = SqliteDataStore::open(db_path.clone(), "second", Arc::new(TextCodec))
            .await
            .unwrap();

        first.update(Box::new(|_| "one".to_string())).await.unwrap();

        assert_eq!(second.data().next().await.unwrap().unwrap(), "empty");
        assert_eq!(first.data().next().await.unwrap().unwrap(), "one");

        first.close().await;
        second.close().await;
        if let Some(dir) = db_path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[tokio::test]
    async fn test_corrupted_record_ends_stream() {
        let mut codec = MockCodec::new();
        codec
            .expect_default_value()
            .returning(|| "empty".to_string());
        codec.expect_encode().returning(|_| Ok(vec![0xFF]));
        codec
            .expect_decode()
            .returning(|_| Err(BridgeError::Corrupted("unreadable payload".to_string())));

        let store = SqliteDataStore::in_memory("mocked", Arc::new(codec))
            .await
            .unwrap();
        store
            .update(Box::new(|_| "anything".to_string()))
            .await
            .unwrap();

        let mut data = store.data();
        let err = data.next().await.unwrap().unwrap_err();
        assert!(matches!(err, BridgeError::Corrupted(_)));
        assert!(!err.is_transient());
        assert!(data.next().await.is_none());
    }

    /// Opens a second connection that holds an exclusive write lock on the
    /// database until it is closed.
    async fn lock_exclusively(db_path: &std::path::Path) -> sqlx::SqliteConnection {
        use sqlx::sqlite::SqliteLockingMode;
        use sqlx::ConnectOptions;

        let mut conn = SqliteConnectOptions::new()
            .filename(db_path)
            .locking_mode(SqliteLockingMode::Exclusive)
            .connect()
            .await
            .unwrap();
        sqlx::query("BEGIN EXCLUSIVE")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("UPDATE records SET updated_at = updated_at + 1")
            .execute(&mut conn)
            .await
            .unwrap();
        conn
    }

    #[tokio::test]
    async fn test_locked_database_read_is_transient_and_stream_survives() {
        use sqlx::Connection;

        let db_path = std::env::temp_dir()
            .join(format!("bridge-desktop-test-{}", Uuid::new_v4()))
            .join("prefs.db");
        let store = SqliteDataStore::open(db_path.clone(), "text", Arc::new(TextCodec))
            .await
            .unwrap();
        store
            .update(Box::new(|_| "stored".to_string()))
            .await
            .unwrap();

        let locker = lock_exclusively(&db_path).await;

        let mut data = store.data();
        let err = data.next().await.unwrap().unwrap_err();
        assert!(
            matches!(err, BridgeError::Unavailable(_)),
            "unexpected error: {err:?}"
        );
        assert!(err.is_transient());

        locker.close().await.unwrap();

        store
            .update(Box::new(|_| "after lock".to_string()))
            .await
            .unwrap();
        assert_eq!(data.next().await.unwrap().unwrap(), "after lock");

        store.close().await;
        if let Some(dir) = db_path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[tokio::test]
    async fn test_closed_pool_reads_are_transient_and_writes_fail() {
        let store = text_store().await;
        store.close().await;

        let mut data = store.data();
        let err = data.next().await.unwrap().unwrap_err();
        assert!(err.is_transient());

        let write = store.update(Box::new(|_| "lost".to_string())).await;
        assert!(write.is_err());
    }
}
