//! Structured Record Storage Abstractions
//!
//! Provides platform-agnostic traits for persisting a single structured record
//! (such as the user's preferences) and observing it as it changes.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

/// Transform applied by [`RecordStore::update`] to the current record.
pub type UpdateFn<T> = Box<dyn FnOnce(T) -> T + Send>;

/// Continuous stream of record values produced by [`RecordStore::data`].
pub type RecordStream<T> = BoxStream<'static, Result<T>>;

/// Byte codec for a stored record
///
/// The store owns the bytes; the codec owns the format. Implementations must
/// round-trip exactly: `decode(&encode(v)?)? == v`.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::RecordCodec;
///
/// struct CounterCodec;
///
/// impl RecordCodec<u64> for CounterCodec {
///     fn default_value(&self) -> u64 {
///         0
///     }
///
///     fn decode(&self, bytes: &[u8]) -> Result<u64> {
///         let raw: [u8; 8] = bytes
///             .try_into()
///             .map_err(|_| BridgeError::Corrupted("expected 8 bytes".to_string()))?;
///         Ok(u64::from_le_bytes(raw))
///     }
///
///     fn encode(&self, value: &u64) -> Result<Vec<u8>> {
///         Ok(value.to_le_bytes().to_vec())
///     }
/// }
/// ```
pub trait RecordCodec<T>: Send + Sync {
    /// Value materialized when nothing has been stored yet
    fn default_value(&self) -> T;

    /// Decode a stored payload
    ///
    /// Payloads that cannot be understood must be reported as
    /// [`BridgeError::Corrupted`](crate::error::BridgeError::Corrupted).
    fn decode(&self, bytes: &[u8]) -> Result<T>;

    /// Encode a value for storage
    fn encode(&self, value: &T) -> Result<Vec<u8>>;
}

/// Durable, observable storage for one structured record
///
/// Abstracts platform-specific structured preference storage:
/// - Android: DataStore
/// - iOS: a plist or Core Data entity
/// - Desktop: SQLite (see `bridge-desktop`)
///
/// # Semantics
///
/// - [`data`](RecordStore::data) is cold: every call yields a fresh stream
///   whose first item is the current stored value, followed by one item per
///   committed change. Consecutive duplicates are not repeated.
/// - A transient read fault ([`BridgeError::is_transient`]) is yielded as an
///   `Err` item and the stream keeps following changes. Any other read fault
///   is yielded as an `Err` item and ends the stream.
/// - Dropping a stream releases its subscription.
/// - [`update`](RecordStore::update) is an atomic read-modify-write. Updates
///   against the same store never interleave, so a transform always sees the
///   value committed by the previous one. On failure nothing is written.
///
/// [`BridgeError::is_transient`]: crate::error::BridgeError::is_transient
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::RecordStore;
/// use futures::StreamExt;
///
/// async fn bump(store: &dyn RecordStore<u64>) -> Result<u64> {
///     store.update(Box::new(|current| current + 1)).await
/// }
///
/// async fn watch(store: &dyn RecordStore<u64>) {
///     let mut values = store.data();
///     while let Some(value) = values.next().await {
///         println!("counter: {:?}", value);
///     }
/// }
/// ```
#[async_trait]
pub trait RecordStore<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Subscribe to the stored record
    fn data(&self) -> RecordStream<T>;

    /// Atomically replace the record with `transform(current)`
    ///
    /// # Returns
    ///
    /// The value that is stored once the call completes. If the transform
    /// returns a value equal to the current one, nothing is written and no
    /// change is published.
    async fn update(&self, transform: UpdateFn<T>) -> Result<T>;
}
