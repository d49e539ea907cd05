//! JSON encoding of stored preferences
//!
//! Stored form:
//!
//! ```text
//! {"show_completed":false,"sort_order":"BY_DEADLINE"}
//! ```
//!
//! Missing fields decode to their defaults and an unrecognized `sort_order`
//! (unknown name or not a string at all) decodes to `NONE`. Anything that is
//! not a JSON object, or a `show_completed` that is not a boolean, is
//! corruption.

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::storage::RecordCodec;

use crate::models::UserPreferences;

/// [`RecordCodec`] for [`UserPreferences`] backed by `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPreferencesCodec;

impl RecordCodec<UserPreferences> for JsonPreferencesCodec {
    fn default_value(&self) -> UserPreferences {
        UserPreferences::default()
    }

    fn decode(&self, bytes: &[u8]) -> Result<UserPreferences> {
        serde_json::from_slice(bytes)
            .map_err(|e| BridgeError::Corrupted(format!("Invalid preferences payload: {}", e)))
    }

    fn encode(&self, value: &UserPreferences) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to encode preferences: {}", e)))
    }
}
