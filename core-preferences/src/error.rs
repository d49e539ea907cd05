use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreferencesError {
    /// Reading failed in a way a retry will not fix; ends the subscription
    #[error("Failed to read preferences: {0}")]
    Read(#[source] BridgeError),

    /// The atomic update failed; the stored preferences are unchanged
    #[error("Failed to write preferences: {0}")]
    Write(#[source] BridgeError),

    #[error("Preferences stream ended before producing a value")]
    StreamClosed,
}

pub type Result<T> = std::result::Result<T, PreferencesError>;
