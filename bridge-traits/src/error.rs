use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Stored data is corrupted: {0}")]
    Corrupted(String),

    #[error("Storage temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether a read that failed with this error may succeed if retried later.
    ///
    /// Only I/O-class faults qualify. Corruption, schema problems and
    /// programming errors will fail again the same way.
    pub fn is_transient(&self) -> bool {
        matches!(self, BridgeError::Io(_) | BridgeError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
