use thiserror::Error;

// === StorageError ===

/// Errors raised by the key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Storage database error: {0}")]
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    SerializationError(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The index does not address an element of the current list.
    #[error("Invalid bookmark index: {0}")]
    InvalidIndex(usize),
    /// Underlying storage failed.
    #[error("Bookmark storage error: {0}")]
    Storage(#[from] StorageError),
}

// === ExtractionError ===

/// Errors related to page content extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The page produced no readable text at all.
    #[error("Could not extract content: {0}")]
    Empty(String),
}

// === RemoteError ===

/// Errors related to calls to the summarization service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request could not be sent or the connection failed.
    #[error("Remote network error: {0}")]
    NetworkError(String),
    /// The service answered with a non-success status.
    #[error("Remote service returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body did not match the expected shape.
    #[error("Remote response decode error: {0}")]
    DecodeError(String),
    /// The service reported a failure in its JSON body.
    #[error("Remote service error: {0}")]
    ServiceError(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AgentError ===

/// Failures reported back across the command boundary.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No active page to extract from.
    #[error("No active tab found.")]
    NoActiveContext,
    /// The page is gone or produced nothing usable.
    #[error("Could not extract content: {0}")]
    ExtractionUnavailable(String),
    /// A call to the summarization service failed.
    #[error("Remote call failed: {0}")]
    RemoteCallFailure(String),
    /// Local storage failed.
    #[error("Storage failure: {0}")]
    Storage(String),
    /// The command itself was malformed or referenced nothing.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<RemoteError> for AgentError {
    fn from(e: RemoteError) -> Self {
        AgentError::RemoteCallFailure(e.to_string())
    }
}

impl From<ExtractionError> for AgentError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::Empty(msg) => AgentError::ExtractionUnavailable(msg),
        }
    }
}

impl From<StorageError> for AgentError {
    fn from(e: StorageError) -> Self {
        AgentError::Storage(e.to_string())
    }
}

impl From<BookmarkError> for AgentError {
    fn from(e: BookmarkError) -> Self {
        match e {
            BookmarkError::InvalidIndex(_) => AgentError::InvalidRequest(e.to_string()),
            BookmarkError::Storage(inner) => AgentError::Storage(inner.to_string()),
        }
    }
}

impl From<SettingsError> for AgentError {
    fn from(e: SettingsError) -> Self {
        AgentError::InvalidRequest(e.to_string())
    }
}
