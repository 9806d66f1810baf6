/// Errors from the persistence adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Network, transport, or non-validation HTTP failure. Recoverable;
    /// the engine falls back to the local cache or absorbs it on writes.
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote store rejected the payload (HTTP 400/422).
    #[error("Remote store rejected the request: {0}")]
    Validation(String),

    /// A payload could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local fallback store I/O failure.
    #[error("Fallback store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
