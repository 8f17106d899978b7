use serde_json::Value;
use thiserror::Error;

/// Defines the error types surfaced by the future-returning scanner API.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The native layer answered through the error callback. The payload is verbatim.
    #[error("native error: {0}")]
    Native(Value),

    #[error("dispatcher is not running")]
    Unavailable,

    #[error("dispatcher queue is full")]
    QueueFull,

    /// The bridge dropped both callbacks without invoking either of them.
    #[error("bridge dropped the command without answering")]
    Dropped,

    #[error("Scan is already in progress")]
    ScanInProgress,

    #[error("failed to decode native payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("bridge I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
