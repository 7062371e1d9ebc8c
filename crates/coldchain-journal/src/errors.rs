use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (reserved bytes or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Record payload is not UTF-8.
    #[error("invalid UTF-8 in record payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Record payload is not JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    /// Record payload is JSON but not a ledger record.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// Existing file is shorter than a header.
    #[error("file is not empty but too short to hold a journal header")]
    FileNotEmpty,
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
}
