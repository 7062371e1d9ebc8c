//! Append-only framed journal for cold-chain ledger records.
//!
//! A journal file is a 16-byte `CCJ1` header followed by length-prefixed
//! frames, each carrying one ledger record as UTF-8 JSON. Frames are only
//! ever appended; readers skip frame kinds they do not know.
//!
//! ```rust
//! use coldchain_canonical::{compute_record_id, Canonicalizer};
//! use coldchain_journal::{verify_record_id, JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("ledger.ccj");
//! let canonicalizer = Canonicalizer::new();
//!
//! let mut record = json!({
//!     "height": 0,
//!     "prev_record_id": null,
//!     "transaction": { "caller": "0x00000000000000000000000000000000000000ad" },
//!     "event": { "event": "AddEntity" }
//! });
//! record["record_id"] = serde_json::to_value(compute_record_id(&record, &canonicalizer)?)?;
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_record(&record)?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! let read = reader.read_record()?.expect("one record");
//! assert!(verify_record_id(&read, &canonicalizer)?);
//! assert!(reader.read_record()?.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// File header and frame layout.
pub mod frame;
/// Journal reader.
pub mod reader;
/// Record payload type and structural checks.
pub mod record;
/// Record id verification.
pub mod verification;
/// Journal writer.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use record::RecordJson;
pub use verification::verify_record_id;
pub use writer::{JournalWriter, WriteOptions};
