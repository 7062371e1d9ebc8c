//! Error types for store operations.

use coldchain_canonical::{Digest, RecordIdError};
use coldchain_core::{CoreError, LedgerEvent};
use thiserror::Error;

use crate::record::ParseError;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error outside the journal itself.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] coldchain_journal::JournalError),
    /// The submitted transaction was rejected.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Record id could not be computed.
    #[error("record id: {0}")]
    RecordId(#[from] RecordIdError),
    /// Stored record could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// A record's content no longer hashes to its id.
    #[error("record at height {height} does not match its id {}", .record_id.b64)]
    Tampered {
        /// Height of the offending record.
        height: u64,
        /// Id the record claims.
        record_id: Digest,
    },
    /// `prev_record_id` does not name the preceding record.
    #[error("record at height {height} is not linked to its predecessor")]
    BrokenLink {
        /// Height of the offending record.
        height: u64,
        /// Id of the preceding record, if any.
        expected: Option<Digest>,
        /// Id the record links to.
        found: Option<Digest>,
    },
    /// Heights are not consecutive from 0.
    #[error("expected record at height {expected}, found height {found}")]
    HeightGap {
        /// Next height in sequence.
        expected: u64,
        /// Height the record carries.
        found: u64,
    },
    /// A journaled transaction failed when applied again.
    #[error("replay failed at height {height}: {source}")]
    Replay {
        /// Height of the offending record.
        height: u64,
        /// Rejection reported by the engine.
        source: CoreError,
    },
    /// A journaled transaction produced a different event when applied again.
    #[error("replay diverged at height {height}: recorded {recorded:?}, replayed {replayed:?}")]
    Diverged {
        /// Height of the offending record.
        height: u64,
        /// Event stored in the record.
        recorded: Box<LedgerEvent>,
        /// Event emitted on replay.
        replayed: Box<LedgerEvent>,
    },
    /// An earlier append failed; in-memory state is ahead of the store.
    #[error("ledger is poisoned by an earlier write failure; reopen it")]
    Poisoned,
}
