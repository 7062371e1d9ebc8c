//! Ledger records for the cold-chain custody ledger.
//!
//! This crate provides:
//! - [`LedgerRecord`]: a committed transaction, its event, and a content id
//!   chained to the previous record
//! - `StoreWriter` and `StoreReader` traits with journal-backed and
//!   in-memory implementations
//! - [`Ledger`]: apply-then-append over a [`ColdChain`](coldchain_core::ColdChain),
//!   and replay of an existing store
//! - [`verify_chain`] and record filters for audits

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Record filtering API.
pub mod filter;
/// Journal-backed and in-memory storage.
pub mod journal;
/// Ledger over a record store.
pub mod ledger;
/// Typed record parsing.
pub mod record;
/// Storage backend traits.
pub mod traits;
/// Hash-chain verification.
pub mod verify;
/// Views over the record history.
pub mod view;

pub use coldchain_journal::{ReadMode, RecordJson, WriteOptions};
pub use error::StoreError;
pub use filter::{
    AndFilter, BatchFilter, CallerFilter, FilteredReader, HeightRangeFilter, OperationFilter,
    OrFilter, ParticipantFilter, RecordFilter,
};
pub use journal::{JournalBackendReader, JournalBackendWriter, MemoryStore};
pub use ledger::Ledger;
pub use record::{parse_record, LedgerRecord, ParseError};
pub use traits::{StoreReader, StoreWriter};
pub use verify::{verify_chain, ChainReport, ChainVerifier};
pub use view::{custody_trail, resolve_certificate, CustodyStep};
