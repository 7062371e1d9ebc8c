//! Typed ledger records.

use coldchain_canonical::{compute_record_id, Canonicalizer, Digest};
use coldchain_core::{LedgerEvent, Transaction};
use coldchain_journal::RecordJson;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;

/// Error that can occur when decoding a stored record.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON deserialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// One committed transaction, chained to its predecessor.
///
/// `record_id` is the content hash of every other field, so editing any of
/// them (including `prev_record_id`) breaks the chain from that record on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Content-derived id.
    pub record_id: Digest,
    /// Id of the record at `height - 1`; `None` for the first record.
    pub prev_record_id: Option<Digest>,
    /// Position in the ledger, from 0.
    pub height: u64,
    /// Submitted transaction.
    pub transaction: Transaction,
    /// Event the transaction emitted.
    pub event: LedgerEvent,
}

/// Hashed view of a record: everything but its id.
#[derive(Serialize)]
struct RecordBody<'a> {
    prev_record_id: &'a Option<Digest>,
    height: u64,
    transaction: &'a Transaction,
    event: &'a LedgerEvent,
}

impl LedgerRecord {
    /// Builds the record and computes its id.
    pub fn seal(
        prev_record_id: Option<Digest>,
        height: u64,
        transaction: Transaction,
        event: LedgerEvent,
        canonicalizer: &Canonicalizer,
    ) -> Result<Self, StoreError> {
        let record_id = compute_record_id(
            &RecordBody {
                prev_record_id: &prev_record_id,
                height,
                transaction: &transaction,
                event: &event,
            },
            canonicalizer,
        )?;
        Ok(Self {
            record_id,
            prev_record_id,
            height,
            transaction,
            event,
        })
    }

    /// Recomputes the id and compares it with `record_id`.
    pub fn verify_id(&self, canonicalizer: &Canonicalizer) -> Result<bool, StoreError> {
        Ok(compute_record_id(self, canonicalizer)? == self.record_id)
    }

    /// JSON payload as written to the journal.
    pub fn to_json(&self) -> Result<RecordJson, StoreError> {
        serde_json::to_value(self).map_err(|e| StoreError::Parse(e.into()))
    }
}

/// Decodes a journal payload into a [`LedgerRecord`].
pub fn parse_record(json: &RecordJson) -> Result<LedgerRecord, ParseError> {
    Ok(LedgerRecord::deserialize(json)?)
}
