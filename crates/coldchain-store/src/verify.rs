//! Hash-chain verification.

use coldchain_canonical::{Canonicalizer, Digest};

use crate::error::StoreError;
use crate::record::LedgerRecord;
use crate::traits::StoreReader;

/// Summary of a verified chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    /// Number of records checked.
    pub records: u64,
    /// Id of the last record; `None` for an empty ledger.
    pub tip: Option<Digest>,
}

/// Incremental checker: feed records in order, one at a time.
#[derive(Debug, Clone, Default)]
pub struct ChainVerifier {
    canonicalizer: Canonicalizer,
    next_height: u64,
    tip: Option<Digest>,
}

impl ChainVerifier {
    /// Verifier expecting the record at height 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks height, linkage and id of `record`, then advances.
    pub fn check(&mut self, record: &LedgerRecord) -> Result<(), StoreError> {
        if record.height != self.next_height {
            return Err(StoreError::HeightGap {
                expected: self.next_height,
                found: record.height,
            });
        }
        if record.prev_record_id != self.tip {
            return Err(StoreError::BrokenLink {
                height: record.height,
                expected: self.tip.clone(),
                found: record.prev_record_id.clone(),
            });
        }
        if !record.verify_id(&self.canonicalizer)? {
            return Err(StoreError::Tampered {
                height: record.height,
                record_id: record.record_id.clone(),
            });
        }

        self.next_height += 1;
        self.tip = Some(record.record_id.clone());
        Ok(())
    }

    /// Records accepted so far.
    pub fn records(&self) -> u64 {
        self.next_height
    }

    /// Id of the last accepted record.
    pub fn tip(&self) -> Option<&Digest> {
        self.tip.as_ref()
    }

    /// Finishes into a report.
    pub fn into_report(self) -> ChainReport {
        ChainReport {
            records: self.next_height,
            tip: self.tip,
        }
    }
}

/// Reads every record from `reader` and verifies the chain.
///
/// Stops at the first violation. Transactions are not re-applied; see
/// [`Ledger::replay`](crate::Ledger::replay) for that.
pub fn verify_chain<R: StoreReader>(mut reader: R) -> Result<ChainReport, StoreError> {
    let mut verifier = ChainVerifier::new();
    while let Some(record) = reader.read_next()? {
        verifier.check(&record)?;
    }
    tracing::debug!(records = verifier.records(), "chain verified");
    Ok(verifier.into_report())
}
