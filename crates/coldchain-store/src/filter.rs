//! Record filtering for selective iteration.

use coldchain_canonical::Identity;
use coldchain_core::{LedgerEvent, Operation};

use crate::error::StoreError;
use crate::record::LedgerRecord;
use crate::traits::StoreReader;

/// Predicate over ledger records.
pub trait RecordFilter {
    /// Returns true if the record matches the filter criteria.
    fn matches(&self, record: &LedgerRecord) -> bool;
}

/// Filter by operation kind (`add_entity`, `add_vaccine_batch`, `issue_certificate`).
#[derive(Debug, Clone)]
pub struct OperationFilter {
    /// Operation kind to match.
    pub kind: String,
}

impl RecordFilter for OperationFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        record.transaction.operation.kind() == self.kind
    }
}

/// Filter by submitting identity.
#[derive(Debug, Clone)]
pub struct CallerFilter {
    /// Caller to match.
    pub caller: Identity,
}

impl RecordFilter for CallerFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        record.transaction.caller == self.caller
    }
}

/// Filter by height, both bounds inclusive.
#[derive(Debug, Clone, Default)]
pub struct HeightRangeFilter {
    /// Lowest height to include.
    pub from: Option<u64>,
    /// Highest height to include.
    pub to: Option<u64>,
}

impl RecordFilter for HeightRangeFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        self.from.map_or(true, |from| record.height >= from)
            && self.to.map_or(true, |to| record.height <= to)
    }
}

/// Records in which `participant` appears, as caller or as any party.
#[derive(Debug, Clone)]
pub struct ParticipantFilter {
    /// Identity to look for.
    pub participant: Identity,
}

impl RecordFilter for ParticipantFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        let p = self.participant;
        if record.transaction.caller == p {
            return true;
        }
        match &record.event {
            LedgerEvent::AddEntity { entity_id, .. } => *entity_id == p,
            LedgerEvent::AddVaccineBatch { manufacturer, .. } => *manufacturer == p,
            LedgerEvent::IssueCertificate { issuer, prover, .. } => *issuer == p || *prover == p,
        }
    }
}

/// Issued certificates linked to one batch.
#[derive(Debug, Clone)]
pub struct BatchFilter {
    /// Batch to match.
    pub batch: coldchain_core::BatchId,
}

impl RecordFilter for BatchFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        matches!(
            record.transaction.operation,
            Operation::IssueCertificate { batch: Some(b), .. } if b == self.batch
        )
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn RecordFilter>>,
}

impl RecordFilter for AndFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn RecordFilter>>,
}

impl RecordFilter for OrFilter {
    fn matches(&self, record: &LedgerRecord) -> bool {
        self.filters.iter().any(|f| f.matches(record))
    }
}

/// Reader that yields only the records `filter` accepts.
#[derive(Debug)]
pub struct FilteredReader<R: StoreReader, F: RecordFilter> {
    reader: R,
    filter: F,
}

impl<R: StoreReader, F: RecordFilter> FilteredReader<R, F> {
    /// Wraps `reader`.
    pub fn new(reader: R, filter: F) -> Self {
        Self { reader, filter }
    }
}

impl<R: StoreReader, F: RecordFilter> StoreReader for FilteredReader<R, F> {
    fn read_next(&mut self) -> Result<Option<LedgerRecord>, StoreError> {
        while let Some(record) = self.reader.read_next()? {
            if self.filter.matches(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}
