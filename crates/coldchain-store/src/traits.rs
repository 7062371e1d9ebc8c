use crate::error::StoreError;
use crate::record::LedgerRecord;

/// Append-only sink for ledger records.
pub trait StoreWriter {
    /// Appends one record after all previously appended ones.
    fn append(&mut self, record: &LedgerRecord) -> Result<(), StoreError>;

    /// Makes appended records durable as far as the backend allows.
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// Sequential source of ledger records, in append order.
pub trait StoreReader {
    /// Next record, or `None` at the end.
    fn read_next(&mut self) -> Result<Option<LedgerRecord>, StoreError>;

    /// Drains the reader.
    fn read_all(&mut self) -> Result<Vec<LedgerRecord>, StoreError> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

impl<R: StoreReader + ?Sized> StoreReader for &mut R {
    fn read_next(&mut self) -> Result<Option<LedgerRecord>, StoreError> {
        (**self).read_next()
    }
}
