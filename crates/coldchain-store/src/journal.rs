use coldchain_canonical::Canonicalizer;
use coldchain_journal::{verify_record_id, JournalReader, JournalWriter, ReadMode, WriteOptions};
use std::path::Path;

use crate::error::StoreError;
use crate::record::{parse_record, LedgerRecord};
use crate::traits::{StoreReader, StoreWriter};

/// [`StoreWriter`] over a journal file.
pub struct JournalBackendWriter {
    writer: JournalWriter,
}

impl JournalBackendWriter {
    /// Opens or creates the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        Ok(Self {
            writer: JournalWriter::open(path, options)?,
        })
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), StoreError> {
        Ok(self.writer.finish()?)
    }
}

impl StoreWriter for JournalBackendWriter {
    fn append(&mut self, record: &LedgerRecord) -> Result<(), StoreError> {
        self.writer.append_record(&record.to_json()?)?;
        Ok(())
    }

    // The journal writer flushes each frame as it is appended.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// [`StoreReader`] over a journal file.
///
/// Ids are checked against the stored JSON before decoding, so fields the
/// typed record would ignore still count as tampering.
pub struct JournalBackendReader {
    reader: JournalReader,
    canonicalizer: Canonicalizer,
}

impl JournalBackendReader {
    /// Opens the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        Ok(Self {
            reader: JournalReader::open(path, mode)?,
            canonicalizer: Canonicalizer::new(),
        })
    }
}

impl StoreReader for JournalBackendReader {
    fn read_next(&mut self) -> Result<Option<LedgerRecord>, StoreError> {
        let Some(json) = self.reader.read_record()? else {
            return Ok(None);
        };
        let record = parse_record(&json)?;
        if !verify_record_id(&json, &self.canonicalizer)? {
            return Err(StoreError::Tampered {
                height: record.height,
                record_id: record.record_id,
            });
        }
        Ok(Some(record))
    }
}

/// In-memory store; the writer half doubles as a reader over what it holds.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<LedgerRecord>,
    cursor: usize,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records appended so far.
    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    /// Mutable access, for fault injection in tests.
    pub fn records_mut(&mut self) -> &mut Vec<LedgerRecord> {
        &mut self.records
    }
}

impl StoreWriter for MemoryStore {
    fn append(&mut self, record: &LedgerRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl StoreReader for MemoryStore {
    fn read_next(&mut self) -> Result<Option<LedgerRecord>, StoreError> {
        let next = self.records.get(self.cursor).cloned();
        if next.is_some() {
            self.cursor += 1;
        }
        Ok(next)
    }
}
