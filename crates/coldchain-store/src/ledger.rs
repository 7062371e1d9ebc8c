//! Applies transactions and persists them as a hash chain.

use coldchain_canonical::{Canonicalizer, Digest, Identity, MessageHash};
use coldchain_core::{CertificateId, ColdChain, CoreError, EngineConfig, Transaction};
use coldchain_journal::{JournalReader, ReadMode, WriteOptions};
use std::fs::OpenOptions;
use std::path::Path;

use crate::error::StoreError;
use crate::journal::{JournalBackendReader, JournalBackendWriter};
use crate::record::LedgerRecord;
use crate::traits::{StoreReader, StoreWriter};
use crate::verify::ChainVerifier;

/// [`ColdChain`] state backed by an append-only record store.
///
/// A transaction is applied first; only a successful one is sealed into a
/// [`LedgerRecord`] and appended, so rejected submissions leave no trace.
/// Once an append fails the ledger is poisoned and must be reopened.
pub struct Ledger<W: StoreWriter> {
    chain: ColdChain,
    writer: W,
    canonicalizer: Canonicalizer,
    height: u64,
    tip: Option<Digest>,
    poisoned: bool,
}

impl<W: StoreWriter> Ledger<W> {
    /// Empty ledger writing to `writer`, which must hold no records.
    pub fn new(config: EngineConfig, writer: W) -> Self {
        Self {
            chain: ColdChain::new(config),
            writer,
            canonicalizer: Canonicalizer::new(),
            height: 0,
            tip: None,
            poisoned: false,
        }
    }

    /// Rebuilds state from `reader`, then continues appending to `writer`.
    ///
    /// Every record must extend the chain and, when its transaction is
    /// applied again, emit exactly the event it recorded.
    pub fn replay<R: StoreReader>(
        config: EngineConfig,
        mut reader: R,
        writer: W,
    ) -> Result<Self, StoreError> {
        let mut chain = ColdChain::new(config);
        let mut verifier = ChainVerifier::new();

        while let Some(record) = reader.read_next()? {
            verifier.check(&record)?;
            let replayed = chain
                .apply(&record.transaction)
                .map_err(|source| StoreError::Replay {
                    height: record.height,
                    source,
                })?;
            if replayed != record.event {
                return Err(StoreError::Diverged {
                    height: record.height,
                    recorded: Box::new(record.event),
                    replayed: Box::new(replayed),
                });
            }
        }
        tracing::info!(records = verifier.records(), "ledger replayed");

        Ok(Self {
            chain,
            writer,
            canonicalizer: Canonicalizer::new(),
            height: verifier.records(),
            tip: verifier.tip().cloned(),
            poisoned: false,
        })
    }

    /// Applies `tx` and appends its record.
    ///
    /// The transaction runs against a copy of the state, which replaces the
    /// current one only once the record is in the store. Any failure leaves
    /// the visible state untouched.
    pub fn submit(&mut self, tx: Transaction) -> Result<LedgerRecord, StoreError> {
        if self.poisoned {
            return Err(StoreError::Poisoned);
        }

        let mut staged = self.chain.clone();
        let event = match staged.apply(&tx) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    op = tx.operation.kind(),
                    caller = %tx.caller,
                    error = %e,
                    "transaction rejected"
                );
                return Err(e.into());
            }
        };

        let record = LedgerRecord::seal(
            self.tip.clone(),
            self.height,
            tx,
            event,
            &self.canonicalizer,
        )?;
        // A failed append may have left a partial frame behind.
        if let Err(e) = self.writer.append(&record) {
            self.poisoned = true;
            tracing::error!(height = record.height, error = %e, "append failed");
            return Err(e);
        }

        tracing::info!(
            height = record.height,
            record_id = %record.record_id.b64,
            event = record.event.name(),
            "record appended"
        );
        self.chain = staged;
        self.height += 1;
        self.tip = Some(record.record_id.clone());
        Ok(record)
    }

    /// Read-only view of the current state.
    pub fn chain(&self) -> &ColdChain {
        &self.chain
    }

    /// Signature check against the current state.
    pub fn is_matching_signature(
        &self,
        message_hash: &MessageHash,
        certificate_id: CertificateId,
        expected_signer: Identity,
        caller: Identity,
    ) -> Result<bool, CoreError> {
        self.chain
            .is_matching_signature(message_hash, certificate_id, expected_signer, caller)
    }

    /// Number of committed records; also the next height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Id of the latest record.
    pub fn tip(&self) -> Option<&Digest> {
        self.tip.as_ref()
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush()
    }

    /// Releases the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Drops the writer and keeps the state.
    pub fn into_chain(self) -> ColdChain {
        self.chain
    }
}

impl Ledger<JournalBackendWriter> {
    /// Opens the journal at `path`, replaying it when it already has content.
    ///
    /// A frame cut short by an interrupted append is dropped from the file
    /// before replay. With `options.append` unset the journal is started over.
    pub fn open<P: AsRef<Path>>(
        path: P,
        config: EngineConfig,
        options: WriteOptions,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let existing = match std::fs::metadata(path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if existing && options.append {
            trim_torn_tail(path)?;
            let reader = JournalBackendReader::open(path, ReadMode::Strict)?;
            let writer = JournalBackendWriter::open(path, options)?;
            Self::replay(config, reader, writer)
        } else {
            tracing::debug!(path = %path.display(), "starting new ledger");
            Ok(Self::new(config, JournalBackendWriter::open(path, options)?))
        }
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), StoreError> {
        self.writer.finish()
    }
}

/// Cuts the journal back to the end of its last complete frame.
fn trim_torn_tail(path: &Path) -> Result<(), StoreError> {
    let len = std::fs::metadata(path)?.len();
    let mut reader = JournalReader::open(path, ReadMode::Permissive)?;
    while reader.read_frame()?.is_some() {}

    let end = reader.position();
    if end < len {
        tracing::warn!(
            path = %path.display(),
            offset = end,
            discarded = len - end,
            "dropping torn frame at journal tail"
        );
        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(end)?;
        file.sync_all()?;
    }
    Ok(())
}
