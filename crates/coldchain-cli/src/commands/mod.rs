//! Command implementations.

pub mod hash;
pub mod list;
pub mod query;
pub mod submit;
pub mod verify;

use crate::config::CliConfig;
use coldchain_core::ColdChain;
use coldchain_store::{
    JournalBackendReader, JournalBackendWriter, Ledger, MemoryStore, ReadMode, StoreError,
    WriteOptions,
};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Loaded configuration plus the journal it points at.
pub struct Context {
    pub config: CliConfig,
}

impl Context {
    /// Ledger for submissions; creates the journal on first use.
    pub fn open_ledger(&self) -> Result<Ledger<JournalBackendWriter>, StoreError> {
        let options = WriteOptions {
            sync: self.config.sync,
            ..WriteOptions::default()
        };
        Ledger::open(&self.config.journal, self.config.engine.clone(), options)
    }

    /// Reader over the journal, or `None` when nothing was recorded yet.
    ///
    /// Queries read [`ReadMode::Permissive`]: a frame torn by an interrupted
    /// append was never committed.
    pub fn reader(&self, mode: ReadMode) -> Result<Option<JournalBackendReader>, StoreError> {
        match std::fs::metadata(&self.config.journal) {
            Ok(meta) if meta.len() > 0 => Ok(Some(JournalBackendReader::open(
                &self.config.journal,
                mode,
            )?)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// State rebuilt from the journal without opening it for writing.
    pub fn load_state(&self) -> Result<ColdChain, StoreError> {
        match self.reader(ReadMode::Permissive)? {
            Some(reader) => {
                let ledger =
                    Ledger::replay(self.config.engine.clone(), reader, MemoryStore::new())?;
                Ok(ledger.into_chain())
            }
            None => Ok(ColdChain::new(self.config.engine.clone())),
        }
    }
}
