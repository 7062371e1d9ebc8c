//! Append-only journal writer.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use crate::record::{is_valid_record_structure, RecordJson};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options for [`JournalWriter::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// fsync after every append.
    pub sync: bool,
    /// Create the file when missing.
    pub create: bool,
    /// Keep existing frames; when false the file is cut back to its header.
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
        }
    }
}

/// Appends ledger records to a journal file.
///
/// A new or empty file receives a header first. An existing file must start
/// with a valid header; frames are only ever added after the last byte.
pub struct JournalWriter {
    file: File,
    sync: bool,
    frames_written: u64,
}

impl JournalWriter {
    /// Opens or creates `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .write(true)
            .open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&JournalHeader::new().to_bytes())?;
            if options.sync {
                file.sync_all()?;
            }
            tracing::debug!(path = %path.display(), "initialized journal");
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header = [0u8; HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::from_bytes(&header)?;

            if options.append {
                file.seek(SeekFrom::End(0))?;
            } else {
                file.set_len(HEADER_SIZE as u64)?;
                file.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
                tracing::debug!(path = %path.display(), "truncated journal to header");
            }
        }

        Ok(Self {
            file,
            sync: options.sync,
            frames_written: 0,
        })
    }

    /// Appends one ledger record.
    pub fn append_record(&mut self, record: &RecordJson) -> Result<(), JournalError> {
        if !is_valid_record_structure(record) {
            return Err(JournalError::InvalidRecord(
                "record lacks required fields".to_string(),
            ));
        }
        let payload = serde_json::to_vec(record)?;
        self.append_raw(FrameKind::RecordJson, &payload)
    }

    /// Appends a frame of arbitrary kind.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;

        let mut bytes = Vec::with_capacity(frame.to_bytes().len() + payload.len());
        bytes.extend_from_slice(&frame.to_bytes());
        bytes.extend_from_slice(payload);
        self.file.write_all(&bytes)?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_data()?;
        }

        self.frames_written += 1;
        tracing::trace!(?kind, len = payload.len(), "appended frame");
        Ok(())
    }

    /// Frames appended through this writer.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}
