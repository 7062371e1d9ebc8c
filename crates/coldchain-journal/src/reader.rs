//! Sequential journal reader.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use crate::record::{is_valid_record_structure, RecordJson};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How a reader treats a frame cut short by the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Truncation is an error.
    #[default]
    Strict,
    /// Truncation ends the journal; everything before it is returned.
    Permissive,
}

/// Reads ledger records from a journal file in append order.
///
/// ```rust,no_run
/// use coldchain_journal::{JournalReader, ReadMode};
///
/// let mut reader = JournalReader::open("ledger.ccj", ReadMode::Strict)?;
/// while let Some(record) = reader.read_record()? {
///     println!("{} {}", record["height"], record["record_id"]["b64"]);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    input: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens `path` and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut input = BufReader::new(File::open(path)?);

        let mut header = [0u8; HEADER_SIZE];
        match input.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(JournalError::InvalidHeader(
                    "file shorter than journal header".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        }
        JournalHeader::from_bytes(&header)?;
        tracing::debug!(path = %path.display(), ?mode, "opened journal for reading");

        Ok(Self {
            input,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read mode this reader was opened with.
    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Reads the next frame of any kind.
    ///
    /// Returns `Ok(None)` at a clean end of file, and also at a truncated
    /// frame in [`ReadMode::Permissive`].
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let start = self.position;

        let mut frame_bytes = [0u8; FRAME_HEADER_SIZE];
        let filled = read_up_to(&mut self.input, &mut frame_bytes)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < FRAME_HEADER_SIZE {
            return self.truncated(start);
        }
        let frame = RecordFrame::from_bytes(&frame_bytes, start)?;

        let mut payload = vec![0u8; frame.len as usize];
        if read_up_to(&mut self.input, &mut payload)? < payload.len() {
            return self.truncated(start);
        }

        self.position = start + FRAME_HEADER_SIZE as u64 + u64::from(frame.len);
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next ledger record, skipping frames of unknown kind.
    pub fn read_record(&mut self) -> Result<Option<RecordJson>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::RecordJson, payload)) => {
                    let text = std::str::from_utf8(&payload)?;
                    let record: RecordJson = serde_json::from_str(text)?;
                    if !is_valid_record_structure(&record) {
                        return Err(JournalError::InvalidRecord(format!(
                            "record at offset {} lacks required fields",
                            self.position
                        )));
                    }
                    return Ok(Some(record));
                }
                Some((FrameKind::Unknown(kind), payload)) => {
                    tracing::debug!(kind, len = payload.len(), "skipping unknown frame");
                }
            }
        }
    }

    fn truncated<T>(&self, offset: u64) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
            ReadMode::Permissive => {
                tracing::warn!(offset, "truncated frame treated as end of journal");
                Ok(None)
            }
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<RecordJson, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Fills as much of `buf` as the input allows; returns the byte count.
fn read_up_to(input: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
