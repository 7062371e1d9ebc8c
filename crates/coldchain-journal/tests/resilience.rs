use coldchain_journal::frame::{FRAME_HEADER_SIZE, HEADER_SIZE, MAX_PAYLOAD_SIZE};
use coldchain_journal::{
    FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions,
};
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tempfile::TempDir;

fn write_two_records(path: &std::path::Path) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    for height in 0..2 {
        writer
            .append_record(&json!({
                "record_id": {
                    "alg": "sha-256",
                    "b64": "n4bQgYhMfWWaL-qgxVrQFaO_TxsrC4Is0V1sFbDwCgg"
                },
                "height": height,
                "transaction": {},
                "event": {}
            }))
            .unwrap();
    }
    writer.finish().unwrap();
}

fn chop(path: &std::path::Path, bytes: u64) {
    let len = fs::metadata(path).unwrap().len();
    let file = OpenOptions::new().write(true).open(path).unwrap();
    file.set_len(len - bytes).unwrap();
}

#[test]
fn oversized_payload_is_refused_on_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    let err = writer
        .append_raw(FrameKind::RecordJson, &vec![0u8; MAX_PAYLOAD_SIZE as usize + 1])
        .unwrap_err();
    match err {
        JournalError::PayloadTooLarge { size, max } => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as usize + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other),
    }
}

#[test]
fn truncated_payload_strict_vs_permissive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");
    write_two_records(&path);
    chop(&path, 5);

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(strict.read_record().unwrap().is_some());
    assert!(matches!(
        strict.read_record(),
        Err(JournalError::TruncatedFrame { .. })
    ));

    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert_eq!(permissive.read_record().unwrap().unwrap()["height"], 0);
    assert!(permissive.read_record().unwrap().is_none());
}

#[test]
fn truncated_frame_header_reports_its_offset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");
    {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        writer.append_raw(FrameKind::RecordJson, b"").unwrap();
    }
    // Leave three bytes of an eight-byte frame header.
    chop(&path, (FRAME_HEADER_SIZE - 3) as u64);

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    match reader.read_frame() {
        Err(JournalError::TruncatedFrame { offset }) => assert_eq!(offset, HEADER_SIZE as u64),
        other => panic!("expected TruncatedFrame, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn non_zero_reserved_frame_bytes_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");
    write_two_records(&path);

    let mut bytes = fs::read(&path).unwrap();
    bytes[HEADER_SIZE + 1] = 0xff;
    fs::write(&path, bytes).unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert!(matches!(
        reader.read_record(),
        Err(JournalError::InvalidFrame { offset, .. }) if offset == HEADER_SIZE as u64
    ));
}

#[test]
fn foreign_files_are_not_journals() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, b"this is not a journal file").unwrap();

    assert!(matches!(
        JournalReader::open(&path, ReadMode::Strict),
        Err(JournalError::InvalidHeader(_))
    ));
    assert!(matches!(
        JournalWriter::open(&path, WriteOptions::default()),
        Err(JournalError::InvalidHeader(_))
    ));
}

#[test]
fn short_non_empty_file_cannot_be_opened_for_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");
    fs::File::create(&path).unwrap().write_all(b"CCJ").unwrap();

    assert!(matches!(
        JournalWriter::open(&path, WriteOptions::default()),
        Err(JournalError::FileNotEmpty)
    ));
}

#[test]
fn invalid_utf8_payload_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");
    {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        writer.append_raw(FrameKind::RecordJson, &[0xff, 0xfe]).unwrap();
    }

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(matches!(
        reader.read_record(),
        Err(JournalError::InvalidUtf8(_))
    ));
}
