use coldchain_canonical::{compute_record_id, Canonicalizer};
use coldchain_journal::{
    verify_record_id, FrameKind, JournalReader, JournalWriter, ReadMode, RecordJson, WriteOptions,
};
use serde_json::json;
use tempfile::TempDir;

fn record(height: u64) -> RecordJson {
    let mut record = json!({
        "height": height,
        "prev_record_id": null,
        "transaction": {
            "caller": "0x00000000000000000000000000000000000000ad",
            "operation": {
                "op": "add_vaccine_batch",
                "brand": "Moderna",
                "manufacturer": "0x0101010101010101010101010101010101010101"
            }
        },
        "event": {
            "event": "AddVaccineBatch",
            "vaccine_batch_id": height,
            "manufacturer": "0x0101010101010101010101010101010101010101"
        }
    });
    let id = compute_record_id(&record, &Canonicalizer::new()).unwrap();
    record["record_id"] = serde_json::to_value(id).unwrap();
    record
}

#[test]
fn records_come_back_in_append_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    for height in 0..3 {
        writer.append_record(&record(height)).unwrap();
    }
    assert_eq!(writer.frames_written(), 3);
    writer.finish().unwrap();

    let reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let records: Vec<RecordJson> = reader.collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 3);
    for (height, read) in records.iter().enumerate() {
        assert_eq!(read, &record(height as u64));
        assert!(verify_record_id(read, &Canonicalizer::new()).unwrap());
    }
}

#[test]
fn reopening_appends_after_existing_frames() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");

    {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        writer.append_record(&record(0)).unwrap();
    }
    {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        writer.append_record(&record(1)).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_record().unwrap().unwrap()["height"], 0);
    assert_eq!(reader.read_record().unwrap().unwrap()["height"], 1);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn append_false_cuts_back_to_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_record(&record(0)).unwrap();
    writer.finish().unwrap();

    let options = WriteOptions {
        append: false,
        ..WriteOptions::default()
    };
    let mut writer = JournalWriter::open(&path, options).unwrap();
    writer.append_record(&record(7)).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_record().unwrap().unwrap()["height"], 7);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn unknown_frames_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::Unknown(0x7f), b"future").unwrap();
    writer.append_record(&record(0)).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_record().unwrap().unwrap()["height"], 0);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn structurally_incomplete_records_are_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    assert!(writer.append_record(&json!({ "height": 0 })).is_err());
    assert_eq!(writer.frames_written(), 0);
}

#[test]
fn empty_journal_reads_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.ccj");
    JournalWriter::open(&path, WriteOptions::default())
        .unwrap()
        .finish()
        .unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 16);
    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(reader.read_record().unwrap().is_none());
    assert_eq!(reader.position(), 16);
}
