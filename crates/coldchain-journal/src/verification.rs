use crate::errors::JournalError;
use crate::record::RecordJson;
use coldchain_canonical::{compute_record_id, Canonicalizer, Digest};

/// Checks a record's `record_id` field against its recomputed id.
///
/// Returns `Ok(false)` for a well-formed record whose content no longer
/// hashes to the id it carries, and an error when the id is missing.
pub fn verify_record_id(
    record: &RecordJson,
    canonicalizer: &Canonicalizer,
) -> Result<bool, JournalError> {
    let claimed: Digest = record
        .get("record_id")
        .cloned()
        .ok_or_else(|| JournalError::InvalidRecord("missing record_id".to_string()))
        .and_then(|v| {
            serde_json::from_value(v)
                .map_err(|e| JournalError::InvalidRecord(format!("invalid record_id: {}", e)))
        })?;

    let computed = compute_record_id(record, canonicalizer)
        .map_err(|e| JournalError::InvalidRecord(format!("record id computation failed: {}", e)))?;

    Ok(claimed == computed)
}
