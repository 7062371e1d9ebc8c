//! Record id computation with domain-separated hashing.
//!
//! Record ids are computed as `sha256(domain_separator || canonical_bytes(record))`
//! where the `record_id` field is excluded from the hash input.

use crate::{CanonicalizationError, Canonicalizer, Digest};
use serde::Serialize;
use serde_json::Value;

/// Domain separator for record id computation: `b"coldchain:record:v1\0"`.
const RECORD_DOMAIN_SEPARATOR: &[u8] = b"coldchain:record:v1\0";

/// Error during record id computation.
#[derive(thiserror::Error, Debug)]
pub enum RecordIdError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// The record did not serialize to a JSON object.
    #[error("record must be a JSON object")]
    NotAnObject,
}

/// Computes the content-derived id of a ledger record.
///
/// The record is serialized, stripped of its own `record_id`, canonicalized
/// and hashed behind the domain separator, so any change to a committed
/// record changes its id.
///
/// # Example
///
/// ```rust
/// use coldchain_canonical::{compute_record_id, verify_record_id, Canonicalizer};
/// use serde_json::json;
///
/// let canonicalizer = Canonicalizer::new();
/// let mut record = json!({ "height": 0, "transaction": { "op": "add_entity" } });
/// let id = compute_record_id(&record, &canonicalizer)?;
/// record["record_id"] = serde_json::to_value(&id)?;
/// assert!(verify_record_id(&record, &id, &canonicalizer)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_record_id<T: Serialize>(
    record: &T,
    canonicalizer: &Canonicalizer,
) -> Result<Digest, RecordIdError> {
    let mut value = serde_json::to_value(record)?;
    match &mut value {
        Value::Object(map) => {
            map.remove("record_id");
        }
        _ => return Err(RecordIdError::NotAnObject),
    }

    let bytes = canonicalizer.canonicalize(&value)?;
    Ok(Digest::sha256([RECORD_DOMAIN_SEPARATOR, bytes.as_slice()]))
}

/// Returns `true` when `claimed_id` matches the recomputed id of `record`.
pub fn verify_record_id<T: Serialize>(
    record: &T,
    claimed_id: &Digest,
    canonicalizer: &Canonicalizer,
) -> Result<bool, RecordIdError> {
    Ok(compute_record_id(record, canonicalizer)? == *claimed_id)
}
