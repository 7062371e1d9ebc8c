use serde_json::Value;

/// Ledger record payload as stored in a frame.
///
/// The journal does not interpret records beyond the structural check
/// below; decoding and chain verification happen in `coldchain-store`.
pub type RecordJson = Value;

/// Top-level fields every ledger record carries.
pub const REQUIRED_FIELDS: [&str; 4] = ["record_id", "height", "transaction", "event"];

/// True when `value` is an object carrying [`REQUIRED_FIELDS`].
pub fn is_valid_record_structure(value: &RecordJson) -> bool {
    value
        .as_object()
        .map(|obj| REQUIRED_FIELDS.iter().all(|field| obj.contains_key(*field)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structure_check() {
        assert!(is_valid_record_structure(&json!({
            "record_id": {}, "height": 0, "transaction": {}, "event": {}
        })));
        assert!(!is_valid_record_structure(&json!({ "height": 0 })));
        assert!(!is_valid_record_structure(&json!([1])));
    }
}
