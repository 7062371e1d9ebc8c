//! Output formatting utilities.

use coldchain_core::{LedgerEvent, Operation};
use coldchain_store::LedgerRecord;
use serde::Serialize;

/// Pretty JSON, or `{}` if the value cannot be serialized.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a record as a table row.
pub fn format_table_row(record: &LedgerRecord) -> String {
    format!(
        "{:<7} {:<44} {:<18} {}",
        record.height,
        record.record_id.b64,
        record.transaction.operation.kind(),
        summary(record)
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<7} {:<44} {:<18} {}", "HEIGHT", "RECORD_ID", "OPERATION", "DETAIL");
    println!("{}", "-".repeat(110));
}

fn summary(record: &LedgerRecord) -> String {
    match (&record.transaction.operation, &record.event) {
        (_, LedgerEvent::AddEntity { entity_id, entity_mode }) => {
            format!("{} as {}", entity_id, entity_mode)
        }
        (
            Operation::AddVaccineBatch { brand, .. },
            LedgerEvent::AddVaccineBatch {
                vaccine_batch_id,
                manufacturer,
            },
        ) => format!(
            "batch #{} {} by {}",
            vaccine_batch_id,
            brand,
            truncate(&manufacturer.to_string(), 12)
        ),
        (
            Operation::IssueCertificate { status, batch, .. },
            LedgerEvent::IssueCertificate { certificate_id, .. },
        ) => match batch {
            Some(batch) => format!(
                "certificate #{} {} for batch #{}",
                certificate_id, status, batch
            ),
            None => format!("certificate #{} {}", certificate_id, status),
        },
        (_, event) => event.name().to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
