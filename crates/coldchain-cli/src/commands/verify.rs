//! Verify command implementation.

use coldchain_store::{verify_chain, Ledger, MemoryStore, ReadMode};
use serde_json::json;

use super::{CommandResult, Context};

/// Checks the hash chain, then replays every transaction against a fresh state.
pub fn run(ctx: &Context, json_output: bool) -> CommandResult {
    let Some(reader) = ctx.reader(ReadMode::Strict)? else {
        return Err(format!(
            "journal {} does not exist or is empty",
            ctx.config.journal.display()
        )
        .into());
    };
    let report = verify_chain(reader)?;

    let replayed = match ctx.reader(ReadMode::Strict)? {
        Some(reader) => Ledger::replay(ctx.config.engine.clone(), reader, MemoryStore::new())?,
        None => return Err("journal disappeared during verification".into()),
    };
    let state = replayed.chain();

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "records": report.records,
                "tip": report.tip,
                "entities": state.identity_registry().len(),
                "batches": state.batch_registry().len(),
                "certificates": state.certificate_engine().certificate_count(),
                "verdict": "ok",
            }))?
        );
    } else {
        println!("records:      {}", report.records);
        println!(
            "tip:          {}",
            report.tip.as_ref().map(|d| d.b64.as_str()).unwrap_or("-")
        );
        println!("entities:     {}", state.identity_registry().len());
        println!("batches:      {}", state.batch_registry().len());
        println!("certificates: {}", state.certificate_engine().certificate_count());
        println!("verdict:      ok");
    }
    Ok(())
}
