//! Mutating commands: each one becomes a ledger record.

use coldchain_canonical::{Identity, SignatureBytes};
use coldchain_core::{BatchId, Operation, Role, Status, Transaction};
use serde_json::json;

use super::{CommandResult, Context};
use crate::output;

pub fn add_entity(
    ctx: &Context,
    caller: Option<Identity>,
    id: Identity,
    mode: Role,
) -> CommandResult {
    submit(ctx, caller, Operation::AddEntity { id, mode })
}

pub fn add_batch(
    ctx: &Context,
    caller: Option<Identity>,
    brand: String,
    manufacturer: Identity,
) -> CommandResult {
    submit(
        ctx,
        caller,
        Operation::AddVaccineBatch {
            brand,
            manufacturer,
        },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn issue(
    ctx: &Context,
    caller: Option<Identity>,
    issuer: Identity,
    prover: Identity,
    status: Status,
    signature: SignatureBytes,
    batch: Option<u64>,
) -> CommandResult {
    submit(
        ctx,
        caller,
        Operation::IssueCertificate {
            issuer,
            prover,
            status,
            signature,
            batch: batch.map(BatchId),
        },
    )
}

fn submit(ctx: &Context, caller: Option<Identity>, operation: Operation) -> CommandResult {
    // Without --caller the configured administrator submits.
    let caller = caller.unwrap_or(ctx.config.engine.admin);
    let mut ledger = ctx.open_ledger()?;
    let record = ledger.submit(Transaction::new(caller, operation))?;
    ledger.finish()?;

    println!(
        "{}",
        output::format_json(&json!({
            "height": record.height,
            "record_id": record.record_id,
            "event": record.event,
        }))
    );
    Ok(())
}
