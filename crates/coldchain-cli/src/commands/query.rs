//! Read-only state queries.

use coldchain_canonical::{message_hash, Identity, MessageHash};
use coldchain_core::{BatchId, CertificateId, CoreError, RecordKind};

use super::{CommandResult, Context};
use crate::output;

pub fn entity(ctx: &Context, id: Identity) -> CommandResult {
    let state = ctx.load_state()?;
    let entity = state
        .entities(&id)
        .ok_or_else(|| format!("entity {} is not registered", id))?;
    println!("{}", output::format_json(&entity));
    Ok(())
}

pub fn batch(ctx: &Context, id: u64) -> CommandResult {
    let state = ctx.load_state()?;
    let batch = state.vaccine_batches(BatchId(id)).ok_or(CoreError::NotFound {
        kind: RecordKind::Batch,
        id,
    })?;
    let certificates: Vec<_> = state
        .certificates_for_batch(batch.id)
        .into_iter()
        .map(|c| c.id)
        .collect();
    println!(
        "{}",
        output::format_json(&serde_json::json!({
            "id": batch.id,
            "brand": batch.brand,
            "manufacturer": batch.manufacturer,
            "certificates": certificates,
            "current_status": state.current_status(batch.id),
        }))
    );
    Ok(())
}

pub fn certificate(ctx: &Context, id: u64) -> CommandResult {
    let state = ctx.load_state()?;
    let certificate = state.certificates(CertificateId(id)).ok_or(CoreError::NotFound {
        kind: RecordKind::Certificate,
        id,
    })?;
    println!("{}", output::format_json(certificate));
    Ok(())
}

/// Either a raw 32-byte hash or a message to hash.
pub enum HashInput {
    Hash(MessageHash),
    Message(String),
}

impl HashInput {
    pub fn resolve(self) -> MessageHash {
        match self {
            HashInput::Hash(hash) => hash,
            HashInput::Message(text) => message_hash(&text),
        }
    }
}

pub fn match_signature(
    ctx: &Context,
    caller: Option<Identity>,
    certificate: u64,
    signer: Identity,
    input: HashInput,
) -> CommandResult {
    let state = ctx.load_state()?;
    let hash = input.resolve();
    let caller = caller.unwrap_or(ctx.config.engine.admin);
    let matches = state.is_matching_signature(&hash, CertificateId(certificate), signer, caller)?;
    println!("{}", matches);
    Ok(())
}
