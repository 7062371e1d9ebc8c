//! Off-ledger helpers for producing certification inputs.

use coldchain_canonical::message_hash;

use super::CommandResult;
#[cfg(feature = "dev-tools")]
use super::query::HashInput;
#[cfg(feature = "dev-tools")]
use coldchain_core::SignatureScheme;

/// Prints the Keccak-256 hash of a certification message.
pub fn run(message: &str) -> CommandResult {
    println!("{}", message_hash(message));
    Ok(())
}

/// Signs a message hash with a raw secp256k1 secret. Test use only.
#[cfg(feature = "dev-tools")]
pub fn sign(secret: &str, input: HashInput, scheme: SignatureScheme) -> CommandResult {
    use coldchain_core::signature::{identity_of, sign_prehash, SigningKey};

    let bytes = hex::decode(secret.trim_start_matches("0x"))?;
    let key =
        SigningKey::from_slice(&bytes).map_err(|_| "secret is not a valid secp256k1 scalar")?;
    let digest = scheme.signed_digest(&input.resolve());
    let signature = sign_prehash(&key, &digest)?;

    println!(
        "{}",
        crate::output::format_json(&serde_json::json!({
            "signer": identity_of(key.verifying_key()),
            "signature": signature,
        }))
    );
    Ok(())
}
