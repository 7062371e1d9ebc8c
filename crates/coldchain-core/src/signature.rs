//! Signer recovery for custody certificates.
//!
//! Certificates carry 65-byte secp256k1 signatures laid out as `r || s || v`,
//! the format produced by `web3.eth.sign` and friends. Recovery returns the
//! signer's address (`keccak256(uncompressed_pubkey[1..])[12..]`), so a
//! signature can be checked against a registered [`Identity`] without storing
//! public keys.
//!
//! Everything here is pure: no state and no side effects.

use coldchain_canonical::{keccak256, Identity, MessageHash, SignatureBytes};
use k256::ecdsa::{RecoveryId, Signature};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub use k256::ecdsa::{SigningKey, VerifyingKey};

/// Length of a recoverable signature.
pub const SIGNATURE_LEN: usize = 65;

/// Prefix applied by `eth_sign`/`personal_sign` wallets before signing.
const ETH_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Digest a signature is expected to cover, relative to the message hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureScheme {
    /// The signature covers the message hash itself.
    #[default]
    Raw,
    /// The signature covers `keccak256("\x19Ethereum Signed Message:\n32" || hash)`.
    EthPersonal,
}

impl SignatureScheme {
    /// Digest that is actually signed for `hash` under this scheme.
    pub fn signed_digest(self, hash: &MessageHash) -> MessageHash {
        match self {
            SignatureScheme::Raw => *hash,
            SignatureScheme::EthPersonal => eth_signed_message_hash(hash),
        }
    }
}

/// Applies the Ethereum signed-message prefix to a 32-byte hash.
pub fn eth_signed_message_hash(hash: &MessageHash) -> MessageHash {
    let mut buf = Vec::with_capacity(ETH_MESSAGE_PREFIX.len() + MessageHash::LEN);
    buf.extend_from_slice(ETH_MESSAGE_PREFIX);
    buf.extend_from_slice(hash.as_bytes());
    MessageHash::from_bytes(keccak256(buf))
}

/// Parsed `r || s || v` signature.
struct RecoverableParts {
    signature: Signature,
    recovery_id: RecoveryId,
}

fn parse_parts(signature: &SignatureBytes) -> Result<RecoverableParts, CoreError> {
    let bytes = signature.as_bytes();
    if bytes.len() != SIGNATURE_LEN {
        return Err(CoreError::MalformedSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LEN,
            bytes.len()
        )));
    }

    let v = bytes[64];
    let parity = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        other => {
            return Err(CoreError::MalformedSignature(format!(
                "invalid recovery byte {}",
                other
            )))
        }
    };

    let signature = Signature::from_slice(&bytes[..64])
        .map_err(|_| CoreError::MalformedSignature("r or s out of range".to_string()))?;
    let recovery_id = RecoveryId::from_byte(parity)
        .ok_or_else(|| CoreError::MalformedSignature(format!("invalid recovery id {}", parity)))?;

    // High-s signatures are valid for recovery; flip to the low-s twin.
    Ok(match signature.normalize_s() {
        Some(low) => RecoverableParts {
            signature: low,
            recovery_id: RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        },
        None => RecoverableParts {
            signature,
            recovery_id,
        },
    })
}

/// Checks that `signature` has the shape of a recoverable signature.
///
/// This does not check who signed; see [`recover_signer`].
pub fn check_shape(signature: &SignatureBytes) -> Result<(), CoreError> {
    parse_parts(signature).map(|_| ())
}

/// Recovers the address whose key produced `signature` over `message_hash`.
///
/// # Errors
///
/// [`CoreError::MalformedSignature`] when the bytes do not parse or no public
/// key can be recovered from them.
pub fn recover_signer(
    message_hash: &MessageHash,
    signature: &SignatureBytes,
) -> Result<Identity, CoreError> {
    let parts = parse_parts(signature)?;
    let key = VerifyingKey::recover_from_prehash(
        message_hash.as_bytes(),
        &parts.signature,
        parts.recovery_id,
    )
    .map_err(|_| CoreError::MalformedSignature("no public key recovers".to_string()))?;
    Ok(identity_of(&key))
}

/// Address of a secp256k1 public key.
pub fn identity_of(key: &VerifyingKey) -> Identity {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; Identity::LEN];
    address.copy_from_slice(&hash[12..]);
    Identity::from_bytes(address)
}

/// Signs `message_hash` and returns `r || s || v` with `v ∈ {27, 28}`.
///
/// Key custody is not this crate's concern; this exists so tests and the
/// developer CLI can produce signatures in the same encoding wallets use.
pub fn sign_prehash(
    key: &SigningKey,
    message_hash: &MessageHash,
) -> Result<SignatureBytes, CoreError> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(message_hash.as_bytes())
        .map_err(|e| CoreError::MalformedSignature(e.to_string()))?;
    let mut bytes = signature.to_bytes().to_vec();
    bytes.push(27 + recovery_id.to_byte());
    Ok(SignatureBytes::new(bytes))
}
