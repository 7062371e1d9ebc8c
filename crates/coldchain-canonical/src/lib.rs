//! Canonical primitives for the cold-chain custody ledger.
//!
//! Everything that participates in hashing, signing or record identity lives
//! in this crate: participant addresses, message hashes, signature bytes,
//! digests, and the canonical JSON encoding used to derive ledger record ids.
//!
#![deny(missing_docs)]

/// Canonical JSON encoding for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives (SHA-256 record digests, Keccak-256 message hashes).
pub mod digest;
/// Hex-encoded identifiers: addresses, hashes, signatures.
pub mod identifiers;
/// Record id computation with domain-separated hashing.
pub mod record_id;
/// Validation errors for canonical primitives.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use digest::{keccak256, message_hash, Digest, DigestAlg};
pub use identifiers::{Identity, MessageHash, SignatureBytes};
pub use record_id::{compute_record_id, verify_record_id, RecordIdError};
pub use validation::ValidationError;
