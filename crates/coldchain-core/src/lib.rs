//! Attestation subsystem of the cold-chain custody ledger.
//!
//! This crate provides:
//! - [`IdentityRegistry`]: participant address → role
//! - [`BatchRegistry`]: vaccine batches and their manufacturers
//! - [`signature`]: pure secp256k1 signer recovery
//! - [`CertificateEngine`]: certificate issuance, the per-batch status
//!   policy, and signature matching
//! - [`ColdChain`]: the four behind one atomic, admin-gated interface
//!
//! Core invariants:
//! - Every mutation is admin-gated through [`AccessControl`]
//! - Records are append-only; ids are sequential from 0 and never reused
//! - A failed operation leaves all state unchanged
//! - Certificates store the issuer's signature verbatim
//!
//! ```rust
//! use coldchain_canonical::{message_hash, Identity};
//! use coldchain_core::{ColdChain, EngineConfig, IssueCertificate, Role, Status};
//! use coldchain_core::signature::{identity_of, sign_prehash};
//! use k256::ecdsa::SigningKey;
//!
//! let admin = Identity::from_bytes([0xaa; 20]);
//! let inspector_key = SigningKey::from_slice(&[7u8; 32])?;
//! let inspector = identity_of(inspector_key.verifying_key());
//! let manufacturer = Identity::from_bytes([0x01; 20]);
//!
//! let mut chain = ColdChain::new(EngineConfig::new(admin));
//! chain.add_entity(inspector, Role::Issuer, admin)?;
//! chain.add_entity(manufacturer, Role::Prover, admin)?;
//! let batch = chain.add_vaccine_batch("Moderna", manufacturer, admin)?.value;
//!
//! let hash = message_hash("batch #0 is manufactured");
//! let signature = sign_prehash(&inspector_key, &hash)?;
//! let request = IssueCertificate::new(inspector, manufacturer, Status::Manufactured, signature)
//!     .for_batch(batch);
//! let certificate = chain.issue_certificate(request, admin)?.value;
//!
//! assert!(chain.is_matching_signature(&hash, certificate, inspector, admin)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(missing_docs)]

/// Administrator capability.
pub mod access;
/// Vaccine batch registry.
pub mod batch;
/// Certificate issuance and matching.
pub mod certificate;
/// Facade, operations and transactions.
pub mod chain;
/// Engine configuration.
pub mod config;
/// Error types for core operations.
pub mod errors;
/// Notifications emitted by mutations.
pub mod events;
/// Participant registry.
pub mod identity;
/// Records and closed enumerations.
pub mod model;
/// Pure signer recovery.
pub mod signature;

pub use access::AccessControl;
pub use batch::{BatchLookup, BatchRegistry};
pub use certificate::{CertificateEngine, IssueCertificate};
pub use chain::{ColdChain, Operation, SharedColdChain, Transaction};
pub use config::EngineConfig;
pub use errors::{CoreError, RecordKind};
pub use events::{LedgerEvent, Receipt};
pub use identity::{EntityLookup, IdentityRegistry};
pub use model::{BatchId, Certificate, CertificateId, Entity, Role, Status, VaccineBatch};
pub use signature::SignatureScheme;
