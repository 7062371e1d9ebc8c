//! The ledger-facing facade.

use coldchain_canonical::{Identity, MessageHash, SignatureBytes};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::access::AccessControl;
use crate::batch::{BatchLookup, BatchRegistry};
use crate::certificate::{CertificateEngine, IssueCertificate};
use crate::config::EngineConfig;
use crate::errors::CoreError;
use crate::events::{LedgerEvent, Receipt};
use crate::identity::{EntityLookup, IdentityRegistry};
use crate::model::{BatchId, Certificate, CertificateId, Entity, Role, Status, VaccineBatch};

/// A state-changing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Register a participant.
    AddEntity {
        /// Participant address.
        id: Identity,
        /// Role to assign.
        mode: Role,
    },
    /// Register a vaccine batch.
    AddVaccineBatch {
        /// Brand name.
        brand: String,
        /// Producing prover.
        manufacturer: Identity,
    },
    /// Store a certificate.
    IssueCertificate {
        /// Certifying issuer.
        issuer: Identity,
        /// Certified prover.
        prover: Identity,
        /// Attested custody stage.
        status: Status,
        /// Issuer's signature.
        signature: SignatureBytes,
        /// Linked batch, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        batch: Option<BatchId>,
    },
}

impl Operation {
    /// Short operation name.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::AddEntity { .. } => "add_entity",
            Operation::AddVaccineBatch { .. } => "add_vaccine_batch",
            Operation::IssueCertificate { .. } => "issue_certificate",
        }
    }
}

impl From<IssueCertificate> for Operation {
    fn from(request: IssueCertificate) -> Self {
        Operation::IssueCertificate {
            issuer: request.issuer,
            prover: request.prover,
            status: request.status,
            signature: request.signature,
            batch: request.batch,
        }
    }
}

/// An operation together with its authenticated submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Submitting identity, as attested by the substrate.
    pub caller: Identity,
    /// Requested operation.
    pub operation: Operation,
}

impl Transaction {
    /// Pairs `operation` with `caller`.
    pub fn new(caller: Identity, operation: Operation) -> Self {
        Self { caller, operation }
    }
}

/// Registries and certificate engine behind one atomic interface.
///
/// Mutations take `&mut self`, reads take `&self`; every mutation validates
/// fully before writing, so a returned error means nothing changed.
#[derive(Debug, Clone)]
pub struct ColdChain {
    config: EngineConfig,
    entities: IdentityRegistry,
    batches: BatchRegistry,
    certificates: CertificateEngine,
}

impl ColdChain {
    /// Creates an empty ledger state.
    pub fn new(config: EngineConfig) -> Self {
        let access = AccessControl::new(config.admin);
        Self {
            entities: IdentityRegistry::new(access),
            batches: BatchRegistry::new(access),
            certificates: CertificateEngine::new(
                access,
                config.enforce_monotonic_status,
                config.signature_scheme,
            ),
            config,
        }
    }

    /// Configuration the state was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a participant.
    pub fn add_entity(
        &mut self,
        id: Identity,
        mode: Role,
        caller: Identity,
    ) -> Result<Receipt<Entity>, CoreError> {
        self.entities.add_entity(id, mode, caller)
    }

    /// Registers a vaccine batch.
    pub fn add_vaccine_batch(
        &mut self,
        brand: impl Into<String>,
        manufacturer: Identity,
        caller: Identity,
    ) -> Result<Receipt<BatchId>, CoreError> {
        self.batches
            .add_vaccine_batch(&self.entities, brand, manufacturer, caller)
    }

    /// Issues a certificate.
    pub fn issue_certificate(
        &mut self,
        request: IssueCertificate,
        caller: Identity,
    ) -> Result<Receipt<CertificateId>, CoreError> {
        self.certificates
            .issue_certificate(&self.entities, &self.batches, request, caller)
    }

    /// Checks whether `expected_signer` produced the signature stored in
    /// certificate `certificate_id` over `message_hash`.
    pub fn is_matching_signature(
        &self,
        message_hash: &MessageHash,
        certificate_id: CertificateId,
        expected_signer: Identity,
        caller: Identity,
    ) -> Result<bool, CoreError> {
        self.certificates
            .is_matching_signature(message_hash, certificate_id, expected_signer, caller)
    }

    /// Applies a submitted transaction and returns the emitted notification.
    pub fn apply(&mut self, tx: &Transaction) -> Result<LedgerEvent, CoreError> {
        let span = tracing::debug_span!("apply", op = tx.operation.kind(), caller = %tx.caller);
        let _guard = span.enter();

        let event = match &tx.operation {
            Operation::AddEntity { id, mode } => self.add_entity(*id, *mode, tx.caller)?.event,
            Operation::AddVaccineBatch {
                brand,
                manufacturer,
            } => {
                self.add_vaccine_batch(brand.clone(), *manufacturer, tx.caller)?
                    .event
            }
            Operation::IssueCertificate {
                issuer,
                prover,
                status,
                signature,
                batch,
            } => {
                let request = IssueCertificate {
                    issuer: *issuer,
                    prover: *prover,
                    status: *status,
                    signature: signature.clone(),
                    batch: *batch,
                };
                self.issue_certificate(request, tx.caller)?.event
            }
        };
        Ok(event)
    }

    /// Registered participant, if any.
    pub fn entities(&self, id: &Identity) -> Option<Entity> {
        self.entities.get_entity(id)
    }

    /// Registered batch, if any.
    pub fn vaccine_batches(&self, id: BatchId) -> Option<&VaccineBatch> {
        self.batches.get_batch(id)
    }

    /// Issued certificate, if any.
    pub fn certificates(&self, id: CertificateId) -> Option<&Certificate> {
        self.certificates.get_certificate(id)
    }

    /// Certificates linked to `batch`, in issuance order.
    pub fn certificates_for_batch(&self, batch: BatchId) -> Vec<&Certificate> {
        self.certificates.certificates_for_batch(batch)
    }

    /// Custody stage of `batch` according to its latest certificate.
    pub fn current_status(&self, batch: BatchId) -> Option<Status> {
        self.certificates.current_status(batch)
    }

    /// Identity registry (read-only).
    pub fn identity_registry(&self) -> &IdentityRegistry {
        &self.entities
    }

    /// Batch registry (read-only).
    pub fn batch_registry(&self) -> &BatchRegistry {
        &self.batches
    }

    /// Certificate engine (read-only).
    pub fn certificate_engine(&self) -> &CertificateEngine {
        &self.certificates
    }
}

/// [`ColdChain`] shared between threads.
///
/// Mutations hold the write lock for their whole duration; reads share the
/// read lock and only ever observe committed state.
#[derive(Debug, Clone)]
pub struct SharedColdChain {
    inner: Arc<RwLock<ColdChain>>,
}

impl SharedColdChain {
    /// Wraps `chain` for shared use.
    pub fn new(chain: ColdChain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    /// Applies a transaction under the write lock.
    pub fn apply(&self, tx: &Transaction) -> Result<LedgerEvent, CoreError> {
        self.inner.write().apply(tx)
    }

    /// Runs `f` against a consistent snapshot under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&ColdChain) -> R) -> R {
        f(&self.inner.read())
    }

    /// Signature check under the read lock.
    pub fn is_matching_signature(
        &self,
        message_hash: &MessageHash,
        certificate_id: CertificateId,
        expected_signer: Identity,
        caller: Identity,
    ) -> Result<bool, CoreError> {
        self.inner
            .read()
            .is_matching_signature(message_hash, certificate_id, expected_signer, caller)
    }
}
