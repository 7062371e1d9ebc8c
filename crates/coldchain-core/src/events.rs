use coldchain_canonical::Identity;
use serde::{Deserialize, Serialize};

use crate::model::{BatchId, CertificateId, Role};

/// Notification emitted by a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// A participant was registered.
    AddEntity {
        /// Registered identity.
        entity_id: Identity,
        /// Assigned role.
        entity_mode: Role,
    },
    /// A vaccine batch was registered.
    AddVaccineBatch {
        /// Allocated batch id.
        vaccine_batch_id: BatchId,
        /// Declared manufacturer.
        manufacturer: Identity,
    },
    /// A certificate was stored.
    IssueCertificate {
        /// Certifying participant.
        issuer: Identity,
        /// Certified participant.
        prover: Identity,
        /// Allocated certificate id.
        certificate_id: CertificateId,
    },
}

impl LedgerEvent {
    /// Event name as subscribers see it.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::AddEntity { .. } => "AddEntity",
            LedgerEvent::AddVaccineBatch { .. } => "AddVaccineBatch",
            LedgerEvent::IssueCertificate { .. } => "IssueCertificate",
        }
    }
}

/// Result of a committed mutation together with the notification it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<T> {
    /// Value returned by the operation.
    pub value: T,
    /// Emitted notification.
    pub event: LedgerEvent,
}

impl<T> Receipt<T> {
    pub(crate) fn new(value: T, event: LedgerEvent) -> Self {
        Self { value, event }
    }
}
