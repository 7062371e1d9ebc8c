//! Sequential-scan views over the record history.

use coldchain_canonical::Identity;
use coldchain_core::{BatchId, CertificateId, LedgerEvent, Operation, Status};

use crate::error::StoreError;
use crate::record::LedgerRecord;
use crate::traits::StoreReader;

/// One certificate in a batch's custody trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustodyStep {
    /// Height of the issuing record.
    pub height: u64,
    /// Issued certificate.
    pub certificate_id: CertificateId,
    /// Certifying issuer.
    pub issuer: Identity,
    /// Certified prover.
    pub prover: Identity,
    /// Attested stage.
    pub status: Status,
}

/// Finds the record that issued `certificate_id`.
pub fn resolve_certificate<R: StoreReader>(
    mut reader: R,
    certificate_id: CertificateId,
) -> Result<Option<LedgerRecord>, StoreError> {
    while let Some(record) = reader.read_next()? {
        if matches!(
            record.event,
            LedgerEvent::IssueCertificate { certificate_id: id, .. } if id == certificate_id
        ) {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Certificates linked to `batch`, in issuance order.
pub fn custody_trail<R: StoreReader>(
    mut reader: R,
    batch: BatchId,
) -> Result<Vec<CustodyStep>, StoreError> {
    let mut trail = Vec::new();
    while let Some(record) = reader.read_next()? {
        if let (
            Operation::IssueCertificate {
                status,
                batch: Some(linked),
                ..
            },
            LedgerEvent::IssueCertificate {
                issuer,
                prover,
                certificate_id,
            },
        ) = (&record.transaction.operation, &record.event)
        {
            if *linked == batch {
                trail.push(CustodyStep {
                    height: record.height,
                    certificate_id: *certificate_id,
                    issuer: *issuer,
                    prover: *prover,
                    status: *status,
                });
            }
        }
    }
    Ok(trail)
}
