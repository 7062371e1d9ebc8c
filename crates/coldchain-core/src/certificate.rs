//! Certificate issuance and signature matching.
//!
//! The engine stores certificates verbatim and never checks at issuance who
//! signed them; authorship is answered later by [`CertificateEngine::is_matching_signature`].
//! When a certificate names a batch, the engine keeps that batch's
//! certificates in issuance order, which doubles as the batch's custody
//! cursor for the monotonic status policy.

use coldchain_canonical::{Identity, MessageHash, SignatureBytes};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::access::AccessControl;
use crate::batch::BatchLookup;
use crate::errors::{CoreError, RecordKind};
use crate::events::{LedgerEvent, Receipt};
use crate::identity::EntityLookup;
use crate::model::{BatchId, Certificate, CertificateId, Role, Status};
use crate::signature::{self, SignatureScheme};

/// Parameters of a certificate issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCertificate {
    /// Certifying participant; must be an issuer.
    pub issuer: Identity,
    /// Certified participant; must be a prover.
    pub prover: Identity,
    /// Custody stage being attested.
    pub status: Status,
    /// Issuer's signature over the certification message hash.
    pub signature: SignatureBytes,
    /// Batch being certified, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchId>,
}

impl IssueCertificate {
    /// Request without a batch link.
    pub fn new(
        issuer: Identity,
        prover: Identity,
        status: Status,
        signature: SignatureBytes,
    ) -> Self {
        Self {
            issuer,
            prover,
            status,
            signature,
            batch: None,
        }
    }

    /// Links the certificate to `batch`.
    pub fn for_batch(mut self, batch: BatchId) -> Self {
        self.batch = Some(batch);
        self
    }
}

/// Issues, stores and checks custody certificates.
#[derive(Debug, Clone)]
pub struct CertificateEngine {
    access: AccessControl,
    enforce_monotonic_status: bool,
    scheme: SignatureScheme,
    certificates: Vec<Certificate>,
    by_batch: BTreeMap<BatchId, Vec<CertificateId>>,
}

impl CertificateEngine {
    /// Creates an empty engine.
    pub fn new(
        access: AccessControl,
        enforce_monotonic_status: bool,
        scheme: SignatureScheme,
    ) -> Self {
        Self {
            access,
            enforce_monotonic_status,
            scheme,
            certificates: Vec::new(),
            by_batch: BTreeMap::new(),
        }
    }

    /// Validates `request` and stores it as the next certificate.
    ///
    /// Checks run in this order and the first failure is returned with no
    /// state change: administrator, issuer role, prover role, signature
    /// shape, batch existence, monotonic status.
    pub fn issue_certificate(
        &mut self,
        entities: &impl EntityLookup,
        batches: &impl BatchLookup,
        request: IssueCertificate,
        caller: Identity,
    ) -> Result<Receipt<CertificateId>, CoreError> {
        self.access.ensure_admin(caller, "issue certificate")?;
        let issuer = entities.require_role(request.issuer, Role::Issuer)?;
        let prover = entities.require_role(request.prover, Role::Prover)?;
        signature::check_shape(&request.signature)?;

        if let Some(batch) = request.batch {
            if batches.get_batch(batch).is_none() {
                return Err(CoreError::NotFound {
                    kind: RecordKind::Batch,
                    id: batch.0,
                });
            }
            if self.enforce_monotonic_status {
                if let Some(current) = self.current_status(batch) {
                    if request.status < current {
                        return Err(CoreError::StatusRegression {
                            batch,
                            current,
                            requested: request.status,
                        });
                    }
                }
            }
        }

        let id = CertificateId(self.certificates.len() as u64);
        self.certificates.push(Certificate {
            id,
            issuer,
            prover,
            status: request.status,
            signature: request.signature,
            batch: request.batch,
        });
        if let Some(batch) = request.batch {
            self.by_batch.entry(batch).or_default().push(id);
        }
        tracing::info!(
            certificate_id = %id,
            issuer = %issuer.id,
            prover = %prover.id,
            status = %request.status,
            "IssueCertificate"
        );

        Ok(Receipt::new(
            id,
            LedgerEvent::IssueCertificate {
                issuer: issuer.id,
                prover: prover.id,
                certificate_id: id,
            },
        ))
    }

    /// Returns `true` iff the stored signature of `certificate_id`, recovered
    /// over `message_hash`, belongs to `expected_signer`.
    ///
    /// The hash is taken as given; binding it to a particular certification
    /// message is a convention between issuer and verifier. A signature from
    /// which no key recovers matches nobody.
    pub fn is_matching_signature(
        &self,
        message_hash: &MessageHash,
        certificate_id: CertificateId,
        expected_signer: Identity,
        caller: Identity,
    ) -> Result<bool, CoreError> {
        let certificate = self.get_certificate(certificate_id).ok_or(CoreError::NotFound {
            kind: RecordKind::Certificate,
            id: certificate_id.0,
        })?;

        let digest = self.scheme.signed_digest(message_hash);
        let matches = match signature::recover_signer(&digest, &certificate.signature) {
            Ok(recovered) => recovered == expected_signer,
            Err(e) => {
                tracing::debug!(%certificate_id, error = %e, "signer recovery failed");
                false
            }
        };
        tracing::debug!(%certificate_id, %expected_signer, %caller, matches, "signature check");
        Ok(matches)
    }

    /// Returns the certificate, if issued.
    pub fn get_certificate(&self, id: CertificateId) -> Option<&Certificate> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.certificates.get(index))
    }

    /// Certificates linked to `batch`, in issuance order.
    pub fn certificates_for_batch(&self, batch: BatchId) -> Vec<&Certificate> {
        self.by_batch
            .get(&batch)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get_certificate(*id))
            .collect()
    }

    /// Status of the latest certificate linked to `batch`.
    pub fn current_status(&self, batch: BatchId) -> Option<Status> {
        self.by_batch
            .get(&batch)
            .and_then(|ids| ids.last())
            .and_then(|id| self.get_certificate(*id))
            .map(|certificate| certificate.status)
    }

    /// Number of issued certificates; also the next id to be allocated.
    pub fn certificate_count(&self) -> usize {
        self.certificates.len()
    }

    /// Certificates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter()
    }

    /// Signing convention used for matching.
    pub fn signature_scheme(&self) -> SignatureScheme {
        self.scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchRegistry;
    use crate::identity::IdentityRegistry;
    use crate::model::Entity;

    fn id(byte: u8) -> Identity {
        Identity::from_bytes([byte; 20])
    }

    /// A syntactically valid signature; nobody in particular signed it.
    fn junk_signature() -> SignatureBytes {
        let mut bytes = vec![0x11u8; 65];
        bytes[64] = 27;
        SignatureBytes::new(bytes)
    }

    struct Fixture {
        entities: IdentityRegistry,
        batches: BatchRegistry,
        engine: CertificateEngine,
    }

    fn fixture(monotonic: bool) -> Fixture {
        let access = AccessControl::new(id(0));
        let mut entities = IdentityRegistry::new(access);
        entities.add_entity(id(1), Role::Issuer, id(0)).unwrap();
        entities.add_entity(id(2), Role::Prover, id(0)).unwrap();
        entities.add_entity(id(3), Role::Verifier, id(0)).unwrap();
        let mut batches = BatchRegistry::new(access);
        batches
            .add_vaccine_batch(&entities, "Pfizer-BioNTech", id(2), id(0))
            .unwrap();
        Fixture {
            entities,
            batches,
            engine: CertificateEngine::new(access, monotonic, SignatureScheme::Raw),
        }
    }

    impl Fixture {
        fn issue(&mut self, request: IssueCertificate) -> Result<CertificateId, CoreError> {
            self.engine
                .issue_certificate(&self.entities, &self.batches, request, id(0))
                .map(|receipt| receipt.value)
        }
    }

    #[test]
    fn stores_certificate_verbatim() {
        let mut f = fixture(false);
        let sig = junk_signature();
        let cid = f
            .issue(IssueCertificate::new(id(1), id(2), Status::Manufactured, sig.clone()))
            .unwrap();

        assert_eq!(cid, CertificateId(0));
        let stored = f.engine.get_certificate(cid).unwrap();
        assert_eq!(stored.issuer, Entity { id: id(1), mode: Role::Issuer });
        assert_eq!(stored.prover, Entity { id: id(2), mode: Role::Prover });
        assert_eq!(stored.signature, sig);
        assert_eq!(stored.status, Status::Manufactured);
        assert_eq!(stored.batch, None);
    }

    #[test]
    fn role_gating() {
        let mut f = fixture(false);
        let swapped = f.issue(IssueCertificate::new(
            id(2),
            id(1),
            Status::Stored,
            junk_signature(),
        ));
        assert!(matches!(
            swapped,
            Err(CoreError::InvalidRole { expected: Role::Issuer, .. })
        ));
        let verifier_as_prover =
            f.issue(IssueCertificate::new(id(1), id(3), Status::Stored, junk_signature()));
        assert!(matches!(
            verifier_as_prover,
            Err(CoreError::InvalidRole { expected: Role::Prover, .. })
        ));
        assert_eq!(f.engine.certificate_count(), 0);
    }

    #[test]
    fn malformed_signature_is_rejected() {
        let mut f = fixture(false);
        let err = f
            .issue(IssueCertificate::new(
                id(1),
                id(2),
                Status::Stored,
                SignatureBytes::new(vec![1, 2, 3]),
            ))
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedSignature(_)));
    }

    #[test]
    fn unknown_batch_is_not_found() {
        let mut f = fixture(false);
        let err = f
            .issue(
                IssueCertificate::new(id(1), id(2), Status::Stored, junk_signature())
                    .for_batch(BatchId(42)),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::NotFound {
                kind: RecordKind::Batch,
                id: 42
            }
        );
    }

    #[test]
    fn regression_allowed_without_policy() {
        let mut f = fixture(false);
        for status in [Status::Stored, Status::Manufactured] {
            let request =
                IssueCertificate::new(id(1), id(2), status, junk_signature()).for_batch(BatchId(0));
            f.issue(request).unwrap();
        }
        assert_eq!(f.engine.current_status(BatchId(0)), Some(Status::Manufactured));
    }

    #[test]
    fn regression_rejected_with_policy() {
        let mut f = fixture(true);
        let batch = BatchId(0);
        for status in [Status::Manufactured, Status::Stored, Status::Stored] {
            f.issue(IssueCertificate::new(id(1), id(2), status, junk_signature()).for_batch(batch))
                .unwrap();
        }
        let late = IssueCertificate::new(
            id(1),
            id(2),
            Status::DeliveringInternational,
            junk_signature(),
        )
        .for_batch(batch);
        let err = f.issue(late).unwrap_err();
        assert_eq!(
            err,
            CoreError::StatusRegression {
                batch,
                current: Status::Stored,
                requested: Status::DeliveringInternational
            }
        );
        assert_eq!(f.engine.certificates_for_batch(batch).len(), 3);

        // Unlinked certificates are never checked.
        assert!(f
            .issue(IssueCertificate::new(id(1), id(2), Status::Manufactured, junk_signature()))
            .is_ok());
    }

    #[test]
    fn matching_unknown_certificate_is_not_found() {
        let f = fixture(false);
        let err = f
            .engine
            .is_matching_signature(
                &MessageHash::from_bytes([0; 32]),
                CertificateId(0),
                id(1),
                id(3),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::NotFound {
                kind: RecordKind::Certificate,
                id: 0
            }
        );
    }
}
