use coldchain_canonical::{Identity, SignatureBytes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Participant role. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// May certify custody of a batch.
    Issuer,
    /// Subject of certification (manufacturers, carriers, holders).
    Prover,
    /// May check certificates.
    Verifier,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Role; 3] = [Role::Issuer, Role::Prover, Role::Verifier];

    /// Wire name, e.g. `ISSUER`.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Issuer => "ISSUER",
            Role::Prover => "PROVER",
            Role::Verifier => "VERIFIER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownValue {
                field: "role",
                value: s.to_string(),
            })
    }
}

impl TryFrom<u8> for Role {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Role::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| CoreError::UnknownValue {
                field: "role",
                value: value.to_string(),
            })
    }
}

/// Custody stage of a vaccine batch. Variants are ordered by progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Left the production line.
    Manufactured,
    /// In transit between countries.
    DeliveringInternational,
    /// In a storage facility.
    Stored,
    /// In transit to the point of care.
    DeliveringLocal,
    /// Handed over. Terminal.
    Delivered,
}

impl Status {
    /// All statuses in progression order.
    pub const ALL: [Status; 5] = [
        Status::Manufactured,
        Status::DeliveringInternational,
        Status::Stored,
        Status::DeliveringLocal,
        Status::Delivered,
    ];

    /// Wire name, e.g. `DELIVERING_LOCAL`.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Manufactured => "MANUFACTURED",
            Status::DeliveringInternational => "DELIVERING_INTERNATIONAL",
            Status::Stored => "STORED",
            Status::DeliveringLocal => "DELIVERING_LOCAL",
            Status::Delivered => "DELIVERED",
        }
    }

    /// Position in the progression (`MANUFACTURED == 0`).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The following custody stage, or `None` once delivered.
    pub fn next(self) -> Option<Status> {
        Status::ALL.get(self as usize + 1).copied()
    }

    /// True for the terminal stage.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| CoreError::UnknownValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

impl TryFrom<u8> for Status {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Status::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| CoreError::UnknownValue {
                field: "status",
                value: value.to_string(),
            })
    }
}

/// Sequential vaccine batch id, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub u64);

/// Sequential certificate id, starting at 0. Counted independently of batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Participant address.
    pub id: Identity,
    /// Role assigned at registration.
    pub mode: Role,
}

/// A registered vaccine batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineBatch {
    /// Sequential id.
    pub id: BatchId,
    /// Brand name, e.g. `Pfizer-BioNTech`.
    pub brand: String,
    /// Producing participant; a prover when the batch was added.
    pub manufacturer: Identity,
}

/// A stored custody attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Sequential id.
    pub id: CertificateId,
    /// Certifying participant, as registered at issuance.
    pub issuer: Entity,
    /// Certified participant, as registered at issuance.
    pub prover: Entity,
    /// Custody stage being attested.
    pub status: Status,
    /// Signature exactly as supplied at issuance.
    pub signature: SignatureBytes,
    /// Batch this certificate attests, when the issuer linked one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_progression_is_linear() {
        let mut stage = Status::Manufactured;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen, Status::ALL);
        assert!(Status::Delivered.is_terminal());
    }

    #[test]
    fn ordinals_match_wire_positions() {
        assert_eq!(Status::Manufactured.ordinal(), 0);
        assert_eq!(Status::Delivered.ordinal(), 4);
        assert_eq!(Status::try_from(2).unwrap(), Status::Stored);
        assert_eq!(Role::try_from(1).unwrap(), Role::Prover);
    }

    #[test]
    fn unknown_values_are_rejected_at_the_boundary() {
        assert!("ADMIN".parse::<Role>().is_err());
        assert!("LOST".parse::<Status>().is_err());
        assert!(Status::try_from(5).is_err());
        assert!(Role::try_from(3).is_err());
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("issuer".parse::<Role>().unwrap(), Role::Issuer);
        assert_eq!(
            "delivering-international".parse::<Status>().unwrap(),
            Status::DeliveringInternational
        );
    }

    #[test]
    fn enums_use_screaming_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(Status::DeliveringLocal).unwrap(),
            "DELIVERING_LOCAL"
        );
        assert_eq!(serde_json::to_value(Role::Verifier).unwrap(), "VERIFIER");
    }
}
