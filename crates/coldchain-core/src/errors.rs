use coldchain_canonical::Identity;
use std::fmt;
use thiserror::Error;

use crate::model::{BatchId, Role, Status};

/// Kind of sequentially numbered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Vaccine batch.
    Batch,
    /// Certificate.
    Certificate,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Batch => f.write_str("vaccine batch"),
            RecordKind::Certificate => f.write_str("certificate"),
        }
    }
}

fn describe_role(role: &Option<Role>) -> String {
    match role {
        Some(role) => role.to_string(),
        None => "unregistered".to_string(),
    }
}

/// Errors raised by the attestation subsystem.
///
/// A failed operation never changes stored state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Caller is not the configured administrator.
    #[error("{caller} is not authorized to {operation}")]
    Unauthorized {
        /// Rejected caller.
        caller: Identity,
        /// Attempted operation.
        operation: &'static str,
    },
    /// Identity is already registered.
    #[error("entity {id} is already registered as {existing}")]
    DuplicateEntity {
        /// Identity that was re-submitted.
        id: Identity,
        /// Role it already holds.
        existing: Role,
    },
    /// Referenced identity lacks the required role or is not registered.
    #[error("{identity} must be {expected}, found {}", describe_role(.actual))]
    InvalidRole {
        /// Referenced identity.
        identity: Identity,
        /// Role the operation requires.
        expected: Role,
        /// Registered role, if any.
        actual: Option<Role>,
    },
    /// Signature bytes cannot be parsed as a recoverable signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// Referenced batch or certificate does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind.
        kind: RecordKind,
        /// Requested id.
        id: u64,
    },
    /// Monotonic policy rejected a status earlier than the batch's current one.
    #[error("batch {batch} is {current}; cannot certify {requested}")]
    StatusRegression {
        /// Batch being certified.
        batch: BatchId,
        /// Status of the batch's latest certificate.
        current: Status,
        /// Status in the rejected request.
        requested: Status,
    },
    /// A role or status value outside the closed enumeration.
    #[error("unknown {field} '{value}'")]
    UnknownValue {
        /// Field being parsed.
        field: &'static str,
        /// Offending input.
        value: String,
    },
    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}
