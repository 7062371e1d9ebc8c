use coldchain_canonical::Identity;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Administrator capability checked before every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    admin: Identity,
}

impl AccessControl {
    /// Grants mutation rights to `admin` only.
    pub fn new(admin: Identity) -> Self {
        Self { admin }
    }

    /// The configured administrator.
    pub fn admin(&self) -> Identity {
        self.admin
    }

    /// Fails with [`CoreError::Unauthorized`] unless `caller` is the administrator.
    pub fn ensure_admin(
        &self,
        caller: Identity,
        operation: &'static str,
    ) -> Result<(), CoreError> {
        if caller == self.admin {
            Ok(())
        } else {
            tracing::warn!(%caller, operation, "rejected non-admin caller");
            Err(CoreError::Unauthorized { caller, operation })
        }
    }
}
