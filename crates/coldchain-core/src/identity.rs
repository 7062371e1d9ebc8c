//! Participant registry.

use coldchain_canonical::Identity;
use std::collections::BTreeMap;

use crate::access::AccessControl;
use crate::errors::CoreError;
use crate::events::{LedgerEvent, Receipt};
use crate::model::{Entity, Role};

/// Read access to registered participants.
pub trait EntityLookup {
    /// Returns the registered participant, if any.
    fn get_entity(&self, id: &Identity) -> Option<Entity>;

    /// Resolves `id` and checks it holds `expected`.
    fn require_role(&self, id: Identity, expected: Role) -> Result<Entity, CoreError> {
        match self.get_entity(&id) {
            Some(entity) if entity.mode == expected => Ok(entity),
            other => Err(CoreError::InvalidRole {
                identity: id,
                expected,
                actual: other.map(|entity| entity.mode),
            }),
        }
    }
}

/// Identity → role mapping. Records are never removed or changed.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    access: AccessControl,
    entities: BTreeMap<Identity, Entity>,
}

impl IdentityRegistry {
    /// Creates an empty registry administered by `access`.
    pub fn new(access: AccessControl) -> Self {
        Self {
            access,
            entities: BTreeMap::new(),
        }
    }

    /// Registers `id` with role `mode`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Unauthorized`] when `caller` is not the administrator
    /// - [`CoreError::DuplicateEntity`] when `id` is already registered
    pub fn add_entity(
        &mut self,
        id: Identity,
        mode: Role,
        caller: Identity,
    ) -> Result<Receipt<Entity>, CoreError> {
        self.access.ensure_admin(caller, "add entity")?;
        if let Some(existing) = self.entities.get(&id) {
            return Err(CoreError::DuplicateEntity {
                id,
                existing: existing.mode,
            });
        }

        let entity = Entity { id, mode };
        self.entities.insert(id, entity);
        tracing::info!(entity_id = %id, entity_mode = %mode, "AddEntity");

        Ok(Receipt::new(
            entity,
            LedgerEvent::AddEntity {
                entity_id: id,
                entity_mode: mode,
            },
        ))
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registered participants ordered by address.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

impl EntityLookup for IdentityRegistry {
    fn get_entity(&self, id: &Identity) -> Option<Entity> {
        self.entities.get(id).copied()
    }
}
