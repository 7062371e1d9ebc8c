//! Vaccine batch registry.

use coldchain_canonical::Identity;

use crate::access::AccessControl;
use crate::errors::CoreError;
use crate::events::{LedgerEvent, Receipt};
use crate::identity::EntityLookup;
use crate::model::{BatchId, Role, VaccineBatch};

/// Read access to registered batches.
pub trait BatchLookup {
    /// Returns the batch, if registered.
    fn get_batch(&self, id: BatchId) -> Option<&VaccineBatch>;
}

/// Append-only store of vaccine batches. A batch's id is its position.
#[derive(Debug, Clone)]
pub struct BatchRegistry {
    access: AccessControl,
    batches: Vec<VaccineBatch>,
}

impl BatchRegistry {
    /// Creates an empty registry administered by `access`.
    pub fn new(access: AccessControl) -> Self {
        Self {
            access,
            batches: Vec::new(),
        }
    }

    /// Registers a batch produced by `manufacturer` and returns its id.
    ///
    /// `manufacturer` is resolved through `entities` and must be a prover.
    pub fn add_vaccine_batch(
        &mut self,
        entities: &impl EntityLookup,
        brand: impl Into<String>,
        manufacturer: Identity,
        caller: Identity,
    ) -> Result<Receipt<BatchId>, CoreError> {
        self.access.ensure_admin(caller, "add vaccine batch")?;
        entities.require_role(manufacturer, Role::Prover)?;

        let id = BatchId(self.batches.len() as u64);
        self.batches.push(VaccineBatch {
            id,
            brand: brand.into(),
            manufacturer,
        });
        tracing::info!(vaccine_batch_id = %id, %manufacturer, "AddVaccineBatch");

        Ok(Receipt::new(
            id,
            LedgerEvent::AddVaccineBatch {
                vaccine_batch_id: id,
                manufacturer,
            },
        ))
    }

    /// Number of registered batches; also the next id to be allocated.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// True when no batch has been registered.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Batches in id order.
    pub fn iter(&self) -> impl Iterator<Item = &VaccineBatch> {
        self.batches.iter()
    }
}

impl BatchLookup for BatchRegistry {
    fn get_batch(&self, id: BatchId) -> Option<&VaccineBatch> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.batches.get(index))
    }
}
