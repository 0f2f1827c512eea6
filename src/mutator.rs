// Batch field assignment across every record of an entity, done by the
// store in one statement without loading the records.
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::persist::Store;
use crate::record::{Entity, Field, FieldValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    field: Field,
    value: FieldValue,
}
impl Assignment {
    pub fn new(field: Field, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
    pub fn field(&self) -> Field {
        self.field
    }
    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

pub struct BulkMutator {
    store: Arc<dyn Store>,
}
impl BulkMutator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
    /// Applies the assignments to all records of `entity`, returning the affected count.
    pub fn bulk_update(&self, entity: Entity, assignments: &[Assignment]) -> Result<usize> {
        self.store.batch_update(entity, assignments)
    }
    /// Marks every venue as a favorite.
    pub fn normalize_favorites(&self) -> Result<usize> {
        let affected = self.bulk_update(Entity::Venue, &[Assignment::new(Field::Favorite, true)])?;
        info!(affected, "favorites normalized");
        Ok(affected)
    }
}
