//! Change notifications forwarded by the host from the remote data source.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, CategoryId, CategoryRecord, Transaction, TransactionId, TransactionRecord};
use crate::errors::ValidationError;

use super::Ledger;

/// One discrete insert, update or delete observed on the backend.
///
/// Inserts and updates share a variant since the ledger upserts by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    TransactionUpserted { record: TransactionRecord },
    TransactionRemoved { id: TransactionId },
    CategoryUpserted { record: CategoryRecord },
    CategoryRemoved { id: CategoryId },
}

impl Ledger {
    /// Applies a change event. Only malformed records are rejected; deletes of
    /// unknown ids are no-ops.
    pub fn apply(&mut self, event: LedgerEvent) -> Result<(), ValidationError> {
        match event {
            LedgerEvent::TransactionUpserted { record } => {
                self.upsert_transaction(Transaction::try_from(record)?)
            }
            LedgerEvent::TransactionRemoved { id } => {
                self.remove_transaction(&id);
                Ok(())
            }
            LedgerEvent::CategoryUpserted { record } => {
                self.upsert_category(Category::try_from(record)?)
            }
            LedgerEvent::CategoryRemoved { id } => {
                self.remove_category(&id);
                Ok(())
            }
        }
    }

    /// Applies events in order, stopping at the first rejected one. Events
    /// before it stay applied.
    pub fn apply_all<I>(&mut self, events: I) -> Result<usize, ValidationError>
    where
        I: IntoIterator<Item = LedgerEvent>,
    {
        let mut applied = 0;
        for event in events {
            self.apply(event)?;
            applied += 1;
        }
        Ok(applied)
    }
}
