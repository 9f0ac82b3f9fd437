//! Seam towards the remote system of record.
//!
//! The ledger never fetches anything itself; a host hands it the rows returned
//! by a [`LedgerSource`] for the signed-in owner.

pub mod json_snapshot;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{CategoryRecord, OwnerId, TransactionRecord};
use crate::errors::LedgerError;
use crate::ledger::Ledger;

pub use json_snapshot::JsonSnapshotSource;

/// Bulk reads of one owner's rows.
pub trait LedgerSource: Send + Sync {
    fn fetch_categories(&self, owner: &OwnerId) -> Result<Vec<CategoryRecord>, LedgerError>;
    fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>, LedgerError>;
}

/// Rows of every owner as exported from the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl LedgerSource for Snapshot {
    fn fetch_categories(&self, owner: &OwnerId) -> Result<Vec<CategoryRecord>, LedgerError> {
        Ok(self
            .categories
            .iter()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }

    fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>, LedgerError> {
        Ok(self
            .transactions
            .iter()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }
}

impl Ledger {
    /// Replaces the ledger with `owner`'s rows from `source`.
    pub fn load_from_source<S>(&mut self, source: &S, owner: &OwnerId) -> Result<(), LedgerError>
    where
        S: LedgerSource + ?Sized,
    {
        let categories = source.fetch_categories(owner)?;
        let transactions = source.fetch_transactions(owner)?;
        info!(
            owner = %owner,
            categories = categories.len(),
            transactions = transactions.len(),
            "fetched ledger rows"
        );
        self.load_records(transactions, categories)?;
        Ok(())
    }
}
