use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::{CategoryRecord, OwnerId, TransactionRecord};
use crate::errors::LedgerError;

use super::{LedgerSource, Snapshot};

/// Reads rows from a JSON export (`{"categories": [...], "transactions": [...]}`).
///
/// The file is re-read on every fetch so a host can refresh it between loads.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Snapshot, LedgerError> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn write(&self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&tmp, json)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl LedgerSource for JsonSnapshotSource {
    fn fetch_categories(&self, owner: &OwnerId) -> Result<Vec<CategoryRecord>, LedgerError> {
        self.read()?.fetch_categories(owner)
    }

    fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>, LedgerError> {
        self.read()?.fetch_transactions(owner)
    }
}
