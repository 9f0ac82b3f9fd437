#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use ledger_core::domain::{
    CategoryId, CategoryRecord, LabelColor, OwnerId, TransactionId, TransactionKind,
    TransactionRecord,
};
use ledger_core::source::{JsonSnapshotSource, Snapshot};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_path(file_name: &str) -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join(file_name);
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn category(owner: &str, id: i64, name: &str, color: LabelColor) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId::from(id),
        owner: OwnerId::from(owner),
        name: name.into(),
        color,
    }
}

pub fn transaction(
    owner: &str,
    id: &str,
    kind: TransactionKind,
    category_id: Option<i64>,
    amount: f64,
    date: &str,
) -> TransactionRecord {
    TransactionRecord {
        id: TransactionId::from(id),
        owner: OwnerId::from(owner),
        kind,
        name: format!("{kind} {id}"),
        category_id: category_id.map(CategoryId::from),
        amount,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date"),
        valid_until: None,
        location: None,
        rating: None,
    }
}

/// Two owners sharing one export, the way the backend dumps its tables.
pub fn shared_snapshot() -> Snapshot {
    Snapshot {
        categories: vec![
            category("ana", 1, "Mercado", LabelColor::Green),
            category("ana", 2, "Transporte", LabelColor::Blue),
            category("bia", 3, "Lazer", LabelColor::Pink),
        ],
        transactions: vec![
            transaction("ana", "t1", TransactionKind::Expense, Some(1), 120.4, "2024-03-02"),
            transaction("ana", "t2", TransactionKind::Expense, Some(2), 8.6, "2024-03-05"),
            transaction("ana", "t3", TransactionKind::Expense, None, 15.0, "2024-03-01"),
            transaction("bia", "t4", TransactionKind::Expense, Some(3), 60.0, "2024-03-03"),
        ],
    }
}

/// Writes `snapshot` to a fresh temp file and returns a source reading it.
pub fn snapshot_source(snapshot: &Snapshot) -> JsonSnapshotSource {
    let source = JsonSnapshotSource::new(temp_path("snapshot.json"));
    source.write(snapshot).expect("write snapshot fixture");
    source
}
