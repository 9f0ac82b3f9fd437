//! Row shapes delivered by the remote data source.
//!
//! The backend stores amounts as floating point numbers and uses a mix of
//! numeric and text keys. Records are converted into domain types before they
//! reach the ledger, which is where malformed rows are rejected.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::currency;
use crate::domain::category::{Category, LabelColor};
use crate::domain::common::*;
use crate::domain::transaction::{Rating, Transaction, TransactionKind};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRecord {
    pub id: CategoryId,
    #[serde(alias = "user_id")]
    pub owner: OwnerId,
    pub name: String,
    #[serde(default)]
    pub color: LabelColor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: TransactionId,
    #[serde(alias = "user_id")]
    pub owner: OwnerId,
    pub kind: TransactionKind,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = ValidationError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        let category = Category {
            id: record.id,
            owner: record.owner,
            name: record.name,
            color: record.color,
        };
        category.validate()?;
        Ok(category)
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = ValidationError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let amount = currency::amount_from_f64(record.amount)?;
        let rating = record.rating.map(Rating::new).transpose()?;
        let location = record
            .location
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let transaction = Transaction {
            id: record.id,
            owner: record.owner,
            kind: record.kind,
            name: record.name,
            category_id: record.category_id,
            amount,
            date: record.date,
            valid_until: record.valid_until,
            location,
            rating,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

impl From<Category> for CategoryRecord {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            owner: category.owner,
            name: category.name,
            color: category.color,
        }
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(txn: Transaction) -> Self {
        Self {
            id: txn.id,
            owner: txn.owner,
            kind: txn.kind,
            name: txn.name,
            category_id: txn.category_id,
            // cent-scaled decimals always fit an f64
            amount: txn.amount.to_f64().unwrap_or_default(),
            date: txn.date,
            valid_until: txn.valid_until,
            location: txn.location,
            rating: txn.rating.map(u8::from),
        }
    }
}

/// Converts a batch of rows, stopping at the first malformed one.
pub fn convert_all<R, T>(records: Vec<R>) -> Result<Vec<T>, ValidationError>
where
    T: TryFrom<R, Error = ValidationError>,
{
    records.into_iter().map(T::try_from).collect()
}
