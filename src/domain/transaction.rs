//! Domain models for expense and income records.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::errors::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner: OwnerId,
    pub kind: TransactionKind,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Stored unsigned for both kinds; see [`Transaction::signed_amount`].
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Transaction {
    pub fn new(
        owner: OwnerId,
        kind: TransactionKind,
        name: impl Into<String>,
        category_id: Option<CategoryId>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            owner,
            kind,
            name: name.into(),
            category_id,
            amount,
            date,
            valid_until: None,
            location: None,
            rating: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = id.into();
        self
    }

    /// Amount as shown to the user: expenses negative, incomes positive.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Expense => -self.amount,
            TransactionKind::Income => self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty("transaction", "name"));
        }
        Ok(())
    }
}

impl Identifiable for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &TransactionId {
        &self.id
    }
}

impl BelongsToCategory for Transaction {
    fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }
}

/// Polarity of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        };
        f.write_str(label)
    }
}

/// Zero to five star rating attached to a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, ValidationError> {
        if stars > Self::MAX {
            return Err(ValidationError::RatingOutOfRange(stars));
        }
        Ok(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: TransactionKind) -> Transaction {
        Transaction::new(
            OwnerId::from("u1"),
            kind,
            "Lunch",
            None,
            Decimal::new(4250, 2),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        )
    }

    #[test]
    fn expenses_display_negative() {
        assert_eq!(
            sample(TransactionKind::Expense).signed_amount(),
            Decimal::new(-4250, 2)
        );
        assert_eq!(
            sample(TransactionKind::Income).signed_amount(),
            Decimal::new(4250, 2)
        );
    }

    #[test]
    fn rating_above_five_is_rejected() {
        assert_eq!(Rating::new(6), Err(ValidationError::RatingOutOfRange(6)));
        assert_eq!(Rating::new(5).map(Rating::stars), Ok(5));
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn empty_name_fails_validation() {
        let mut txn = sample(TransactionKind::Expense);
        txn.name = String::new();
        assert!(matches!(
            txn.validate(),
            Err(ValidationError::EmptyField { field: "name", .. })
        ));
    }
}
