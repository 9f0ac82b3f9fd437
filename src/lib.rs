#![doc(test(attr(deny(warnings))))]

//! Ledger Core keeps an owner's expenses or incomes and their categories in
//! memory and answers the totals, per-category subtotals and filtered lists
//! that statement screens and charts render.
//!
//! ```
//! use ledger_core::domain::{Category, LabelColor, OwnerId, Transaction, TransactionKind};
//! use ledger_core::ledger::{Ledger, LedgerQuery, SortKey};
//! use rust_decimal::Decimal;
//!
//! let owner = OwnerId::from("user-1");
//! let food = Category::new(owner.clone(), "Food", LabelColor::Red).with_id(1);
//! let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let lunch = Transaction::new(
//!     owner,
//!     TransactionKind::Expense,
//!     "Lunch",
//!     Some(food.id.clone()),
//!     Decimal::from(50),
//!     date,
//! );
//!
//! let mut ledger = Ledger::new();
//! ledger.load(vec![lunch], vec![food]).unwrap();
//! assert_eq!(ledger.total(), Decimal::from(50));
//! assert_eq!(ledger.query(&LedgerQuery::new().sort_by(SortKey::Amount)).len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod ledger;
pub mod source;
pub mod utils;

pub use errors::{LedgerError, ValidationError};
pub use ledger::Ledger;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(
            build = %utils::build_info::current().summary(),
            "Ledger Core tracing initialized."
        );
    });
}
