//! The category-aggregated transaction ledger.

pub mod events;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod query;

pub use events::LedgerEvent;
pub use ledger::{Ledger, LedgerState, Tally, DEFAULT_UNCATEGORIZED_LABEL};
pub use query::{LedgerQuery, SortKey};
