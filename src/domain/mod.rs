pub mod category;
pub mod common;
pub mod records;
pub mod transaction;

pub use category::{Category, LabelColor};
pub use common::{
    BelongsToCategory, CategoryId, Identifiable, OwnerId, TransactionId,
};
pub use records::{CategoryRecord, TransactionRecord};
pub use transaction::{Rating, Transaction, TransactionKind};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal;
pub use serde;
