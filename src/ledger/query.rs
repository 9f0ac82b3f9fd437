use serde::{Deserialize, Serialize};

use crate::domain::CategoryId;

/// Ordering applied to query results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Amount,
    /// Resolved category label, compared case-insensitively.
    Category,
}

/// Filter and ordering options for [`Ledger::query`](super::Ledger::query).
///
/// An empty query returns every transaction in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LedgerQuery {
    /// Case-insensitive substring matched literally against the resolved
    /// category label. Whitespace is not trimmed; an empty string matches all.
    pub search_text: Option<String>,
    pub category_id: Option<CategoryId>,
    pub sort_by: Option<SortKey>,
    /// Defaults to ascending when unset.
    pub ascending: Option<bool>,
}

impl LedgerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn in_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(id.into());
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_by = Some(key);
        self
    }

    pub fn ascending(mut self) -> Self {
        self.ascending = Some(true);
        self
    }

    pub fn descending(mut self) -> Self {
        self.ascending = Some(false);
        self
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending.unwrap_or(true)
    }
}
