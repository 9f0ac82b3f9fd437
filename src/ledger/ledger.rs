use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{
    BelongsToCategory, Category, CategoryId, CategoryRecord, Identifiable, Transaction,
    TransactionId, TransactionRecord,
};
use crate::domain::records::convert_all;
use crate::errors::ValidationError;

use super::query::{LedgerQuery, SortKey};

/// Label shown for transactions whose category is unset or no longer exists.
pub const DEFAULT_UNCATEGORIZED_LABEL: &str = "Sem orçamento";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    /// No data has been loaded yet; every read behaves as if empty.
    Empty,
    Loaded,
}

/// Running sum and record count for one bucket of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: Decimal,
    pub count: usize,
}

impl Tally {
    fn credit(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
    }

    fn debit(&mut self, amount: Decimal) {
        self.total -= amount;
        self.count = self.count.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    seq: u64,
    value: T,
}

/// In-memory view over one owner's transactions and categories.
///
/// Totals are maintained incrementally: bulk loads recompute them in one pass,
/// single mutations adjust them by the delta of the affected record. Category
/// removal never touches transactions, so orphaned records keep counting
/// towards their old category id and render with the fallback label.
#[derive(Debug, Clone)]
pub struct Ledger {
    state: LedgerState,
    transactions: HashMap<TransactionId, Slot<Transaction>>,
    categories: HashMap<CategoryId, Slot<Category>>,
    total: Decimal,
    /// Sum of absolute amounts. Every tally is a partial sum bounded by it, so
    /// checking this one value keeps all running sums in range.
    gross: Decimal,
    tallies: HashMap<CategoryId, Tally>,
    unassigned: Tally,
    next_seq: u64,
    uncategorized_label: String,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_uncategorized_label(DEFAULT_UNCATEGORIZED_LABEL)
    }

    pub fn with_uncategorized_label(label: impl Into<String>) -> Self {
        Self {
            state: LedgerState::Empty,
            transactions: HashMap::new(),
            categories: HashMap::new(),
            total: Decimal::ZERO,
            gross: Decimal::ZERO,
            tallies: HashMap::new(),
            unassigned: Tally::default(),
            next_seq: 0,
            uncategorized_label: label.into(),
        }
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LedgerState::Loaded
    }

    pub fn uncategorized_label(&self) -> &str {
        &self.uncategorized_label
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Replaces the whole state. The input is validated before anything is
    /// touched, so a rejected batch leaves the previous view intact.
    pub fn load(
        &mut self,
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
    ) -> Result<(), ValidationError> {
        validate_batch(&transactions, &categories).map_err(log_rejection)?;

        self.transactions.clear();
        self.categories.clear();
        self.tallies.clear();
        self.total = Decimal::ZERO;
        self.gross = Decimal::ZERO;
        self.unassigned = Tally::default();
        self.next_seq = 0;

        for category in categories {
            let seq = self.bump_seq();
            self.categories.insert(
                category.id.clone(),
                Slot {
                    seq,
                    value: category,
                },
            );
        }
        for txn in transactions {
            self.credit(&txn);
            let seq = self.bump_seq();
            self.transactions
                .insert(txn.id.clone(), Slot { seq, value: txn });
        }
        self.state = LedgerState::Loaded;
        debug!(
            transactions = self.transactions.len(),
            categories = self.categories.len(),
            total = %self.total,
            "ledger loaded"
        );
        Ok(())
    }

    /// Converts backend rows and loads them, rejecting the batch on the first
    /// malformed row.
    pub fn load_records(
        &mut self,
        transactions: Vec<TransactionRecord>,
        categories: Vec<CategoryRecord>,
    ) -> Result<(), ValidationError> {
        let transactions = convert_all(transactions).map_err(log_rejection)?;
        let categories = convert_all(categories).map_err(log_rejection)?;
        self.load(transactions, categories)
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of the transactions pointing at `id`; zero when nothing does.
    pub fn category_total(&self, id: &CategoryId) -> Decimal {
        self.tallies
            .get(id)
            .map(|tally| tally.total)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn category_tally(&self, id: &CategoryId) -> Tally {
        self.tallies.get(id).copied().unwrap_or_default()
    }

    /// Sum of transactions with no category or a category missing from the catalog.
    pub fn uncategorized_total(&self) -> Decimal {
        self.uncategorized_tally().total
    }

    pub fn uncategorized_tally(&self) -> Tally {
        self.tallies
            .iter()
            .filter(|(id, _)| !self.categories.contains_key(*id))
            .fold(self.unassigned, |mut acc, (_, tally)| {
                acc.total += tally.total;
                acc.count += tally.count;
                acc
            })
    }

    /// Inserts or replaces by id. A replaced record keeps its original position.
    pub fn upsert_transaction(&mut self, txn: Transaction) -> Result<(), ValidationError> {
        txn.validate().map_err(log_rejection)?;
        let replaced = self
            .transactions
            .get(&txn.id)
            .map(|slot| slot.value.amount.abs())
            .unwrap_or(Decimal::ZERO);
        add_gross(self.gross - replaced, &txn).map_err(log_rejection)?;

        self.state = LedgerState::Loaded;
        let seq = match self.transactions.remove(&txn.id) {
            Some(previous) => {
                self.debit(&previous.value);
                previous.seq
            }
            None => self.bump_seq(),
        };
        self.credit(&txn);
        debug!(id = %txn.id, amount = %txn.amount, "transaction upserted");
        self.transactions
            .insert(txn.id.clone(), Slot { seq, value: txn });
        Ok(())
    }

    /// Removes the record if present. Unknown ids are a no-op.
    pub fn remove_transaction(&mut self, id: &TransactionId) -> Option<Transaction> {
        self.state = LedgerState::Loaded;
        let removed = self.transactions.remove(id)?.value;
        self.debit(&removed);
        debug!(id = %id, amount = %removed.amount, "transaction removed");
        Some(removed)
    }

    pub fn upsert_category(&mut self, category: Category) -> Result<(), ValidationError> {
        category.validate().map_err(log_rejection)?;
        self.state = LedgerState::Loaded;
        let seq = match self.categories.get(&category.id) {
            Some(existing) => existing.seq,
            None => self.bump_seq(),
        };
        debug!(id = %category.id, name = %category.name, "category upserted");
        self.categories.insert(
            category.id.clone(),
            Slot {
                seq,
                value: category,
            },
        );
        Ok(())
    }

    /// Drops the category from the catalog only. Transactions referencing it
    /// stay in place and its subtotal keeps being reported.
    pub fn remove_category(&mut self, id: &CategoryId) -> Option<Category> {
        self.state = LedgerState::Loaded;
        let removed = self.categories.remove(id)?.value;
        debug!(id = %id, orphaned = self.category_tally(id).count, "category removed");
        Some(removed)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.get(id).map(|slot| &slot.value)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.get(id).map(|slot| &slot.value)
    }

    /// Transactions in insertion order.
    pub fn transactions(&self) -> Vec<&Transaction> {
        in_insertion_order(&self.transactions)
    }

    /// Categories in insertion order.
    pub fn categories(&self) -> Vec<&Category> {
        in_insertion_order(&self.categories)
    }

    /// Name of the transaction's category, or the fallback label when the
    /// reference is unset or dangling.
    pub fn category_label(&self, txn: &Transaction) -> &str {
        txn.category_id()
            .and_then(|id| self.category(id))
            .map(|category| category.name.as_str())
            .unwrap_or(&self.uncategorized_label)
    }

    /// Runs a query and returns an independent, ordered copy of the matches.
    pub fn query(&self, query: &LedgerQuery) -> Vec<Transaction> {
        let needle = query
            .search_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        let mut matches: Vec<&Slot<Transaction>> = self
            .transactions
            .values()
            .filter(|slot| match &query.category_id {
                Some(id) => slot.value.category_id.as_ref() == Some(id),
                None => true,
            })
            .filter(|slot| match &needle {
                Some(needle) => self
                    .category_label(&slot.value)
                    .to_lowercase()
                    .contains(needle.as_str()),
                None => true,
            })
            .collect();
        matches.sort_unstable_by_key(|slot| slot.seq);

        // `sort_by` is stable: equal keys keep insertion order in both directions.
        if let Some(key) = query.sort_by {
            let ascending = query.is_ascending();
            matches.sort_by(|a, b| {
                let ordering = match key {
                    SortKey::Date => a.value.date.cmp(&b.value.date),
                    SortKey::Amount => a.value.amount.cmp(&b.value.amount),
                    SortKey::Category => self
                        .category_label(&a.value)
                        .to_lowercase()
                        .cmp(&self.category_label(&b.value).to_lowercase()),
                };
                if ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        matches.into_iter().map(|slot| slot.value.clone()).collect()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn credit(&mut self, txn: &Transaction) {
        self.total += txn.amount;
        self.gross += txn.amount.abs();
        match &txn.category_id {
            Some(id) => self.tallies.entry(id.clone()).or_default().credit(txn.amount),
            None => self.unassigned.credit(txn.amount),
        }
    }

    fn debit(&mut self, txn: &Transaction) {
        self.total -= txn.amount;
        self.gross -= txn.amount.abs();
        match &txn.category_id {
            Some(id) => {
                if let Some(tally) = self.tallies.get_mut(id) {
                    tally.debit(txn.amount);
                    if tally.count == 0 {
                        self.tallies.remove(id);
                    }
                }
            }
            None => self.unassigned.debit(txn.amount),
        }
    }
}

fn validate_batch(
    transactions: &[Transaction],
    categories: &[Category],
) -> Result<(), ValidationError> {
    ensure_unique("transaction", transactions)?;
    ensure_unique("category", categories)?;
    transactions.iter().try_for_each(Transaction::validate)?;
    categories.iter().try_for_each(Category::validate)?;
    transactions
        .iter()
        .try_fold(Decimal::ZERO, add_gross)
        .map(|_| ())
}

fn add_gross(gross: Decimal, txn: &Transaction) -> Result<Decimal, ValidationError> {
    gross
        .checked_add(txn.amount.abs())
        .ok_or_else(|| ValidationError::AmountOutOfRange(txn.amount.to_string()))
}

fn ensure_unique<T>(entity: &'static str, items: &[T]) -> Result<(), ValidationError>
where
    T: Identifiable,
    T::Id: std::hash::Hash + Eq + ToString,
{
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ValidationError::DuplicateId {
                entity,
                id: item.id().to_string(),
            });
        }
    }
    Ok(())
}

fn in_insertion_order<K, T>(slots: &HashMap<K, Slot<T>>) -> Vec<&T> {
    let mut ordered: Vec<&Slot<T>> = slots.values().collect();
    ordered.sort_unstable_by_key(|slot| slot.seq);
    ordered.into_iter().map(|slot| &slot.value).collect()
}

fn log_rejection(err: ValidationError) -> ValidationError {
    warn!(error = %err, "ledger input rejected");
    err
}
