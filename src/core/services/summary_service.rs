//! Derived statement views over a loaded ledger.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Config;
use crate::currency::{self, round_cents};
use crate::domain::{CategoryId, LabelColor, TransactionId, TransactionKind};
use crate::ledger::{Ledger, LedgerQuery};

/// One slice of the category chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySummary {
    /// `None` for the fallback bucket holding unset and dangling references.
    pub category_id: Option<CategoryId>,
    pub label: String,
    pub color: Option<LabelColor>,
    /// Chart fill for `color`, e.g. `#E53935`.
    pub color_hex: Option<&'static str>,
    pub total: Decimal,
    pub count: usize,
    /// Percentage of the ledger total, rounded to cents.
    pub share: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct KindTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl KindTotals {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }

    fn add(&mut self, kind: TransactionKind, amount: Decimal) {
        match kind {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expense += amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyStatement {
    pub year: i32,
    pub month: u32,
    pub totals: KindTotals,
    pub count: usize,
}

impl MonthlyStatement {
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Presentation-ready row of a statement list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementLine {
    pub id: TransactionId,
    pub name: String,
    pub category: String,
    pub amount: String,
    pub date: String,
}

pub struct SummaryService;

impl SummaryService {
    /// Per-category slices, largest first. Categories without transactions are
    /// skipped; the fallback bucket, when non-empty, comes last.
    pub fn category_breakdown(ledger: &Ledger) -> Vec<CategorySummary> {
        let grand_total = ledger.total();
        let mut slices: Vec<CategorySummary> = ledger
            .categories()
            .into_iter()
            .filter_map(|category| {
                let tally = ledger.category_tally(&category.id);
                (tally.count > 0).then(|| CategorySummary {
                    category_id: Some(category.id.clone()),
                    label: category.name.clone(),
                    color: Some(category.color),
                    color_hex: Some(category.color.hex()),
                    total: tally.total,
                    count: tally.count,
                    share: share_of(tally.total, grand_total),
                })
            })
            .collect();
        slices.sort_by(|a, b| b.total.cmp(&a.total));

        let fallback = ledger.uncategorized_tally();
        if fallback.count > 0 {
            slices.push(CategorySummary {
                category_id: None,
                label: ledger.uncategorized_label().to_string(),
                color: None,
                color_hex: None,
                total: fallback.total,
                count: fallback.count,
                share: share_of(fallback.total, grand_total),
            });
        }
        slices
    }

    pub fn kind_totals(ledger: &Ledger) -> KindTotals {
        ledger
            .transactions()
            .into_iter()
            .fold(KindTotals::default(), |mut totals, txn| {
                totals.add(txn.kind, txn.amount);
                totals
            })
    }

    /// Income and expense per calendar month, oldest first.
    pub fn monthly_statements(ledger: &Ledger) -> Vec<MonthlyStatement> {
        let mut months: BTreeMap<(i32, u32), MonthlyStatement> = BTreeMap::new();
        for txn in ledger.transactions() {
            let key = (txn.date.year(), txn.date.month());
            let entry = months.entry(key).or_insert_with(|| MonthlyStatement {
                year: key.0,
                month: key.1,
                totals: KindTotals::default(),
                count: 0,
            });
            entry.totals.add(txn.kind, txn.amount);
            entry.count += 1;
        }
        months.into_values().collect()
    }

    /// Runs `query` and renders each match with the configured formats.
    pub fn statement_lines(
        ledger: &Ledger,
        query: &LedgerQuery,
        config: &Config,
    ) -> Vec<StatementLine> {
        ledger
            .query(query)
            .into_iter()
            .map(|txn| StatementLine {
                category: ledger.category_label(&txn).to_string(),
                amount: currency::format_amount(txn.signed_amount(), &config.currency),
                date: currency::format_date(txn.date, &config.date_format),
                id: txn.id,
                name: txn.name,
            })
            .collect()
    }
}

fn share_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_cents)
        .unwrap_or(Decimal::ZERO)
}
