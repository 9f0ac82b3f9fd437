//! Aggregation invariants checked over generated data sets.

use chrono::{Duration, NaiveDate};
use ledger_core::domain::{
    Category, CategoryId, LabelColor, OwnerId, Transaction, TransactionId, TransactionKind,
};
use ledger_core::ledger::{Ledger, LedgerQuery, SortKey};
use rust_decimal::Decimal;

/// Small deterministic generator so every run sees the same data.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn owner() -> OwnerId {
    OwnerId::from("prop")
}

fn catalog() -> Vec<Category> {
    ["Food", "Home", "Health", "Fun"]
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            Category::new(owner(), *name, LabelColor::ALL[idx]).with_id(idx as i64 + 1)
        })
        .collect()
}

fn generate(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = Lcg(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            // ids 1-4 exist, 5-6 dangle, 0 means unset
            let category = match rng.below(7) {
                0 => None,
                n => Some(CategoryId::from(n as i64)),
            };
            let cents = rng.below(50) as i64 * 100 + rng.below(100) as i64;
            Transaction::new(
                owner(),
                TransactionKind::Expense,
                format!("item {idx}"),
                category,
                Decimal::new(cents, 2),
                start + Duration::days(rng.below(90) as i64),
            )
            .with_id(format!("t{idx}"))
        })
        .collect()
}

fn loaded(seed: u64, count: usize) -> (Ledger, Vec<Transaction>) {
    let txns = generate(seed, count);
    let mut ledger = Ledger::new();
    ledger.load(txns.clone(), catalog()).unwrap();
    (ledger, txns)
}

#[test]
fn total_equals_sum_of_amounts() {
    for seed in 1..20 {
        let (ledger, txns) = loaded(seed, 40);
        let expected: Decimal = txns.iter().map(|t| t.amount).sum();
        assert_eq!(ledger.total(), expected, "seed {seed}");
    }
}

#[test]
fn category_totals_match_filtered_sums() {
    for seed in 1..20 {
        let (ledger, txns) = loaded(seed, 40);
        for raw in 1..=8i64 {
            let id = CategoryId::from(raw);
            let expected: Decimal = txns
                .iter()
                .filter(|t| t.category_id.as_ref() == Some(&id))
                .map(|t| t.amount)
                .sum();
            assert_eq!(ledger.category_total(&id), expected, "seed {seed} id {raw}");
        }
    }
}

#[test]
fn catalog_totals_plus_orphans_equal_total() {
    for seed in 1..20 {
        let (ledger, _) = loaded(seed, 60);
        let catalog_sum: Decimal = catalog()
            .iter()
            .map(|c| ledger.category_total(&c.id))
            .sum();
        assert_eq!(
            catalog_sum + ledger.uncategorized_total(),
            ledger.total(),
            "seed {seed}"
        );
    }
}

#[test]
fn upsert_remove_round_trip_restores_every_total() {
    let (mut ledger, _) = loaded(7, 30);
    let snapshot = |ledger: &Ledger| {
        let mut values = vec![ledger.total(), ledger.uncategorized_total()];
        values.extend(catalog().iter().map(|c| ledger.category_total(&c.id)));
        values
    };
    let before = snapshot(&ledger);

    let mut rng = Lcg(99);
    for round in 0..25 {
        let id = format!("extra{round}");
        let txn = Transaction::new(
            owner(),
            TransactionKind::Expense,
            "extra",
            Some(CategoryId::from(rng.below(6) as i64 + 1)),
            Decimal::new(rng.below(100_000) as i64, 2),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .with_id(id.as_str());
        ledger.upsert_transaction(txn).unwrap();
        ledger.remove_transaction(&TransactionId::from(id));
        assert_eq!(snapshot(&ledger), before, "round {round}");
    }
}

#[test]
fn incremental_updates_agree_with_a_fresh_load() {
    let (mut ledger, mut txns) = loaded(11, 50);
    let mut rng = Lcg(5);
    for step in 0..200 {
        let idx = rng.below(txns.len() as u64) as usize;
        if step % 5 == 0 {
            let removed = txns.remove(idx);
            ledger.remove_transaction(&removed.id);
        } else {
            let mut txn = txns[idx].clone();
            txn.amount = Decimal::new(rng.below(10_000) as i64, 2);
            txn.category_id = match rng.below(7) {
                0 => None,
                n => Some(CategoryId::from(n as i64)),
            };
            txns[idx] = txn.clone();
            ledger.upsert_transaction(txn).unwrap();
        }
    }

    let mut fresh = Ledger::new();
    fresh.load(txns, catalog()).unwrap();
    assert_eq!(ledger.total(), fresh.total());
    for raw in 1..=6i64 {
        let id = CategoryId::from(raw);
        assert_eq!(ledger.category_total(&id), fresh.category_total(&id));
    }
    assert_eq!(
        ledger.query(&LedgerQuery::new()),
        fresh.query(&LedgerQuery::new())
    );
}

#[test]
fn removing_categories_never_changes_totals_or_rows() {
    let (mut ledger, _) = loaded(3, 40);
    let totals: Vec<Decimal> = (1..=6i64)
        .map(|raw| ledger.category_total(&CategoryId::from(raw)))
        .collect();
    let total = ledger.total();
    let rows = ledger.query(&LedgerQuery::new());

    for category in catalog() {
        ledger.remove_category(&category.id);
    }

    let after: Vec<Decimal> = (1..=6i64)
        .map(|raw| ledger.category_total(&CategoryId::from(raw)))
        .collect();
    assert_eq!(after, totals);
    assert_eq!(ledger.total(), total);
    assert_eq!(ledger.query(&LedgerQuery::new()), rows);
    assert_eq!(ledger.uncategorized_total(), total);
}

#[test]
fn sorted_queries_are_stable() {
    let (ledger, _) = loaded(21, 80);
    let insertion: Vec<TransactionId> = ledger
        .query(&LedgerQuery::new())
        .into_iter()
        .map(|t| t.id)
        .collect();
    let position = |id: &TransactionId| insertion.iter().position(|other| other == id).unwrap();

    for key in [SortKey::Date, SortKey::Amount, SortKey::Category] {
        for query in [
            LedgerQuery::new().sort_by(key),
            LedgerQuery::new().sort_by(key).descending(),
        ] {
            let rows = ledger.query(&query);
            for pair in rows.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let tie = match key {
                    SortKey::Date => a.date == b.date,
                    SortKey::Amount => a.amount == b.amount,
                    SortKey::Category => {
                        ledger.category_label(a).to_lowercase()
                            == ledger.category_label(b).to_lowercase()
                    }
                };
                if tie {
                    assert!(position(&a.id) < position(&b.id), "{key:?} tie out of order");
                }
            }
        }
    }
}

#[test]
fn filters_compose_with_sorting() {
    let (ledger, txns) = loaded(8, 60);
    let id = CategoryId::from(2);
    let rows = ledger.query(
        &LedgerQuery::new()
            .in_category(2)
            .search("home")
            .sort_by(SortKey::Amount)
            .descending(),
    );
    let expected = txns
        .iter()
        .filter(|t| t.category_id.as_ref() == Some(&id))
        .count();
    assert_eq!(rows.len(), expected);
    assert!(rows.windows(2).all(|w| w[0].amount >= w[1].amount));
}
