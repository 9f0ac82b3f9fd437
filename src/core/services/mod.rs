pub mod summary_service;

pub use summary_service::{
    CategorySummary, KindTotals, MonthlyStatement, StatementLine, SummaryService,
};
