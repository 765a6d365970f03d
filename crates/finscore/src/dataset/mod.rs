//! Analysis of uploaded household spending tables.
//!
//! A CSV upload becomes an immutable [`Dataset`]; a [`DashboardSession`]
//! layers newly entered records on top and recomputes the scored views on
//! demand, using the same [`crate::scoring::ScoringEngine`] as the HTTP route.

mod aggregate;
mod loader;
mod report;
mod session;
mod stats;

pub use aggregate::{
    category_totals, family_distribution, family_profiles, family_spending, spending_pivot,
    CategoryTotal, FamilyDistribution, FamilyExpenseTotal, FamilyProfile, PivotRow,
    SpendingPivot, ENTERTAINMENT_CATEGORY, TRAVEL_CATEGORY,
};
pub use loader::{
    load_transactions, load_transactions_from_path, TransactionRow, REQUIRED_COLUMNS,
};
pub use report::{DatasetReport, OVERVIEW_ROWS};
pub use session::{DashboardSession, Dataset, ScoredFamily};
pub use stats::{summary_statistics, ColumnSummary, CorrelationMatrix};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
