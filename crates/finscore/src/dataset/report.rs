use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::{
    category_totals, family_distribution, family_spending, spending_pivot, CategoryTotal,
    FamilyDistribution, FamilyExpenseTotal, SpendingPivot,
};
use super::loader::TransactionRow;
use super::session::{average, correlation_for, DashboardSession, ScoredFamily};
use super::stats::{summary_statistics, ColumnSummary, CorrelationMatrix};
use crate::scoring::FamilyId;

pub const OVERVIEW_ROWS: usize = 5;

/// Every table the dashboard renders, computed in one pass over a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub overview: Vec<TransactionRow>,
    pub summary: Vec<ColumnSummary>,
    pub family_spending: Vec<FamilyExpenseTotal>,
    pub category_totals: Vec<CategoryTotal>,
    pub pivot: SpendingPivot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_distribution: Option<FamilyDistribution>,
    pub scored_families: Vec<ScoredFamily>,
    pub correlation: CorrelationMatrix,
    pub average_score: Option<f64>,
}

impl DatasetReport {
    /// `focus_family` defaults to the first family in the upload.
    pub fn build(session: &DashboardSession, focus_family: Option<FamilyId>) -> Self {
        Self::build_at(session, focus_family, Utc::now())
    }

    pub fn build_at(
        session: &DashboardSession,
        focus_family: Option<FamilyId>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let rows = session.source().transactions();
        let focus_family = focus_family.or_else(|| session.source().family_ids().first().copied());
        let scored_families = session.scored_families();

        Self {
            generated_at,
            row_count: rows.len(),
            overview: rows.iter().take(OVERVIEW_ROWS).cloned().collect(),
            summary: summary_statistics(rows),
            family_spending: family_spending(rows),
            category_totals: category_totals(rows),
            pivot: spending_pivot(rows),
            family_distribution: focus_family.map(|family_id| family_distribution(rows, family_id)),
            correlation: correlation_for(&scored_families),
            average_score: average(&scored_families),
            scored_families,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_transactions, Dataset};
    use crate::scoring::ScoringEngine;
    use chrono::TimeZone;
    use std::io::Cursor;
    use std::sync::Arc;

    const CSV: &str = "FamilyID,Income,Savings,MonthlyExpenses,LoanPayments,CreditCardSpending,Category,Amount,MemberID,Dependents,FinancialGoalsMet
1,5000,1500,2000,500,300,Travel,200,11,2,80
1,5000,1500,2000,500,300,Entertainment,100,12,2,80
1,5000,1500,2000,500,300,Groceries,400,11,2,80
2,3000,300,2500,1200,900,Groceries,350,21,4,20
2,3000,300,2500,1200,900,Utilities,150,22,4,20
3,4000,1000,1800,400,200,Travel,600,31,1,60
";

    fn session() -> DashboardSession {
        let rows = load_transactions(Cursor::new(CSV)).expect("csv parses");
        DashboardSession::new(Arc::new(Dataset::new(rows)), ScoringEngine::default())
    }

    #[test]
    fn report_covers_every_table() {
        let generated_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let report = DatasetReport::build_at(&session(), None, generated_at);

        assert_eq!(report.generated_at, generated_at);
        assert_eq!(report.row_count, 6);
        assert_eq!(report.overview.len(), OVERVIEW_ROWS);
        assert_eq!(report.summary.len(), 10);
        assert_eq!(report.family_spending.len(), 3);
        assert_eq!(report.family_spending[0].monthly_expenses, 6_000.0);
        assert_eq!(report.category_totals.len(), 4);
        assert_eq!(report.pivot.rows.len(), 5);
        assert_eq!(report.scored_families.len(), 3);

        let distribution = report.family_distribution.expect("defaults to first family");
        assert_eq!(distribution.family_id, FamilyId(1));
        assert_eq!(distribution.categories.len(), 3);

        let first = report.scored_families[0].score.expect("family 1 scores");
        assert!((first - 54.0).abs() < 1e-9);
        assert!(report.average_score.is_some());
        assert!(report
            .correlation
            .get("Savings", "FinancialScore")
            .is_some());
    }

    #[test]
    fn focus_family_can_be_selected() {
        let report = DatasetReport::build(&session(), Some(FamilyId(3)));
        let distribution = report.family_distribution.expect("distribution present");
        assert_eq!(distribution.family_id, FamilyId(3));
        assert_eq!(distribution.categories[0].category, "Travel");
        assert_eq!(distribution.categories[0].amount, 600.0);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = DatasetReport::build(&session(), None);
        let value = serde_json::to_value(&report).expect("serializes");
        assert!(value["scored_families"][0]["profile"]["FamilyID"].is_number());
        assert_eq!(value["pivot"]["categories"][0], "Entertainment");
    }
}
