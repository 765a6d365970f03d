use finscore::dataset::{
    load_transactions, DashboardSession, Dataset, DatasetError, DatasetReport, FamilyProfile,
};
use finscore::scoring::{FamilyId, ScoringEngine};
use std::io::Cursor;
use std::sync::Arc;

const UPLOAD: &str = "FamilyID,MemberID,Income,Savings,MonthlyExpenses,LoanPayments,CreditCardSpending,Dependents,FinancialGoalsMet,Category,Amount
101,1,6200,900,4100,2100,700,3,35,Travel,450
101,2,6200,900,4100,2100,700,3,35,Entertainment,220
101,1,6200,900,4100,2100,700,3,35,Groceries,610
102,1,8800,3100,2600,600,400,1,90,Groceries,380
102,2,8800,3100,2600,600,400,1,90,Healthcare,120
";

fn session() -> DashboardSession {
    let rows = load_transactions(Cursor::new(UPLOAD)).expect("upload parses");
    DashboardSession::new(Arc::new(Dataset::new(rows)), ScoringEngine::default())
}

#[test]
fn uploads_without_required_columns_are_rejected() {
    let err = load_transactions(Cursor::new("FamilyID,Income\n1,2000\n")).expect_err("rejected");
    match err {
        DatasetError::MissingColumns(columns) => {
            assert_eq!(columns.len(), 9);
            assert!(columns.contains(&"Category".to_string()));
        }
        other => panic!("expected missing columns, got {other:?}"),
    }
}

#[test]
fn session_scores_every_family_with_shared_insights() {
    let scored = session().scored_families();
    assert_eq!(scored.len(), 2);

    let stretched = &scored[0];
    assert_eq!(stretched.profile.record.family_id, FamilyId(101));
    assert_eq!(stretched.profile.record.travel_spending, 450.0);
    assert_eq!(stretched.profile.record.entertainment_spending, 220.0);
    assert_eq!(
        stretched.insights.as_deref(),
        Some(
            "Savings are below recommended levels, affecting your score. \
High expenses reduce your financial flexibility. \
Loan payments exceed a healthy ratio."
        )
    );

    let steady = &scored[1];
    assert_eq!(
        steady.insights.as_deref(),
        Some("Your financial profile is balanced.")
    );
    assert!(steady.score > stretched.score);
}

#[test]
fn new_records_join_the_scored_table_and_export() {
    let mut session = session();
    let profile: FamilyProfile = serde_json::from_value(serde_json::json!({
        "FamilyID": 201,
        "Income": 5000.0,
        "Savings": 1500.0,
        "MonthlyExpenses": 2000.0,
        "LoanPayments": 500.0,
        "CreditCardSpending": 300.0,
        "TravelSpending": 200.0,
        "EntertainmentSpending": 100.0,
        "Dependents": 2,
        "FinancialGoalsMet": 80
    }))
    .expect("profile deserializes");

    let assessment = session.add_record(profile).expect("new record scores");
    assert!((assessment.score - 54.0).abs() < 1e-9);

    let report = DatasetReport::build(&session, Some(FamilyId(102)));
    assert_eq!(report.scored_families.len(), 3);
    assert_eq!(report.row_count, 5);

    let mut buffer = Vec::new();
    session.write_scored_csv(&mut buffer).expect("export");
    let exported = String::from_utf8(buffer).expect("utf8");
    assert_eq!(exported.lines().count(), 4);
    assert!(exported.lines().last().unwrap_or_default().starts_with("201,"));
}
