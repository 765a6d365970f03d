use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use super::DatasetError;
use crate::scoring::FamilyId;

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "FamilyID",
    "Income",
    "Savings",
    "MonthlyExpenses",
    "LoanPayments",
    "CreditCardSpending",
    "Category",
    "Amount",
    "MemberID",
    "Dependents",
    "FinancialGoalsMet",
];

/// One spending line from an uploaded dataset.
///
/// Family-level attributes repeat on every row belonging to the family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRow {
    #[serde(rename = "FamilyID")]
    pub family_id: FamilyId,
    pub income: f64,
    pub savings: f64,
    pub monthly_expenses: f64,
    pub loan_payments: f64,
    pub credit_card_spending: f64,
    pub category: String,
    /// Blank cells load as `None` and are left out of every sum.
    pub amount: Option<f64>,
    #[serde(rename = "MemberID")]
    pub member_id: i64,
    pub dependents: i64,
    pub financial_goals_met: i64,
}

pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<TransactionRow>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn load_transactions_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<TransactionRow>, DatasetError> {
    let file = std::fs::File::open(path)?;
    load_transactions(file)
}
