use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::loader::TransactionRow;
use crate::scoring::{FamilyId, FinancialRecord};

pub const TRAVEL_CATEGORY: &str = "Travel";
pub const ENTERTAINMENT_CATEGORY: &str = "Entertainment";

/// A family's scoring inputs plus household size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyProfile {
    #[serde(flatten)]
    pub record: FinancialRecord,
    #[serde(rename = "Dependents", default)]
    pub dependents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyExpenseTotal {
    pub family_id: FamilyId,
    pub monthly_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub family_id: FamilyId,
    pub member_id: i64,
    /// One cell per entry of [`SpendingPivot::categories`].
    pub amounts: Vec<f64>,
}

/// Amount spent per (family, member) and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingPivot {
    pub categories: Vec<String>,
    pub rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyDistribution {
    pub family_id: FamilyId,
    pub categories: Vec<CategoryTotal>,
}

/// Sums `MonthlyExpenses` over every row of each family.
pub fn family_spending(rows: &[TransactionRow]) -> Vec<FamilyExpenseTotal> {
    let mut totals: BTreeMap<FamilyId, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.family_id).or_default() += row.monthly_expenses;
    }

    totals
        .into_iter()
        .map(|(family_id, monthly_expenses)| FamilyExpenseTotal {
            family_id,
            monthly_expenses,
        })
        .collect()
}

pub fn category_totals(rows: &[TransactionRow]) -> Vec<CategoryTotal> {
    totals_by_category(rows.iter())
}

pub fn family_distribution(rows: &[TransactionRow], family_id: FamilyId) -> FamilyDistribution {
    FamilyDistribution {
        family_id,
        categories: totals_by_category(rows.iter().filter(|row| row.family_id == family_id)),
    }
}

fn totals_by_category<'a>(rows: impl Iterator<Item = &'a TransactionRow>) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        let total = totals.entry(row.category.as_str()).or_default();
        if let Some(amount) = row.amount {
            *total += amount;
        }
    }

    totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect()
}

pub fn spending_pivot(rows: &[TransactionRow]) -> SpendingPivot {
    let categories: Vec<String> = rows
        .iter()
        .map(|row| row.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column_of: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(index, category)| (category.as_str(), index))
        .collect();

    let mut cells: BTreeMap<(FamilyId, i64), Vec<f64>> = BTreeMap::new();
    for row in rows {
        let amounts = cells
            .entry((row.family_id, row.member_id))
            .or_insert_with(|| vec![0.0; categories.len()]);
        if let Some(amount) = row.amount {
            amounts[column_of[row.category.as_str()]] += amount;
        }
    }

    SpendingPivot {
        rows: cells
            .into_iter()
            .map(|((family_id, member_id), amounts)| PivotRow {
                family_id,
                member_id,
                amounts,
            })
            .collect(),
        categories,
    }
}

/// Family attribute rows, one per distinct attribute combination, in
/// first-seen order, with travel and entertainment totals attached.
pub fn family_profiles(rows: &[TransactionRow]) -> Vec<FamilyProfile> {
    let mut travel: HashMap<FamilyId, f64> = HashMap::new();
    let mut entertainment: HashMap<FamilyId, f64> = HashMap::new();
    for row in rows {
        let Some(amount) = row.amount else {
            continue;
        };
        match row.category.as_str() {
            TRAVEL_CATEGORY => *travel.entry(row.family_id).or_default() += amount,
            ENTERTAINMENT_CATEGORY => *entertainment.entry(row.family_id).or_default() += amount,
            _ => {}
        }
    }

    let mut seen = HashSet::new();
    let mut profiles = Vec::new();
    for row in rows {
        if !seen.insert(AttributeKey::from(row)) {
            continue;
        }

        profiles.push(FamilyProfile {
            record: FinancialRecord {
                family_id: row.family_id,
                income: row.income,
                savings: row.savings,
                monthly_expenses: row.monthly_expenses,
                loan_payments: row.loan_payments,
                credit_card_spending: row.credit_card_spending,
                travel_spending: travel.get(&row.family_id).copied().unwrap_or(0.0),
                entertainment_spending: entertainment.get(&row.family_id).copied().unwrap_or(0.0),
                financial_goals_met: row.financial_goals_met,
            },
            dependents: row.dependents,
        });
    }

    profiles
}

#[derive(Hash, PartialEq, Eq)]
struct AttributeKey {
    family_id: FamilyId,
    amounts: [u64; 5],
    dependents: i64,
    financial_goals_met: i64,
}

impl From<&TransactionRow> for AttributeKey {
    fn from(row: &TransactionRow) -> Self {
        Self {
            family_id: row.family_id,
            amounts: [
                row.income.to_bits(),
                row.savings.to_bits(),
                row.monthly_expenses.to_bits(),
                row.loan_payments.to_bits(),
                row.credit_card_spending.to_bits(),
            ],
            dependents: row.dependents,
            financial_goals_met: row.financial_goals_met,
        }
    }
}
