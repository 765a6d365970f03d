use super::domain::{FinancialRecord, ScoringError};

/// Quotients shared by the score and the insight rules.
///
/// The score reads income-based ratios that fall back to 0 when income is not
/// positive, and the discretionary penalty does the same for monthly expenses.
/// The credit card ratio has no fallback: it is `None` when monthly expenses
/// are exactly zero. The insight rules read `income_quotients`, which divide by
/// income as-is and are `None` only when income is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialRatios {
    pub savings_to_income: f64,
    pub expenses_to_income: f64,
    pub loans_to_income: f64,
    pub goals_fraction: f64,
    pub discretionary_penalty: f64,
    pub credit_card_to_expenses: Option<f64>,
    pub income_quotients: Option<IncomeQuotients>,
}

/// Savings, expenses and loan payments divided by income without a guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeQuotients {
    pub savings: f64,
    pub expenses: f64,
    pub loans: f64,
}

impl FinancialRatios {
    pub fn from_record(record: &FinancialRecord) -> Self {
        let income = record.income;
        let expenses = record.monthly_expenses;

        Self {
            savings_to_income: guarded_ratio(record.savings, income),
            expenses_to_income: guarded_ratio(expenses, income),
            loans_to_income: guarded_ratio(record.loan_payments, income),
            goals_fraction: record.financial_goals_met as f64 / 100.0,
            discretionary_penalty: guarded_ratio(record.discretionary_spending(), expenses),
            credit_card_to_expenses: if expenses == 0.0 {
                None
            } else {
                Some(record.credit_card_spending / expenses)
            },
            income_quotients: if income == 0.0 {
                None
            } else {
                Some(IncomeQuotients {
                    savings: record.savings / income,
                    expenses: expenses / income,
                    loans: record.loan_payments / income,
                })
            },
        }
    }

    pub fn credit_card_ratio(&self) -> Result<f64, ScoringError> {
        self.credit_card_to_expenses
            .ok_or(ScoringError::ZeroMonthlyExpenses)
    }

    pub fn insight_quotients(&self) -> Result<IncomeQuotients, ScoringError> {
        self.income_quotients.ok_or(ScoringError::ZeroIncome)
    }
}

fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
