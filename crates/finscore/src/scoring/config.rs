use serde::{Deserialize, Serialize};

/// Relative weight of each factor in the score, before scaling to percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub savings_to_income: f64,
    pub expenses_to_income: f64,
    pub loans_to_income: f64,
    pub credit_card_to_expenses: f64,
    pub goals_met: f64,
    pub discretionary_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            savings_to_income: 0.3,
            expenses_to_income: 0.2,
            loans_to_income: 0.2,
            credit_card_to_expenses: 0.1,
            goals_met: 0.1,
            discretionary_penalty: 0.1,
        }
    }
}

/// Ratio limits that trigger an insight message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Savings-to-income strictly below this warns.
    pub minimum_savings_to_income: f64,
    /// Expenses-to-income strictly above this warns.
    pub maximum_expenses_to_income: f64,
    /// Loan payments-to-income strictly above this warns.
    pub maximum_loans_to_income: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            minimum_savings_to_income: 0.2,
            maximum_expenses_to_income: 0.6,
            maximum_loans_to_income: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub thresholds: InsightThresholds,
}
