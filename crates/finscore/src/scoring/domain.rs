use serde::{Deserialize, Serialize};

/// Household identifier carried through scoring untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub i64);

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One family's per-period financial attributes.
///
/// Field names on the wire follow the PascalCase column names used by the
/// dataset exports (`MonthlyExpenses`, `FinancialGoalsMet`, ...). Every field
/// is required; values are not range-checked and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialRecord {
    #[serde(rename = "FamilyID")]
    pub family_id: FamilyId,
    pub income: f64,
    pub savings: f64,
    pub monthly_expenses: f64,
    pub loan_payments: f64,
    pub credit_card_spending: f64,
    pub travel_spending: f64,
    pub entertainment_spending: f64,
    /// Percentage of goals met, nominally 0..=100.
    pub financial_goals_met: i64,
}

impl FinancialRecord {
    pub fn discretionary_spending(&self) -> f64 {
        self.travel_spending + self.entertainment_spending
    }
}

/// Named contributor to the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    SavingsToIncome,
    ExpensesToIncome,
    LoansToIncome,
    CreditCardToExpenses,
    GoalsMet,
    DiscretionaryPenalty,
}

impl ScoreFactor {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreFactor::SavingsToIncome => "Savings-to-income",
            ScoreFactor::ExpensesToIncome => "Expenses-to-income",
            ScoreFactor::LoansToIncome => "Loan payments-to-income",
            ScoreFactor::CreditCardToExpenses => "Credit card-to-expenses",
            ScoreFactor::GoalsMet => "Financial goals met",
            ScoreFactor::DiscretionaryPenalty => "Discretionary spending penalty",
        }
    }
}

/// Signed contribution of one factor, in score points before clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub ratio: f64,
    pub points: f64,
}

/// Result of scoring one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAssessment {
    pub family_id: FamilyId,
    /// Clamped to `0.0..=100.0`.
    pub score: f64,
    /// Unclamped weighted sum, useful when explaining a 0 or 100.
    pub raw_score: f64,
    pub components: Vec<ScoreComponent>,
    pub insights: Vec<super::insights::Insight>,
}

impl ScoreAssessment {
    pub fn insight_summary(&self) -> String {
        super::insights::summarize(&self.insights)
    }
}

/// Computational failure while scoring a structurally valid record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("credit card ratio is undefined: monthly expenses are zero")]
    ZeroMonthlyExpenses,
    #[error("insight ratios are undefined: income is zero")]
    ZeroIncome,
    #[error("score is not a finite number for family {0}")]
    NonFinite(FamilyId),
}
