use super::config::InsightThresholds;
use super::domain::ScoringError;
use super::ratios::FinancialRatios;
use serde::{Deserialize, Serialize};

pub const BALANCED_PROFILE: &str = "Your financial profile is balanced.";

/// Warning raised when a ratio crosses its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    LowSavings,
    HighExpenses,
    HighLoanPayments,
}

impl Insight {
    pub fn message(&self) -> &'static str {
        match self {
            Insight::LowSavings => "Savings are below recommended levels, affecting your score.",
            Insight::HighExpenses => "High expenses reduce your financial flexibility.",
            Insight::HighLoanPayments => "Loan payments exceed a healthy ratio.",
        }
    }
}

/// Evaluates every rule independently, in a fixed order, on the unguarded
/// income quotients. Fails with [`ScoringError::ZeroIncome`] when income is zero.
pub fn derive_insights(
    ratios: &FinancialRatios,
    thresholds: &InsightThresholds,
) -> Result<Vec<Insight>, ScoringError> {
    let quotients = ratios.insight_quotients()?;
    let mut insights = Vec::new();

    if quotients.savings < thresholds.minimum_savings_to_income {
        insights.push(Insight::LowSavings);
    }
    if quotients.expenses > thresholds.maximum_expenses_to_income {
        insights.push(Insight::HighExpenses);
    }
    if quotients.loans > thresholds.maximum_loans_to_income {
        insights.push(Insight::HighLoanPayments);
    }

    Ok(insights)
}

pub fn summarize(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return BALANCED_PROFILE.to_string();
    }

    insights
        .iter()
        .map(Insight::message)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ratios::IncomeQuotients;

    fn ratios(savings: f64, expenses: f64, loans: f64) -> FinancialRatios {
        FinancialRatios {
            savings_to_income: savings.max(0.0),
            expenses_to_income: expenses.max(0.0),
            loans_to_income: loans.max(0.0),
            goals_fraction: 0.5,
            discretionary_penalty: 0.0,
            credit_card_to_expenses: Some(0.1),
            income_quotients: Some(IncomeQuotients {
                savings,
                expenses,
                loans,
            }),
        }
    }

    #[test]
    fn thresholds_are_exclusive() {
        let insights = derive_insights(&ratios(0.2, 0.6, 0.3), &InsightThresholds::default())
            .expect("income is set");
        assert!(insights.is_empty());
        assert_eq!(summarize(&insights), BALANCED_PROFILE);
    }

    #[test]
    fn all_rules_fire_in_order() {
        let insights = derive_insights(&ratios(0.05, 0.9, 0.45), &InsightThresholds::default())
            .expect("income is set");
        assert_eq!(
            insights,
            vec![
                Insight::LowSavings,
                Insight::HighExpenses,
                Insight::HighLoanPayments
            ]
        );
        assert_eq!(
            summarize(&insights),
            "Savings are below recommended levels, affecting your score. \
High expenses reduce your financial flexibility. \
Loan payments exceed a healthy ratio."
        );
    }

    #[test]
    fn custom_thresholds_apply() {
        let thresholds = InsightThresholds {
            minimum_savings_to_income: 0.1,
            maximum_expenses_to_income: 0.8,
            maximum_loans_to_income: 0.2,
        };
        let insights = derive_insights(&ratios(0.15, 0.7, 0.25), &thresholds).expect("income is set");
        assert_eq!(insights, vec![Insight::HighLoanPayments]);
    }

    #[test]
    fn negative_quotients_are_compared_as_is() {
        // income of -1000 against savings 500, expenses 800, loans 100
        let insights = derive_insights(&ratios(-0.5, -0.8, -0.1), &InsightThresholds::default())
            .expect("income is set");
        assert_eq!(insights, vec![Insight::LowSavings]);
    }

    #[test]
    fn missing_income_quotients_are_an_error() {
        let mut ratios = ratios(0.3, 0.4, 0.1);
        ratios.income_quotients = None;
        assert_eq!(
            derive_insights(&ratios, &InsightThresholds::default()),
            Err(ScoringError::ZeroIncome)
        );
    }
}
