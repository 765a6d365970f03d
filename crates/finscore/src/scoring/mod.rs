//! Weighted financial health scoring.
//!
//! Every caller (HTTP route, CLI, dashboard session) goes through
//! [`ScoringEngine`], so the score and its insights are always derived from
//! one [`FinancialRatios`] computation.

mod config;
pub mod domain;
pub mod insights;
mod ratios;
pub mod router;
pub mod service;

pub use config::{InsightThresholds, ScoreWeights, ScoringConfig};
pub use domain::{
    FamilyId, FinancialRecord, ScoreAssessment, ScoreComponent, ScoreFactor, ScoringError,
};
pub use insights::{derive_insights, summarize, Insight, BALANCED_PROFILE};
pub use ratios::{FinancialRatios, IncomeQuotients};
pub use router::scoring_router;
pub use service::{FinancialScoreResponse, FinancialScoreService};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Stateless evaluator applying weights and insight thresholds to a record.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score, components and insights. Fails when either the score or the
    /// insight quotients are undefined for the record.
    pub fn assess(&self, record: &FinancialRecord) -> Result<ScoreAssessment, ScoringError> {
        let ratios = FinancialRatios::from_record(record);
        let (raw_score, components) = self.weigh(record, &ratios)?;
        let insights = derive_insights(&ratios, &self.config.thresholds)?;

        Ok(ScoreAssessment {
            family_id: record.family_id,
            score: raw_score.clamp(MIN_SCORE, MAX_SCORE),
            raw_score,
            components,
            insights,
        })
    }

    /// Clamped score alone; zero income is defined here.
    pub fn score(&self, record: &FinancialRecord) -> Result<f64, ScoringError> {
        let ratios = FinancialRatios::from_record(record);
        let (raw_score, _) = self.weigh(record, &ratios)?;
        Ok(raw_score.clamp(MIN_SCORE, MAX_SCORE))
    }

    pub fn insights(&self, record: &FinancialRecord) -> Result<Vec<Insight>, ScoringError> {
        derive_insights(
            &FinancialRatios::from_record(record),
            &self.config.thresholds,
        )
    }

    fn weigh(
        &self,
        record: &FinancialRecord,
        ratios: &FinancialRatios,
    ) -> Result<(f64, Vec<ScoreComponent>), ScoringError> {
        let components = weighted_components(ratios, &self.config.weights)?;
        let raw_score: f64 = components.iter().map(|component| component.points).sum();
        if !raw_score.is_finite() {
            return Err(ScoringError::NonFinite(record.family_id));
        }
        Ok((raw_score, components))
    }
}

/// Scores a record with the default weights.
pub fn calculate_financial_score(record: &FinancialRecord) -> Result<f64, ScoringError> {
    ScoringEngine::default().score(record)
}

fn weighted_components(
    ratios: &FinancialRatios,
    weights: &ScoreWeights,
) -> Result<Vec<ScoreComponent>, ScoringError> {
    let credit_card_ratio = ratios.credit_card_ratio()?;

    let component = |factor, ratio: f64, points: f64| ScoreComponent {
        factor,
        ratio,
        points: points * MAX_SCORE,
    };

    Ok(vec![
        component(
            ScoreFactor::SavingsToIncome,
            ratios.savings_to_income,
            ratios.savings_to_income * weights.savings_to_income,
        ),
        component(
            ScoreFactor::ExpensesToIncome,
            ratios.expenses_to_income,
            (1.0 - ratios.expenses_to_income) * weights.expenses_to_income,
        ),
        component(
            ScoreFactor::LoansToIncome,
            ratios.loans_to_income,
            (1.0 - ratios.loans_to_income) * weights.loans_to_income,
        ),
        component(
            ScoreFactor::CreditCardToExpenses,
            credit_card_ratio,
            (1.0 - credit_card_ratio) * weights.credit_card_to_expenses,
        ),
        component(
            ScoreFactor::GoalsMet,
            ratios.goals_fraction,
            ratios.goals_fraction * weights.goals_met,
        ),
        component(
            ScoreFactor::DiscretionaryPenalty,
            ratios.discretionary_penalty,
            -(ratios.discretionary_penalty * weights.discretionary_penalty),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn balanced_record() -> FinancialRecord {
        FinancialRecord {
            family_id: FamilyId(101),
            income: 5_000.0,
            savings: 1_500.0,
            monthly_expenses: 2_000.0,
            loan_payments: 500.0,
            credit_card_spending: 300.0,
            travel_spending: 200.0,
            entertainment_spending: 100.0,
            financial_goals_met: 80,
        }
    }

    #[test]
    fn reference_record_scores_fifty_four() {
        let assessment = ScoringEngine::default()
            .assess(&balanced_record())
            .expect("record scores");

        assert_approx(assessment.score, 54.0);
        assert_eq!(assessment.family_id, FamilyId(101));
        assert!(assessment.insights.is_empty());
        assert_eq!(assessment.insight_summary(), BALANCED_PROFILE);
    }

    #[test]
    fn components_sum_to_raw_score() {
        let assessment = ScoringEngine::default()
            .assess(&balanced_record())
            .expect("record scores");

        assert_eq!(assessment.components.len(), 6);
        let penalty = assessment
            .components
            .iter()
            .find(|component| component.factor == ScoreFactor::DiscretionaryPenalty)
            .expect("penalty component");
        assert_approx(penalty.ratio, 0.15);
        assert_approx(penalty.points, -1.5);

        let total: f64 = assessment.components.iter().map(|c| c.points).sum();
        assert_approx(total, assessment.raw_score);
    }

    #[test]
    fn zero_income_scores_but_has_no_insights() {
        let mut record = balanced_record();
        record.income = 0.0;
        let engine = ScoringEngine::default();

        // 0.2 + 0.2 + 0.085 + 0.08 - 0.015
        assert_approx(engine.score(&record).expect("guarded ratios"), 55.0);
        assert_eq!(engine.insights(&record), Err(ScoringError::ZeroIncome));
        assert_eq!(engine.assess(&record), Err(ScoringError::ZeroIncome));
    }

    #[test]
    fn negative_income_insights_use_the_raw_quotients() {
        let mut record = balanced_record();
        record.income = -5_000.0;

        let assessment = ScoringEngine::default().assess(&record).expect("scores");
        assert_approx(assessment.score, 55.0);
        assert_eq!(assessment.insights, vec![Insight::LowSavings]);
    }

    #[test]
    fn zero_monthly_expenses_is_a_computational_error() {
        let mut record = balanced_record();
        record.monthly_expenses = 0.0;

        assert_eq!(
            calculate_financial_score(&record),
            Err(ScoringError::ZeroMonthlyExpenses)
        );
    }

    #[test]
    fn zero_expenses_and_zero_card_spending_is_still_an_error() {
        let mut record = balanced_record();
        record.monthly_expenses = 0.0;
        record.credit_card_spending = 0.0;

        assert_eq!(
            calculate_financial_score(&record),
            Err(ScoringError::ZeroMonthlyExpenses)
        );
    }

    #[test]
    fn oversized_obligations_clamp_to_zero() {
        let mut record = balanced_record();
        record.savings = 0.0;
        record.loan_payments = 50_000.0;
        record.credit_card_spending = 90_000.0;

        let assessment = ScoringEngine::default().assess(&record).expect("scores");
        assert!(assessment.raw_score < 0.0);
        assert_eq!(assessment.score, MIN_SCORE);
        assert_eq!(
            assessment.insights,
            vec![Insight::LowSavings, Insight::HighLoanPayments]
        );
    }

    #[test]
    fn oversized_savings_clamp_to_one_hundred() {
        let mut record = balanced_record();
        record.savings = 1_000_000.0;

        let score = calculate_financial_score(&record).expect("scores");
        assert_eq!(score, MAX_SCORE);
    }

    #[test]
    fn infinite_inputs_are_rejected() {
        let mut record = balanced_record();
        record.income = f64::INFINITY;
        record.savings = f64::INFINITY;

        assert_eq!(
            calculate_financial_score(&record),
            Err(ScoringError::NonFinite(FamilyId(101)))
        );
    }

    #[test]
    fn custom_weights_change_the_score() {
        let engine = ScoringEngine::new(ScoringConfig {
            weights: ScoreWeights {
                savings_to_income: 1.0,
                expenses_to_income: 0.0,
                loans_to_income: 0.0,
                credit_card_to_expenses: 0.0,
                goals_met: 0.0,
                discretionary_penalty: 0.0,
            },
            thresholds: InsightThresholds::default(),
        });

        let score = engine.score(&balanced_record()).expect("scores");
        assert_approx(score, 30.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_score_stays_within_bounds(
            income in 0u32..500_000,
            savings in 0u32..2_000_000,
            expenses in 1u32..200_000,
            loans in 0u32..2_000_000,
            card in 0u32..2_000_000,
            travel in 0u32..100_000,
            entertainment in 0u32..100_000,
            goals in 0i64..=100
        ) {
            let record = FinancialRecord {
                family_id: FamilyId(1),
                income: f64::from(income),
                savings: f64::from(savings),
                monthly_expenses: f64::from(expenses),
                loan_payments: f64::from(loans),
                credit_card_spending: f64::from(card),
                travel_spending: f64::from(travel),
                entertainment_spending: f64::from(entertainment),
                financial_goals_met: goals,
            };

            let first = calculate_financial_score(&record);
            prop_assert!(first.is_ok());
            let score = first.clone().unwrap_or_default();
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
            prop_assert_eq!(first, calculate_financial_score(&record));
        }
    }
}
