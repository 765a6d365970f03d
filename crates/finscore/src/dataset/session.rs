use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use super::aggregate::{family_profiles, FamilyProfile};
use super::loader::TransactionRow;
use super::stats::CorrelationMatrix;
use super::DatasetError;
use crate::scoring::{summarize, FamilyId, ScoreAssessment, ScoringEngine, ScoringError};

/// Uploaded table plus the family profiles derived from it. Never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    transactions: Vec<TransactionRow>,
    families: Vec<FamilyProfile>,
}

impl Dataset {
    pub fn new(transactions: Vec<TransactionRow>) -> Self {
        let families = family_profiles(&transactions);
        Self {
            transactions,
            families,
        }
    }

    pub fn transactions(&self) -> &[TransactionRow] {
        &self.transactions
    }

    pub fn families(&self) -> &[FamilyProfile] {
        &self.families
    }

    /// Distinct family ids in order of first appearance.
    pub fn family_ids(&self) -> Vec<FamilyId> {
        let mut ids = Vec::new();
        for row in &self.transactions {
            if !ids.contains(&row.family_id) {
                ids.push(row.family_id);
            }
        }
        ids
    }
}

/// A family profile together with its scoring outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFamily {
    pub profile: FamilyProfile,
    /// `None` when the record could not be scored; see `error`.
    pub score: Option<f64>,
    pub insights: Option<String>,
    pub error: Option<String>,
}

impl ScoredFamily {
    /// The score and the insights fail independently: a zero-income family
    /// keeps its score while its insights stay empty.
    fn evaluate(profile: FamilyProfile, engine: &ScoringEngine) -> Self {
        let score = engine.score(&profile.record);
        let insights = engine.insights(&profile.record);
        let error = match (&score, &insights) {
            (Err(err), _) | (Ok(_), Err(err)) => Some(err.to_string()),
            (Ok(_), Ok(_)) => None,
        };

        Self {
            score: score.ok(),
            insights: insights.ok().map(|insights| summarize(&insights)),
            error,
            profile,
        }
    }
}

const SCORED_CSV_COLUMNS: [&str; 11] = [
    "FamilyID",
    "Income",
    "Savings",
    "MonthlyExpenses",
    "LoanPayments",
    "CreditCardSpending",
    "Dependents",
    "FinancialGoalsMet",
    "TravelSpending",
    "EntertainmentSpending",
    "FinancialScore",
];

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScoredCsvRow {
    #[serde(rename = "FamilyID")]
    family_id: FamilyId,
    income: f64,
    savings: f64,
    monthly_expenses: f64,
    loan_payments: f64,
    credit_card_spending: f64,
    dependents: i64,
    financial_goals_met: i64,
    travel_spending: f64,
    entertainment_spending: f64,
    financial_score: Option<f64>,
}

impl From<&ScoredFamily> for ScoredCsvRow {
    fn from(scored: &ScoredFamily) -> Self {
        let record = &scored.profile.record;
        Self {
            family_id: record.family_id,
            income: record.income,
            savings: record.savings,
            monthly_expenses: record.monthly_expenses,
            loan_payments: record.loan_payments,
            credit_card_spending: record.credit_card_spending,
            dependents: scored.profile.dependents,
            financial_goals_met: record.financial_goals_met,
            travel_spending: record.travel_spending,
            entertainment_spending: record.entertainment_spending,
            financial_score: scored.score,
        }
    }
}

/// Analysis state for one upload: the shared source table and the records
/// added on top of it. Every scored view is recomputed from both.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    source: Arc<Dataset>,
    added: Vec<FamilyProfile>,
    engine: ScoringEngine,
}

impl DashboardSession {
    pub fn new(source: Arc<Dataset>, engine: ScoringEngine) -> Self {
        Self {
            source,
            added: Vec::new(),
            engine,
        }
    }

    pub fn source(&self) -> &Dataset {
        &self.source
    }

    pub fn added(&self) -> &[FamilyProfile] {
        &self.added
    }

    /// Appends the record whether or not it scores, mirroring how the
    /// scored table keeps rows with an undefined score.
    pub fn add_record(&mut self, profile: FamilyProfile) -> Result<ScoreAssessment, ScoringError> {
        let outcome = self.engine.assess(&profile.record);
        info!(
            family_id = %profile.record.family_id,
            scored = outcome.is_ok(),
            "added family record to session"
        );
        self.added.push(profile);
        outcome
    }

    pub fn scored_families(&self) -> Vec<ScoredFamily> {
        self.source
            .families()
            .iter()
            .chain(self.added.iter())
            .map(|profile| ScoredFamily::evaluate(profile.clone(), &self.engine))
            .collect()
    }

    /// Mean over scorable families only.
    pub fn average_score(&self) -> Option<f64> {
        average(&self.scored_families())
    }

    pub fn correlation_matrix(&self) -> CorrelationMatrix {
        correlation_for(&self.scored_families())
    }

    pub fn write_scored_csv<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let scored_families = self.scored_families();
        let mut csv_writer = csv::Writer::from_writer(writer);
        // serialize only emits the header alongside the first row
        if scored_families.is_empty() {
            csv_writer.write_record(SCORED_CSV_COLUMNS)?;
        }
        for scored in &scored_families {
            csv_writer.serialize(ScoredCsvRow::from(scored))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

pub(crate) fn average(scored: &[ScoredFamily]) -> Option<f64> {
    let scores: Vec<f64> = scored.iter().filter_map(|family| family.score).collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

pub(crate) fn correlation_for(scored: &[ScoredFamily]) -> CorrelationMatrix {
    let columns: [(&str, fn(&ScoredFamily) -> Option<f64>); 11] = [
        ("FamilyID", |s| Some(s.profile.record.family_id.0 as f64)),
        ("Income", |s| Some(s.profile.record.income)),
        ("Savings", |s| Some(s.profile.record.savings)),
        ("MonthlyExpenses", |s| Some(s.profile.record.monthly_expenses)),
        ("LoanPayments", |s| Some(s.profile.record.loan_payments)),
        ("CreditCardSpending", |s| Some(s.profile.record.credit_card_spending)),
        ("Dependents", |s| Some(s.profile.dependents as f64)),
        ("FinancialGoalsMet", |s| Some(s.profile.record.financial_goals_met as f64)),
        ("TravelSpending", |s| Some(s.profile.record.travel_spending)),
        ("EntertainmentSpending", |s| Some(s.profile.record.entertainment_spending)),
        ("FinancialScore", |s| s.score),
    ];

    let columns: Vec<(String, Vec<Option<f64>>)> = columns
        .iter()
        .map(|(name, extract)| (name.to_string(), scored.iter().map(extract).collect()))
        .collect();
    CorrelationMatrix::from_columns(&columns)
}
