use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{FamilyId, FinancialRecord, ScoreAssessment, ScoringError};
use super::{ScoringConfig, ScoringEngine};

/// Wire response for a single scored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialScoreResponse {
    #[serde(rename = "FamilyID")]
    pub family_id: FamilyId,
    pub financial_score: f64,
    pub insights: String,
}

impl From<&ScoreAssessment> for FinancialScoreResponse {
    fn from(assessment: &ScoreAssessment) -> Self {
        Self {
            family_id: assessment.family_id,
            financial_score: assessment.score,
            insights: assessment.insight_summary(),
        }
    }
}

/// Thin adapter exposing the scoring engine to request handlers.
#[derive(Debug, Clone, Default)]
pub struct FinancialScoreService {
    engine: ScoringEngine,
}

impl FinancialScoreService {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            engine: ScoringEngine::new(config),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn assess(&self, record: &FinancialRecord) -> Result<ScoreAssessment, ScoringError> {
        match self.engine.assess(record) {
            Ok(assessment) => {
                debug!(
                    family_id = %record.family_id,
                    score = assessment.score,
                    insights = assessment.insights.len(),
                    "scored financial record"
                );
                Ok(assessment)
            }
            Err(err) => {
                warn!(family_id = %record.family_id, error = %err, "financial record could not be scored");
                Err(err)
            }
        }
    }

    pub fn respond(&self, record: &FinancialRecord) -> Result<FinancialScoreResponse, ScoringError> {
        self.assess(record)
            .map(|assessment| FinancialScoreResponse::from(&assessment))
    }
}
