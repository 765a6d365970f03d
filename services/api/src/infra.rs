use finscore::dataset::FamilyProfile;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Parses a `--add` argument: one family record as JSON.
pub(crate) fn parse_profile(raw: &str) -> Result<FamilyProfile, String> {
    serde_json::from_str(raw.trim()).map_err(|err| format!("invalid family record JSON ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use finscore::scoring::FamilyId;

    #[test]
    fn parse_profile_defaults_dependents() {
        let profile = parse_profile(
            r#"{"FamilyID": 9, "Income": 1000, "Savings": 100, "MonthlyExpenses": 400,
                "LoanPayments": 100, "CreditCardSpending": 50, "TravelSpending": 0,
                "EntertainmentSpending": 0, "FinancialGoalsMet": 10}"#,
        )
        .expect("valid record");
        assert_eq!(profile.record.family_id, FamilyId(9));
        assert_eq!(profile.dependents, 0);
    }

    #[test]
    fn parse_profile_reports_missing_fields() {
        let err = parse_profile(r#"{"FamilyID": 9}"#).expect_err("incomplete record");
        assert!(err.contains("Income"), "unexpected message: {err}");
    }
}
