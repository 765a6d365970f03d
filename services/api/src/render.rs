use crate::infra::parse_profile;
use chrono::Local;
use clap::Args;
use finscore::config::AppConfig;
use finscore::dataset::{
    load_transactions_from_path, DashboardSession, Dataset, DatasetReport, FamilyProfile,
};
use finscore::error::AppError;
use finscore::scoring::{
    FamilyId, FinancialRecord, ScoreAssessment, ScoringConfig, ScoringEngine,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Family identifier echoed in the output
    #[arg(long, default_value_t = 0)]
    pub(crate) family_id: i64,
    #[arg(long)]
    pub(crate) income: f64,
    #[arg(long)]
    pub(crate) savings: f64,
    #[arg(long)]
    pub(crate) monthly_expenses: f64,
    #[arg(long)]
    pub(crate) loan_payments: f64,
    #[arg(long)]
    pub(crate) credit_card_spending: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) travel_spending: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) entertainment_spending: f64,
    /// Percentage of financial goals met (0-100)
    #[arg(long)]
    pub(crate) financial_goals_met: i64,
}

impl From<ScoreArgs> for FinancialRecord {
    fn from(args: ScoreArgs) -> Self {
        Self {
            family_id: FamilyId(args.family_id),
            income: args.income,
            savings: args.savings,
            monthly_expenses: args.monthly_expenses,
            loan_payments: args.loan_payments,
            credit_card_spending: args.credit_card_spending,
            travel_spending: args.travel_spending,
            entertainment_spending: args.entertainment_spending,
            financial_goals_met: args.financial_goals_met,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Spending dataset CSV to analyse
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Family to break down by category (defaults to the first family)
    #[arg(long)]
    pub(crate) family_id: Option<i64>,
    /// Additional family record as JSON; may be repeated
    #[arg(long, value_parser = parse_profile)]
    pub(crate) add: Vec<FamilyProfile>,
    /// Write the scored family table to this CSV path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn scoring_config() -> Result<ScoringConfig, AppError> {
    Ok(AppConfig::load()?.scoring)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = ScoringEngine::new(scoring_config()?);
    let record = FinancialRecord::from(args);
    let assessment = engine.assess(&record)?;
    print!("{}", render_assessment(&assessment));
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        csv,
        family_id,
        add,
        output,
    } = args;

    let rows = load_transactions_from_path(&csv)?;
    let engine = ScoringEngine::new(scoring_config()?);
    let mut session = DashboardSession::new(Arc::new(Dataset::new(rows)), engine);

    let mut added = Vec::new();
    for profile in add {
        let family_id = profile.record.family_id;
        added.push((family_id, session.add_record(profile)));
    }

    let report = DatasetReport::build(&session, family_id.map(FamilyId));
    print!("{}", render_report(&report));

    if !added.is_empty() {
        println!("\nNew family records");
        for (family_id, outcome) in &added {
            match outcome {
                Ok(assessment) => println!(
                    "- Family {family_id}: {:.2} | {}",
                    assessment.score,
                    assessment.insight_summary()
                ),
                Err(err) => println!("- Family {family_id}: not scored ({err})"),
            }
        }
    }

    if let Some(path) = output {
        let writer = BufWriter::new(File::create(&path)?);
        session.write_scored_csv(writer)?;
        println!("\nScored dataset written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn render_assessment(assessment: &ScoreAssessment) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Family {} financial score: {:.2}\n",
        assessment.family_id, assessment.score
    ));
    if (assessment.raw_score - assessment.score).abs() > f64::EPSILON {
        out.push_str(&format!(
            "(weighted total {:.2} clamped to the 0-100 range)\n",
            assessment.raw_score
        ));
    }
    out.push_str("Components:\n");
    for component in &assessment.components {
        out.push_str(&format!(
            "  - {:<32} ratio {:>8.3} | {:>+8.2} pts\n",
            component.factor.label(),
            component.ratio,
            component.points
        ));
    }
    out.push_str(&format!("Insights: {}\n", assessment.insight_summary()));
    out
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.2}"))
}

pub(crate) fn render_report(report: &DatasetReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Financial dataset report ({} rows, generated {})\n",
        report.row_count,
        report
            .generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    ));

    out.push_str("\nSummary statistics\n");
    for summary in &report.summary {
        out.push_str(&format!(
            "  - {:<20} n={:<5} mean {:>10} | std {:>10} | min {:>10} | median {:>10} | max {:>10}\n",
            summary.column,
            summary.count,
            cell(summary.mean),
            cell(summary.std),
            cell(summary.min),
            cell(summary.median),
            cell(summary.max)
        ));
    }

    out.push_str("\nMonthly expenses by family\n");
    for total in &report.family_spending {
        out.push_str(&format!(
            "  - Family {}: {:.2}\n",
            total.family_id, total.monthly_expenses
        ));
    }

    out.push_str("\nSpending by category\n");
    for total in &report.category_totals {
        out.push_str(&format!("  - {}: {:.2}\n", total.category, total.amount));
    }

    out.push_str("\nAmount spent by member and category\n");
    out.push_str(&format!(
        "  {:>8} {:>8} {}\n",
        "Family",
        "Member",
        report
            .pivot
            .categories
            .iter()
            .map(|category| format!("{category:>14}"))
            .collect::<String>()
    ));
    for row in &report.pivot.rows {
        out.push_str(&format!(
            "  {:>8} {:>8} {}\n",
            row.family_id.to_string(),
            row.member_id,
            row.amounts
                .iter()
                .map(|amount| format!("{amount:>14.2}"))
                .collect::<String>()
        ));
    }

    if let Some(distribution) = &report.family_distribution {
        out.push_str(&format!(
            "\nSpending distribution for family {}\n",
            distribution.family_id
        ));
        let total: f64 = distribution.categories.iter().map(|c| c.amount).sum();
        for category in &distribution.categories {
            let share = if total > 0.0 {
                category.amount / total * 100.0
            } else {
                0.0
            };
            out.push_str(&format!(
                "  - {}: {:.2} ({share:.0}%)\n",
                category.category, category.amount
            ));
        }
    }

    out.push_str("\nCorrelation matrix\n");
    out.push_str(&format!(
        "  {:<22}{}\n",
        "",
        (0..report.correlation.columns.len())
            .map(|index| format!("{:>7}", format!("c{index}")))
            .collect::<String>()
    ));
    for (index, (name, values)) in report
        .correlation
        .columns
        .iter()
        .zip(&report.correlation.values)
        .enumerate()
    {
        out.push_str(&format!(
            "  c{index:<2} {:<18}{}\n",
            name,
            values
                .iter()
                .map(|value| match value {
                    Some(value) => format!("{value:>7.2}"),
                    None => format!("{:>7}", "-"),
                })
                .collect::<String>()
        ));
    }

    out.push_str("\nFinancial health scoring\n");
    for scored in &report.scored_families {
        let family_id = scored.profile.record.family_id;
        match (&scored.score, &scored.error) {
            (Some(score), _) => out.push_str(&format!(
                "  - Family {family_id}: {score:.2} | {}\n",
                scored.insights.as_deref().unwrap_or_default()
            )),
            (None, Some(err)) => {
                out.push_str(&format!("  - Family {family_id}: not scored ({err})\n"))
            }
            (None, None) => out.push_str(&format!("  - Family {family_id}: not scored\n")),
        }
    }
    out.push_str(&format!(
        "Average financial score: {}\n",
        cell(report.average_score)
    ));

    out
}
