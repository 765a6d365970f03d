use serde::Serialize;

use super::loader::TransactionRow;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; undefined below two observations.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|mean| {
            let squares: f64 = sorted.iter().map(|value| (value - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        });

        Self {
            column: column.to_string(),
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Linear interpolation between closest ranks over pre-sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Summaries for every numeric column of the uploaded table. Blank cells are
/// not counted.
pub fn summary_statistics(rows: &[TransactionRow]) -> Vec<ColumnSummary> {
    let columns: [(&str, fn(&TransactionRow) -> Option<f64>); 10] = [
        ("FamilyID", |row| Some(row.family_id.0 as f64)),
        ("Income", |row| Some(row.income)),
        ("Savings", |row| Some(row.savings)),
        ("MonthlyExpenses", |row| Some(row.monthly_expenses)),
        ("LoanPayments", |row| Some(row.loan_payments)),
        ("CreditCardSpending", |row| Some(row.credit_card_spending)),
        ("Amount", |row| row.amount),
        ("MemberID", |row| Some(row.member_id as f64)),
        ("Dependents", |row| Some(row.dependents as f64)),
        ("FinancialGoalsMet", |row| Some(row.financial_goals_met as f64)),
    ];

    columns
        .iter()
        .map(|(name, extract)| {
            let values: Vec<f64> = rows.iter().filter_map(extract).collect();
            ColumnSummary::from_values(name, &values)
        })
        .collect()
}

/// Pairwise Pearson correlations; `None` marks an undefined coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Each column may contain gaps; a pair only uses rows where both sides
    /// are present.
    pub fn from_columns(columns: &[(String, Vec<Option<f64>>)]) -> Self {
        let values = columns
            .iter()
            .map(|(_, left)| {
                columns
                    .iter()
                    .map(|(_, right)| pearson(left, right))
                    .collect()
            })
            .collect();

        Self {
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let row = self.columns.iter().position(|name| name == row)?;
        let column = self.columns.iter().position(|name| name == column)?;
        self.values[row][column]
    }
}

fn pearson(left: &[Option<f64>], right: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = left
        .iter()
        .zip(right)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    Some((covariance / denominator).clamp(-1.0, 1.0))
}
