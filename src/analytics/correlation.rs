use crate::model::{MetricKey, PlayerGameRecord};
use serde::{Deserialize, Serialize};

/// Relative variance below which a series is treated as constant.
const VARIANCE_TOLERANCE: f64 = 1e-12;

/// Metrics checked against fan sentiment, in display order before sorting.
pub const CORRELATION_METRICS: [MetricKey; 8] = [
    MetricKey::Ts,
    MetricKey::Efg,
    MetricKey::PlusMinus,
    MetricKey::Points,
    MetricKey::Assists,
    MetricKey::Rebounds,
    MetricKey::Minutes,
    MetricKey::Mentions,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub metric: MetricKey,
    pub label: String,
    /// Pearson r in [-1, 1]; 0 when undefined.
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    StrongPositive,
    StrongNegative,
    Weak,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.5 {
            Self::StrongPositive
        } else if r < -0.5 {
            Self::StrongNegative
        } else {
            Self::Weak
        }
    }
}

impl std::fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongPositive => write!(f, "Strong Positive"),
            Self::StrongNegative => write!(f, "Strong Negative"),
            Self::Weak => write!(f, "Weak/No Correlation"),
        }
    }
}

/// Pearson's r over `(x, y)` pairs using the sums formula.
///
/// Non-finite pairs are dropped. Fewer than two pairs, or a series with no
/// variance, gives 0.
pub fn pearson(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let mut n = 0.0_f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for (x, y) in pairs {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    if n < 2.0 {
        return 0.0;
    }

    let var_x = n * sum_x2 - sum_x * sum_x;
    let var_y = n * sum_y2 - sum_y * sum_y;
    // Rounding can leave a constant series with a tiny positive variance.
    if var_x <= VARIANCE_TOLERANCE * n * sum_x2 || var_y <= VARIANCE_TOLERANCE * n * sum_y2 {
        return 0.0;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let r = (n * sum_xy - sum_x * sum_y) / denominator;
    if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Correlation between one metric and sentiment, over records that have both.
pub fn metric_sentiment_correlation(records: &[PlayerGameRecord], metric: MetricKey) -> f64 {
    pearson(
        records
            .iter()
            .filter_map(|r| Some((r.metric(metric)?, r.sentiment?))),
    )
}

/// Every metric in [`CORRELATION_METRICS`], strongest positive first.
pub fn correlate_with_sentiment(records: &[PlayerGameRecord]) -> Vec<CorrelationResult> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<CorrelationResult> = CORRELATION_METRICS
        .iter()
        .map(|&metric| {
            let coefficient = metric_sentiment_correlation(records, metric);
            CorrelationResult {
                metric,
                label: metric.label().to_string(),
                coefficient,
                strength: CorrelationStrength::from_coefficient(coefficient),
            }
        })
        .collect();

    results.sort_by(|a, b| b.coefficient.total_cmp(&a.coefficient));
    results
}
