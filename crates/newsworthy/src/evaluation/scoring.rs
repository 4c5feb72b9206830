use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::domain::ContentMetrics;

/// Aggregated decision derived from a metrics record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub overall_score: f64,
    pub confidence_score: f64,
    pub is_worthy: bool,
}

/// Weighted linear combination of the content metrics.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    config: ScoringConfig,
}

impl ScoreAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn aggregate(&self, metrics: &ContentMetrics) -> ScoreOutcome {
        let overall_score = self.overall_score(metrics);
        ScoreOutcome {
            overall_score,
            confidence_score: confidence_score(metrics),
            is_worthy: self.is_worthy(overall_score),
        }
    }

    /// Entity count scaled to `[0, 1]`, saturating at the configured count.
    pub fn normalized_entities(&self, count: usize) -> f64 {
        let saturation = self.config.entity_saturation.max(1) as f64;
        (count as f64 / saturation).min(1.0)
    }

    /// Clamped once, at the end; individual terms are not pre-clamped.
    pub fn overall_score(&self, metrics: &ContentMetrics) -> f64 {
        let weights = &self.config.weights;
        let score = weights.named_entities * self.normalized_entities(metrics.named_entities_count)
            + weights.fact_density * metrics.fact_density_score
            + weights.novelty * metrics.novelty_score
            + weights.analytical_depth * metrics.analytical_depth_score
            + weights.readability * metrics.readability_score
            + weights.topic_relevance * metrics.topic_relevance_score
            + weights.sentiment * metrics.sentiment_score.abs();

        score.clamp(0.0, 1.0)
    }

    pub fn is_worthy(&self, overall_score: f64) -> bool {
        overall_score >= self.config.worthy_threshold
    }
}

/// `1 - stddev` over fact density, novelty, analytical depth and topic relevance.
///
/// Left unclamped: it is a stability indicator, not a probability.
pub fn confidence_score(metrics: &ContentMetrics) -> f64 {
    1.0 - population_std_dev(&[
        metrics.fact_density_score,
        metrics.novelty_score,
        metrics.analytical_depth_score,
        metrics.topic_relevance_score,
    ])
}

pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;
    variance.sqrt()
}
