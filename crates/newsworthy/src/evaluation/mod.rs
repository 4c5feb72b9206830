//! Insight-worthiness evaluation: metrics, aggregation, reasons and the orchestrating evaluator.

mod config;
mod domain;
pub mod metrics;
pub mod reasons;
mod scoring;

#[cfg(test)]
mod tests;

pub use config::{ReasonThresholds, ScoringConfig, ScoringWeights};
pub use domain::{Article, ArticleEvaluation, ContentMetrics, EvaluationId};
pub use metrics::{MetricError, MetricsCalculator};
pub use reasons::ReasonGenerator;
pub use scoring::{confidence_score, ScoreAggregator, ScoreOutcome};

use chrono::Utc;
use tracing::info;

use crate::providers::{Capability, NlpProviders, ProviderError};

/// Error raised when an article cannot be evaluated. No partial result exists.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("article content is unusable: {0}")]
    MalformedInput(String),
    #[error("{capability} provider failed: {source}")]
    Provider {
        capability: Capability,
        #[source]
        source: ProviderError,
    },
}

impl From<MetricError> for EvaluationError {
    fn from(value: MetricError) -> Self {
        Self::Provider {
            capability: value.capability,
            source: value.source,
        }
    }
}

/// Entry point of the scoring core.
///
/// Holds only read-only provider handles and the rubric, so one instance can serve
/// concurrent evaluations.
#[derive(Debug, Clone)]
pub struct ArticleEvaluator {
    calculator: MetricsCalculator,
    aggregator: ScoreAggregator,
    reasons: ReasonGenerator,
}

impl ArticleEvaluator {
    pub fn new(providers: NlpProviders, config: ScoringConfig) -> Self {
        Self {
            calculator: MetricsCalculator::new(providers),
            aggregator: ScoreAggregator::new(config),
            reasons: ReasonGenerator::new(config),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        self.aggregator.config()
    }

    pub async fn evaluate(&self, article: &Article) -> Result<ArticleEvaluation, EvaluationError> {
        if article.content.trim().is_empty() {
            return Err(EvaluationError::MalformedInput(
                "content is empty".to_string(),
            ));
        }

        let metrics = self.calculator.calculate(article).await?;
        Ok(self.assemble(metrics))
    }

    /// Score an already computed metrics record and mint a fresh evaluation.
    pub fn assemble(&self, metrics: ContentMetrics) -> ArticleEvaluation {
        let outcome = self.aggregator.aggregate(&metrics);
        let reasons = self.reasons.generate(&metrics, outcome.overall_score);

        let evaluation = ArticleEvaluation {
            evaluation_id: EvaluationId::new(),
            overall_score: outcome.overall_score,
            is_worthy: outcome.is_worthy,
            metrics,
            evaluation_timestamp: Utc::now(),
            confidence_score: outcome.confidence_score,
            reasons,
        };

        info!(
            evaluation_id = %evaluation.evaluation_id,
            overall_score = evaluation.overall_score,
            is_worthy = evaluation.is_worthy,
            "article evaluated"
        );

        evaluation
    }
}
