use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Article submitted for evaluation. Identity is assigned per evaluation, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub source: String,
    #[serde(alias = "published_date")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<String>,
    pub url: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// The seven content signals derived for a single evaluation.
///
/// `fact_density_score` is a ratio and may exceed 1.0 for short, entity-dense text, and
/// `readability_score` exceeds 1.0 for very short sentences. Consumers must not assume
/// `[0, 1]` for either.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentMetrics {
    pub named_entities_count: usize,
    pub fact_density_score: f64,
    pub novelty_score: f64,
    pub analytical_depth_score: f64,
    pub readability_score: f64,
    pub topic_relevance_score: f64,
    pub sentiment_score: f64,
}

/// Identifier minted for every evaluation, unrelated to article identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub Uuid);

impl EvaluationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Final evaluation artifact returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleEvaluation {
    pub evaluation_id: EvaluationId,
    pub overall_score: f64,
    pub is_worthy: bool,
    pub metrics: ContentMetrics,
    pub evaluation_timestamp: DateTime<Utc>,
    /// Stability indicator, not a probability. Can leave `[0, 1]` for pathological metrics.
    pub confidence_score: f64,
    /// Generation order is display order.
    pub reasons: Vec<String>,
}

impl ArticleEvaluation {
    pub fn summary(&self) -> String {
        let verdict = if self.is_worthy {
            "worthy of further analysis"
        } else {
            "not worthy of further analysis"
        };
        if self.reasons.is_empty() {
            format!("{verdict} (score {:.2})", self.overall_score)
        } else {
            format!(
                "{verdict} (score {:.2}): {}",
                self.overall_score,
                self.reasons.join("; ")
            )
        }
    }
}
