use serde::{Deserialize, Serialize};

/// Per-metric weights of the overall score. The defaults sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub named_entities: f64,
    pub fact_density: f64,
    pub novelty: f64,
    pub analytical_depth: f64,
    pub readability: f64,
    pub topic_relevance: f64,
    pub sentiment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            named_entities: 0.20,
            fact_density: 0.20,
            novelty: 0.15,
            analytical_depth: 0.20,
            readability: 0.10,
            topic_relevance: 0.10,
            sentiment: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.named_entities
            + self.fact_density
            + self.novelty
            + self.analytical_depth
            + self.readability
            + self.topic_relevance
            + self.sentiment
    }
}

/// Thresholds used by the reason rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReasonThresholds {
    pub minimum_named_entities: usize,
    pub high_signal: f64,
    pub low_signal: f64,
}

impl Default for ReasonThresholds {
    fn default() -> Self {
        Self {
            minimum_named_entities: 5,
            high_signal: 0.7,
            low_signal: 0.3,
        }
    }
}

/// Rubric handed to the aggregator and reason rules at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Entity count at which the entity contribution saturates.
    pub entity_saturation: usize,
    pub worthy_threshold: f64,
    pub reasons: ReasonThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            entity_saturation: 20,
            worthy_threshold: 0.7,
            reasons: ReasonThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((ScoringWeights::default().total() - 1.0).abs() < 1e-12);
    }
}
