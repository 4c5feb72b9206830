use super::config::ScoringConfig;
use super::domain::ContentMetrics;

pub const LOW_NAMED_ENTITIES: &str = "Low number of named entities";
pub const HIGH_FACT_DENSITY: &str = "High fact density";
pub const LOW_FACT_DENSITY: &str = "Low fact density";
pub const HIGH_NOVELTY: &str = "High novelty content";
pub const LOW_NOVELTY: &str = "Low novelty content";
pub const STRONG_ANALYTICAL_DEPTH: &str = "Strong analytical depth";
pub const LACKS_ANALYTICAL_DEPTH: &str = "Lacks analytical depth";
pub const MEETS_QUALITY_THRESHOLD: &str = "Meets overall quality threshold for further analysis";

/// Threshold rules turning metrics into display reasons.
#[derive(Debug, Clone)]
pub struct ReasonGenerator {
    config: ScoringConfig,
}

impl ReasonGenerator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Checks run in a fixed order and every triggered rule appends; none suppress another.
    pub fn generate(&self, metrics: &ContentMetrics, overall_score: f64) -> Vec<String> {
        let thresholds = &self.config.reasons;
        let mut reasons = Vec::new();

        if metrics.named_entities_count < thresholds.minimum_named_entities {
            reasons.push(LOW_NAMED_ENTITIES);
        }

        let banded = [
            (metrics.fact_density_score, HIGH_FACT_DENSITY, LOW_FACT_DENSITY),
            (metrics.novelty_score, HIGH_NOVELTY, LOW_NOVELTY),
            (
                metrics.analytical_depth_score,
                STRONG_ANALYTICAL_DEPTH,
                LACKS_ANALYTICAL_DEPTH,
            ),
        ];
        for (value, high, low) in banded {
            if value > thresholds.high_signal {
                reasons.push(high);
            } else if value < thresholds.low_signal {
                reasons.push(low);
            }
        }

        if overall_score >= self.config.worthy_threshold {
            reasons.push(MEETS_QUALITY_THRESHOLD);
        }

        reasons.into_iter().map(str::to_string).collect()
    }
}
