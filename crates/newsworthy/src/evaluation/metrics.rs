use tracing::debug;

use super::domain::{Article, ContentMetrics};
use crate::providers::{
    Capability, DocumentAnalysis, NlpProviders, ProviderError, ZeroShotResult,
};

/// Candidate labels submitted for the novelty check.
pub const NOVELTY_LABELS: [&str; 4] = ["breaking news", "common knowledge", "analysis", "opinion"];
const BREAKING_NEWS_WEIGHT: f64 = 0.7;
const ANALYSIS_WEIGHT: f64 = 0.3;

/// Dependency roles counted as causal, contrastive or connective markers.
pub const ANALYTICAL_ROLES: [&str; 4] = ["because", "therefore", "however", "moreover"];
const ANALYTICAL_SATURATION: f64 = 10.0;

const READABILITY_BASELINE: f64 = 10.0;
const READABILITY_SPAN: f64 = 30.0;

/// Used when an article declares no categories: unknown, not penalised.
pub const DEFAULT_TOPIC_RELEVANCE: f64 = 0.5;

/// Maximum number of characters sent to the sentiment provider.
pub const SENTIMENT_CHAR_LIMIT: usize = 512;

/// Failure of a single provider-backed metric, tagged with its capability.
#[derive(Debug, thiserror::Error)]
#[error("{capability} failed: {source}")]
pub struct MetricError {
    pub capability: Capability,
    #[source]
    pub source: ProviderError,
}

impl MetricError {
    fn new(capability: Capability, source: ProviderError) -> Self {
        Self { capability, source }
    }
}

/// Derives [`ContentMetrics`] from an article and provider outputs.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    providers: NlpProviders,
}

impl MetricsCalculator {
    pub fn new(providers: NlpProviders) -> Self {
        Self { providers }
    }

    /// Issue the four provider calls concurrently and assemble the metrics record.
    ///
    /// The first failure drops the remaining in-flight calls.
    pub async fn calculate(&self, article: &Article) -> Result<ContentMetrics, MetricError> {
        let (document, novelty, topic_relevance, sentiment) = tokio::try_join!(
            self.analyze_document(&article.content),
            self.novelty_score(&article.content),
            self.topic_relevance_score(article),
            self.sentiment_score(&article.content),
        )?;

        Ok(metrics_from_parts(
            &document,
            novelty,
            topic_relevance,
            sentiment,
        ))
    }

    async fn analyze_document(&self, content: &str) -> Result<DocumentAnalysis, MetricError> {
        let document = self
            .providers
            .analyzer
            .analyze(content)
            .await
            .map_err(|err| MetricError::new(Capability::DocumentAnalysis, err))?;
        debug!(
            entities = document.entities.len(),
            sentences = document.sentences.len(),
            tokens = document.tokens.len(),
            "document analysed"
        );
        Ok(document)
    }

    pub async fn novelty_score(&self, content: &str) -> Result<f64, MetricError> {
        let labels: Vec<String> = NOVELTY_LABELS.iter().map(|label| label.to_string()).collect();
        let result = self
            .providers
            .zero_shot
            .classify(content, &labels)
            .await
            .map_err(|err| MetricError::new(Capability::ZeroShot, err))?;

        novelty_from(&result).map_err(|err| MetricError::new(Capability::ZeroShot, err))
    }

    pub async fn topic_relevance_score(&self, article: &Article) -> Result<f64, MetricError> {
        if article.categories.is_empty() {
            return Ok(DEFAULT_TOPIC_RELEVANCE);
        }

        let result = self
            .providers
            .zero_shot
            .classify(&article.content, &article.categories)
            .await
            .map_err(|err| MetricError::new(Capability::ZeroShot, err))?;

        result
            .max_score()
            .ok_or_else(|| MetricError::new(Capability::ZeroShot, ProviderError::EmptyScores))
    }

    pub async fn sentiment_score(&self, content: &str) -> Result<f64, MetricError> {
        let excerpt = truncate_chars(content, SENTIMENT_CHAR_LIMIT);
        let result = self
            .providers
            .sentiment
            .classify_sentiment(excerpt)
            .await
            .map_err(|err| MetricError::new(Capability::Sentiment, err))?;
        debug!(label = %result.label, score = result.score, "sentiment classified");
        Ok(result.score)
    }
}

/// Combine provider outputs with the pure, document-derived metrics.
pub fn metrics_from_parts(
    document: &DocumentAnalysis,
    novelty_score: f64,
    topic_relevance_score: f64,
    sentiment_score: f64,
) -> ContentMetrics {
    let named_entities_count = document.entities.len();
    ContentMetrics {
        named_entities_count,
        fact_density_score: fact_density(named_entities_count, document.token_count()),
        novelty_score,
        analytical_depth_score: analytical_depth(document),
        readability_score: readability(document),
        topic_relevance_score,
        sentiment_score,
    }
}

/// Entities per token, with `+1` guarding the empty document. Not clamped.
pub fn fact_density(entity_count: usize, token_count: usize) -> f64 {
    entity_count as f64 / (token_count as f64 + 1.0)
}

pub fn analytical_depth(document: &DocumentAnalysis) -> f64 {
    let markers = document
        .tokens
        .iter()
        .filter(|token| ANALYTICAL_ROLES.contains(&token.dep.as_str()))
        .count();
    (markers as f64 / ANALYTICAL_SATURATION).clamp(0.0, 1.0)
}

/// `1 - min(1, (avg_len - 10) / 30)`. Sentences shorter than the baseline score above 1.0.
pub fn readability(document: &DocumentAnalysis) -> f64 {
    let sentences = document.sentences.len().max(1) as f64;
    let average_length = document.word_count() as f64 / sentences;
    1.0 - ((average_length - READABILITY_BASELINE) / READABILITY_SPAN).min(1.0)
}

pub fn novelty_from(result: &ZeroShotResult) -> Result<f64, ProviderError> {
    let score = |label: &str| {
        result
            .score_for(label)
            .ok_or_else(|| ProviderError::MissingLabel(label.to_string()))
    };
    Ok(BREAKING_NEWS_WEIGHT * score("breaking news")? + ANALYSIS_WEIGHT * score("analysis")?)
}

/// First `limit` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}
