//! Interfaces to the NLP capability providers consumed by the evaluator.
//!
//! The evaluator only sees these traits. Concrete adapters live in [`http`] (a remote
//! inference sidecar) and [`lexicon`] (deterministic in-process heuristics).

pub mod http;
pub mod lexicon;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Byte-offset span of a recognised entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    #[serde(default)]
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Byte-offset span of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
}

/// Token with the flags the metrics calculator reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default)]
    pub is_punct: bool,
    /// Dependency role label assigned by the provider, empty when unknown.
    #[serde(default)]
    pub dep: String,
}

/// Document-level analysis of an article body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
    #[serde(default)]
    pub sentences: Vec<SentenceSpan>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl DocumentAnalysis {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|token| !token.is_punct).count()
    }
}

/// Top sentiment prediction for a span of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub score: f64,
}

/// Zero-shot affinities. `labels[i]` pairs with `scores[i]`; order is provider-defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeroShotResult {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotResult {
    /// Look up the affinity for `label` by identity, never by position.
    pub fn score_for(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|candidate| candidate == label)
            .and_then(|index| self.scores.get(index).copied())
    }

    pub fn max_score(&self) -> Option<f64> {
        self.scores.iter().copied().reduce(f64::max)
    }

    pub(crate) fn is_aligned(&self) -> bool {
        self.labels.len() == self.scores.len()
    }
}

/// Capability class, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    DocumentAnalysis,
    Sentiment,
    ZeroShot,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::DocumentAnalysis => "document analysis",
            Capability::Sentiment => "sentiment",
            Capability::ZeroShot => "zero-shot classification",
        };
        f.write_str(name)
    }
}

/// Failure raised by a capability provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider transport failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response could not be decoded: {0}")]
    Decode(String),
    #[error("provider response is missing label '{0}'")]
    MissingLabel(String),
    #[error("provider returned no scores")]
    EmptyScores,
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<DocumentAnalysis, ProviderError>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentResult, ProviderError>;
}

#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ProviderError>;
}

/// Long-lived, read-only provider handles shared across concurrent evaluations.
#[derive(Clone)]
pub struct NlpProviders {
    pub analyzer: Arc<dyn DocumentAnalyzer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub zero_shot: Arc<dyn ZeroShotClassifier>,
}

impl NlpProviders {
    pub fn new(
        analyzer: Arc<dyn DocumentAnalyzer>,
        sentiment: Arc<dyn SentimentClassifier>,
        zero_shot: Arc<dyn ZeroShotClassifier>,
    ) -> Self {
        Self {
            analyzer,
            sentiment,
            zero_shot,
        }
    }

    /// Bundle one adapter that implements every capability.
    pub fn from_shared<P>(provider: Arc<P>) -> Self
    where
        P: DocumentAnalyzer + SentimentClassifier + ZeroShotClassifier + 'static,
    {
        Self {
            analyzer: provider.clone(),
            sentiment: provider.clone(),
            zero_shot: provider,
        }
    }
}

impl fmt::Debug for NlpProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NlpProviders")
            .field("analyzer", &"<dyn DocumentAnalyzer>")
            .field("sentiment", &"<dyn SentimentClassifier>")
            .field("zero_shot", &"<dyn ZeroShotClassifier>")
            .finish()
    }
}
