use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::evaluation::{Article, ArticleEvaluator, ContentMetrics, ScoringConfig};
use crate::providers::{
    Capability, DocumentAnalysis, DocumentAnalyzer, EntitySpan, NlpProviders, ProviderError,
    SentenceSpan, SentimentClassifier, SentimentResult, Token, ZeroShotClassifier,
    ZeroShotResult,
};

/// Scripted provider that records how it was called.
pub(super) struct ScriptedProvider {
    pub(super) document: DocumentAnalysis,
    pub(super) sentiment: f64,
    pub(super) novelty: ZeroShotResult,
    pub(super) topics: ZeroShotResult,
    pub(super) failing: Option<Capability>,
    pub(super) calls: AtomicUsize,
    pub(super) zero_shot_calls: AtomicUsize,
    pub(super) sentiment_inputs: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(super) fn new(document: DocumentAnalysis) -> Self {
        Self {
            document,
            sentiment: 0.1,
            novelty: novelty_result(0.5, 0.2, 0.2, 0.1),
            topics: ZeroShotResult {
                labels: vec!["markets".to_string()],
                scores: vec![0.9],
            },
            failing: None,
            calls: AtomicUsize::new(0),
            zero_shot_calls: AtomicUsize::new(0),
            sentiment_inputs: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn zero_shot_calls(&self) -> usize {
        self.zero_shot_calls.load(Ordering::SeqCst)
    }

    fn check(&self, capability: Capability) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing == Some(capability) {
            return Err(ProviderError::Unavailable(format!("{capability} offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentAnalyzer for ScriptedProvider {
    async fn analyze(&self, _text: &str) -> Result<DocumentAnalysis, ProviderError> {
        self.check(Capability::DocumentAnalysis)?;
        Ok(self.document.clone())
    }
}

#[async_trait]
impl SentimentClassifier for ScriptedProvider {
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentResult, ProviderError> {
        self.check(Capability::Sentiment)?;
        self.sentiment_inputs
            .lock()
            .expect("sentiment input mutex poisoned")
            .push(text.to_string());
        Ok(SentimentResult {
            label: "POSITIVE".to_string(),
            score: self.sentiment,
        })
    }
}

#[async_trait]
impl ZeroShotClassifier for ScriptedProvider {
    async fn classify(
        &self,
        _text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ProviderError> {
        self.check(Capability::ZeroShot)?;
        self.zero_shot_calls.fetch_add(1, Ordering::SeqCst);
        if candidate_labels.iter().any(|label| label == "breaking news") {
            Ok(self.novelty.clone())
        } else {
            Ok(self.topics.clone())
        }
    }
}

/// Novelty result returned in a provider-chosen order unrelated to the request.
pub(super) fn novelty_result(
    breaking: f64,
    common: f64,
    analysis: f64,
    opinion: f64,
) -> ZeroShotResult {
    ZeroShotResult {
        labels: vec![
            "opinion".to_string(),
            "analysis".to_string(),
            "common knowledge".to_string(),
            "breaking news".to_string(),
        ],
        scores: vec![opinion, analysis, common, breaking],
    }
}

/// Document with `tokens` word tokens, `entities` entity spans and `sentences` sentences.
pub(super) fn document(tokens: usize, entities: usize, sentences: usize) -> DocumentAnalysis {
    DocumentAnalysis {
        entities: (0..entities)
            .map(|index| EntitySpan {
                text: format!("Entity{index}"),
                label: "ORG".to_string(),
                start: index,
                end: index + 1,
            })
            .collect(),
        sentences: (0..sentences)
            .map(|index| SentenceSpan {
                start: index,
                end: index + 1,
            })
            .collect(),
        tokens: (0..tokens)
            .map(|index| Token {
                text: format!("word{index}"),
                is_punct: false,
                dep: String::new(),
            })
            .collect(),
    }
}

pub(super) fn article(content: &str, categories: &[&str]) -> Article {
    Article {
        title: "Central bank holds rates".to_string(),
        content: content.to_string(),
        source: "Wire".to_string(),
        published_at: Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
        author: Some("Desk".to_string()),
        url: "https://news.example/rates".to_string(),
        categories: categories.iter().map(|category| category.to_string()).collect(),
    }
}

pub(super) fn evaluator_with(provider: Arc<ScriptedProvider>) -> ArticleEvaluator {
    ArticleEvaluator::new(NlpProviders::from_shared(provider), ScoringConfig::default())
}

pub(super) fn metrics(
    named_entities_count: usize,
    fact_density_score: f64,
    novelty_score: f64,
    analytical_depth_score: f64,
) -> ContentMetrics {
    ContentMetrics {
        named_entities_count,
        fact_density_score,
        novelty_score,
        analytical_depth_score,
        readability_score: 0.5,
        topic_relevance_score: 0.5,
        sentiment_score: 0.0,
    }
}
