//! Deterministic, in-process stand-ins for the NLP providers.
//!
//! Used for offline runs and demos. The heuristics are coarse on purpose: capitalised runs
//! become entities, connective words carry their own dependency role, and zero-shot
//! affinities come from keyword overlap.

use std::collections::HashSet;

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use super::{
    DocumentAnalysis, DocumentAnalyzer, EntitySpan, ProviderError, SentenceSpan,
    SentimentClassifier, SentimentResult, Token, ZeroShotClassifier, ZeroShotResult,
};

const CONNECTIVES: [&str; 4] = ["because", "therefore", "however", "moreover"];

const POSITIVE_WORDS: &[&str] = &[
    "gain", "gains", "growth", "improve", "improved", "success", "strong", "record", "win",
    "benefit", "positive", "rise", "rose", "surge", "boost", "good", "great", "optimistic",
];

const NEGATIVE_WORDS: &[&str] = &[
    "loss", "losses", "decline", "fell", "fall", "crisis", "weak", "fail", "failed", "risk",
    "negative", "drop", "slump", "bad", "worse", "worst", "concern", "warning", "threat",
];

const LABEL_CUES: &[(&str, &[&str])] = &[
    (
        "breaking news",
        &["breaking", "just", "announced", "today", "urgent", "developing", "new", "first"],
    ),
    (
        "common knowledge",
        &["always", "generally", "known", "everyone", "usually", "widely", "common"],
    ),
    (
        "analysis",
        &["because", "therefore", "however", "moreover", "analysis", "suggests", "data", "according"],
    ),
    (
        "opinion",
        &["i", "think", "believe", "should", "opinion", "must", "arguably"],
    ),
];

/// Rule-based provider implementing every capability in-process.
#[derive(Debug, Clone, Default)]
pub struct LexiconProvider;

impl LexiconProvider {
    pub fn new() -> Self {
        Self
    }

    fn lowercase_words(text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_lowercase).collect()
    }

    fn cues_for(label: &str) -> Vec<String> {
        let normalized = label.trim().to_lowercase();
        let mut cues: Vec<String> = Self::lowercase_words(&normalized);
        if let Some((_, extra)) = LABEL_CUES.iter().find(|(name, _)| *name == normalized) {
            cues.extend(extra.iter().map(|cue| cue.to_string()));
        }
        cues
    }
}

fn is_punctuation(token: &str) -> bool {
    !token.chars().any(char::is_alphanumeric)
}

fn is_capitalised(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

fn is_numeric(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit()) && !token.chars().any(char::is_alphabetic)
}

#[async_trait]
impl DocumentAnalyzer for LexiconProvider {
    async fn analyze(&self, text: &str) -> Result<DocumentAnalysis, ProviderError> {
        let sentences: Vec<SentenceSpan> = text
            .split_sentence_bound_indices()
            .filter(|(_, sentence)| !sentence.trim().is_empty())
            .map(|(start, sentence)| SentenceSpan {
                start,
                end: start + sentence.len(),
            })
            .collect();

        let pieces: Vec<(usize, &str)> = text
            .split_word_bound_indices()
            .filter(|(_, piece)| !piece.trim().is_empty())
            .collect();

        let tokens: Vec<Token> = pieces
            .iter()
            .map(|(_, piece)| {
                let lowered = piece.to_lowercase();
                let dep = if CONNECTIVES.contains(&lowered.as_str()) {
                    lowered
                } else {
                    String::new()
                };
                Token {
                    text: piece.to_string(),
                    is_punct: is_punctuation(piece),
                    dep,
                }
            })
            .collect();

        // Index of the first word in each sentence; a lone capital there is not a name.
        let sentence_starts: HashSet<usize> = sentences
            .iter()
            .filter_map(|span| {
                pieces.iter().position(|(offset, piece)| {
                    *offset >= span.start && *offset < span.end && !is_punctuation(piece)
                })
            })
            .collect();

        let mut entities = Vec::new();
        let mut index = 0;
        while index < pieces.len() {
            let (start, piece) = pieces[index];
            if is_numeric(piece) {
                entities.push(EntitySpan {
                    text: piece.to_string(),
                    label: "CARDINAL".to_string(),
                    start,
                    end: start + piece.len(),
                });
                index += 1;
                continue;
            }
            if !is_capitalised(piece) {
                index += 1;
                continue;
            }

            let mut last = index;
            while last + 1 < pieces.len() && is_capitalised(pieces[last + 1].1) {
                last += 1;
            }

            let run_length = last - index + 1;
            if run_length > 1 || !sentence_starts.contains(&index) {
                let (end_offset, end_piece) = pieces[last];
                let end = end_offset + end_piece.len();
                entities.push(EntitySpan {
                    text: text[start..end].to_string(),
                    label: "PROPER_NOUN".to_string(),
                    start,
                    end,
                });
            }
            index = last + 1;
        }

        Ok(DocumentAnalysis {
            entities,
            sentences,
            tokens,
        })
    }
}

#[async_trait]
impl SentimentClassifier for LexiconProvider {
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentResult, ProviderError> {
        let words = Self::lowercase_words(text);
        let positive = words
            .iter()
            .filter(|word| POSITIVE_WORDS.contains(&word.as_str()))
            .count() as f64;
        let negative = words
            .iter()
            .filter(|word| NEGATIVE_WORDS.contains(&word.as_str()))
            .count() as f64;

        let score = (positive - negative) / (positive + negative).max(1.0);
        let label = if score > 0.0 {
            "POSITIVE"
        } else if score < 0.0 {
            "NEGATIVE"
        } else {
            "NEUTRAL"
        };

        Ok(SentimentResult {
            label: label.to_string(),
            score,
        })
    }
}

#[async_trait]
impl ZeroShotClassifier for LexiconProvider {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ProviderError> {
        if candidate_labels.is_empty() {
            return Err(ProviderError::EmptyScores);
        }

        let words = Self::lowercase_words(text);
        let raw: Vec<(String, f64)> = candidate_labels
            .iter()
            .map(|label| {
                let cues = Self::cues_for(label);
                let hits = words.iter().filter(|word| cues.contains(word)).count();
                (label.clone(), hits as f64 + 1.0)
            })
            .collect();

        let total: f64 = raw.iter().map(|(_, weight)| weight).sum();
        let mut ranked: Vec<(String, f64)> = raw
            .into_iter()
            .map(|(label, weight)| (label, weight / total))
            .collect();
        // Highest affinity first, mirroring hosted zero-shot pipelines.
        ranked.sort_by(|left, right| right.1.total_cmp(&left.1));

        let (labels, scores) = ranked.into_iter().unzip();
        Ok(ZeroShotResult { labels, scores })
    }
}
