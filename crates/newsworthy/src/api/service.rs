use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::evaluation::{Article, ArticleEvaluation, ArticleEvaluator, EvaluationError};
use crate::sources::{deserialize_optional_date, ArticleSource, FetchQuery, SourceError, SourcedArticle};

const DEFAULT_ARTICLES_LIMIT: u32 = 100;

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

/// Body of a fetch-and-evaluate request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to_date: Option<NaiveDate>,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub source_locations: Option<Vec<String>>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl FetchRequest {
    /// A missing or zero limit falls back to `default_limit`.
    pub fn into_query(self, default_limit: u32) -> FetchQuery {
        let languages = if self.languages.is_empty() {
            default_languages()
        } else {
            self.languages
        };

        FetchQuery {
            query: self.query,
            from_date: self.from_date,
            to_date: self.to_date,
            languages,
            categories: self.categories.unwrap_or_default(),
            source_locations: self.source_locations.unwrap_or_default(),
            limit: self.limit.filter(|limit| *limit > 0).unwrap_or(default_limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedArticle {
    pub article: SourcedArticle,
    pub evaluation: ArticleEvaluation,
}

/// Outcome of a batch: `results` holds worthy articles unless every result was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchReport {
    pub total_articles: usize,
    pub worthy_articles: usize,
    pub results: Vec<EvaluatedArticle>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("no article source is configured")]
    SourceUnavailable,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Shared state behind the evaluation routes.
pub struct EvaluationService {
    evaluator: ArticleEvaluator,
    source: Option<Arc<dyn ArticleSource>>,
    default_limit: u32,
}

impl EvaluationService {
    pub fn new(evaluator: ArticleEvaluator) -> Self {
        Self {
            evaluator,
            source: None,
            default_limit: DEFAULT_ARTICLES_LIMIT,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn ArticleSource>, default_limit: u32) -> Self {
        self.source = Some(source);
        self.default_limit = default_limit;
        self
    }

    pub fn evaluator(&self) -> &ArticleEvaluator {
        &self.evaluator
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub async fn evaluate(&self, article: &Article) -> Result<ArticleEvaluation, EvaluationError> {
        self.evaluator.evaluate(article).await
    }

    /// Fetch from the configured source and evaluate each article in turn.
    ///
    /// Articles without content are skipped; any other evaluation failure fails the batch.
    pub async fn fetch_and_evaluate(
        &self,
        request: FetchRequest,
        include_all: bool,
    ) -> Result<FetchReport, ServiceError> {
        let source = self.source.as_ref().ok_or(ServiceError::SourceUnavailable)?;
        let query = request.into_query(self.default_limit);
        let articles = source.fetch_articles(&query).await?;
        let total_articles = articles.len();

        let mut worthy_articles = 0;
        let mut results = Vec::new();
        for sourced in articles {
            let evaluation = match self.evaluator.evaluate(&sourced.article).await {
                Ok(evaluation) => evaluation,
                Err(EvaluationError::MalformedInput(reason)) => {
                    warn!(url = %sourced.article.url, %reason, "skipping article");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if evaluation.is_worthy {
                worthy_articles += 1;
            }
            if evaluation.is_worthy || include_all {
                results.push(EvaluatedArticle {
                    article: sourced,
                    evaluation,
                });
            }
        }

        info!(total_articles, worthy_articles, "batch evaluated");

        Ok(FetchReport {
            total_articles,
            worthy_articles,
            results,
        })
    }
}

impl fmt::Debug for EvaluationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationService")
            .field("evaluator", &self.evaluator)
            .field("source", &self.source.as_ref().map(|_| "<dyn ArticleSource>"))
            .field("default_limit", &self.default_limit)
            .finish()
    }
}
