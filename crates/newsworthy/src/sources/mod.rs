//! Article sources feeding the batch evaluation flow.

pub mod newsapi;

pub use newsapi::NewsApiClient;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::evaluation::Article;

/// Filters applied when pulling articles from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub query: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub languages: Vec<String>,
    pub categories: Vec<String>,
    pub source_locations: Vec<String>,
    pub limit: u32,
}

impl FetchQuery {
    pub fn new(language: impl Into<String>, limit: u32) -> Self {
        Self {
            query: None,
            from_date: None,
            to_date: None,
            languages: vec![language.into()],
            categories: Vec::new(),
            source_locations: Vec::new(),
            limit,
        }
    }
}

/// An article together with the source metadata that does not take part in scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub location: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("article source unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("article source returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("article source payload could not be decoded: {0}")]
    Decode(String),
    #[error("invalid article source endpoint: {0}")]
    InvalidEndpoint(String),
}

#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_articles(&self, query: &FetchQuery) -> Result<Vec<SourcedArticle>, SourceError>;
}

/// Parse `YYYY-MM-DD`, also accepting a full RFC 3339 timestamp and keeping its date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|timestamp| timestamp.date_naive()))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
