use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{ArticleSource, FetchQuery, SourceError, SourcedArticle};
use crate::config::NewsApiConfig;
use crate::evaluation::Article;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Client for the newsapi.ai `getArticles` endpoint.
#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(config: &NewsApiConfig) -> Result<Self, SourceError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|err| SourceError::InvalidEndpoint(format!("{}: {err}", config.endpoint)))?;
        let client = Client::builder().build().map_err(SourceError::Transport)?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    fn query_params(&self, query: &FetchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apiKey", self.api_key.clone()),
            ("articlesSortBy", "date".to_string()),
            ("articlesCount", query.limit.to_string()),
            ("articlesSortByAsc", "false".to_string()),
            ("includeArticleCategories", "true".to_string()),
            ("includeArticleImage", "true".to_string()),
            ("includeArticleBasicInfo", "true".to_string()),
            ("includeArticleLocation", "true".to_string()),
            ("includeArticleEntities", "true".to_string()),
            ("language", query.languages.join(",")),
        ];

        if let Some(text) = query.query.as_ref().filter(|text| !text.trim().is_empty()) {
            params.push(("q", text.clone()));
        }
        if let Some(date) = query.from_date {
            params.push(("dateStart", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(date) = query.to_date {
            params.push(("dateEnd", date.format(DATE_FORMAT).to_string()));
        }
        if !query.categories.is_empty() {
            params.push(("categoryUri", query.categories.join(",")));
        }
        if !query.source_locations.is_empty() {
            params.push(("sourceLocationUri", query.source_locations.join(",")));
        }

        params
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn fetch_articles(&self, query: &FetchQuery) -> Result<Vec<SourcedArticle>, SourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(SourceError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))?;

        let articles = envelope
            .articles
            .results
            .into_iter()
            .map(RawArticle::into_sourced)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = articles.len(), "articles fetched");
        Ok(articles)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    articles: ResultPage,
}

#[derive(Debug, Default, Deserialize)]
struct ResultPage {
    #[serde(default)]
    results: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    source: Option<RawSource>,
    #[serde(rename = "dateTime", default)]
    date_time: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    entities: Vec<serde_json::Value>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    location: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default)]
    label: Option<String>,
}

impl RawArticle {
    fn into_sourced(self) -> Result<SourcedArticle, SourceError> {
        let raw_timestamp = self.date_time.unwrap_or_default();
        let published_at = parse_timestamp(&raw_timestamp).ok_or_else(|| {
            SourceError::Decode(format!(
                "article '{}' has unparseable dateTime '{raw_timestamp}'",
                self.url
            ))
        })?;

        let categories = self
            .categories
            .into_iter()
            .filter_map(|category| category.label)
            .filter(|label| !label.is_empty())
            .collect();

        Ok(SourcedArticle {
            article: Article {
                title: self.title,
                content: self.body,
                source: self.source.map(|source| source.title).unwrap_or_default(),
                published_at,
                author: self.author.filter(|author| !author.is_empty()),
                url: self.url,
                categories,
            },
            entities: self.entities,
            image_url: self.image.filter(|image| !image.is_empty()),
            language: self.language.filter(|language| !language.is_empty()),
            location: self.location.filter(|location| !location.is_null()),
        })
    }
}

/// Accepts RFC 3339 and the zone-less `YYYY-MM-DDTHH:MM:SS` form, read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(endpoint: String) -> NewsApiClient {
        NewsApiClient::new(&NewsApiConfig {
            api_key: "test-key".to_string(),
            endpoint,
            default_language: "eng".to_string(),
            articles_limit: 100,
        })
        .expect("client builds")
    }

    fn sample_results() -> serde_json::Value {
        json!({
            "articles": {
                "results": [
                    {
                        "title": "Acme opens plant",
                        "body": "Acme Corp opened a plant in Ohio because demand rose.",
                        "source": { "title": "Wire Service" },
                        "dateTime": "2025-03-14T09:30:00Z",
                        "author": "Jane Reporter",
                        "url": "https://news.example/acme",
                        "categories": [
                            { "label": "Business" },
                            { "label": "" },
                            { "uri": "dmoz/Unlabelled" }
                        ],
                        "entities": [{ "label": "Acme Corp" }],
                        "image": "https://img.example/acme.jpg",
                        "language": "eng",
                        "location": { "label": "Ohio" }
                    },
                    {
                        "title": "Quiet day",
                        "body": "",
                        "dateTime": "2025-03-14T08:00:00"
                    }
                ]
            }
        })
    }

    #[tokio::test]
    async fn maps_results_into_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/article/getArticles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_results()))
            .mount(&server)
            .await;

        let articles = client(format!("{}/api/v1/article/getArticles", server.uri()))
            .fetch_articles(&FetchQuery::new("eng", 2))
            .await
            .expect("articles fetched");

        assert_eq!(articles.len(), 2);
        let first = &articles[0];
        assert_eq!(first.article.source, "Wire Service");
        assert_eq!(first.article.categories, vec!["Business".to_string()]);
        assert_eq!(first.article.author.as_deref(), Some("Jane Reporter"));
        assert_eq!(
            first.article.published_at,
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single().expect("valid")
        );
        assert_eq!(first.entities.len(), 1);
        assert_eq!(first.image_url.as_deref(), Some("https://img.example/acme.jpg"));

        let second = &articles[1];
        assert_eq!(second.article.source, "");
        assert!(second.article.categories.is_empty());
        assert!(second.location.is_none());
    }

    #[tokio::test]
    async fn sends_filters_as_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apiKey", "test-key"))
            .and(query_param("articlesSortBy", "date"))
            .and(query_param("articlesCount", "25"))
            .and(query_param("articlesSortByAsc", "false"))
            .and(query_param("includeArticleEntities", "true"))
            .and(query_param("language", "eng,deu"))
            .and(query_param("q", "semiconductors"))
            .and(query_param("dateStart", "2025-03-01"))
            .and(query_param("dateEnd", "2025-03-14"))
            .and(query_param("categoryUri", "news/Business,news/Technology"))
            .and(query_param("sourceLocationUri", "http://en.wikipedia.org/wiki/Germany"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": { "results": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = FetchQuery {
            query: Some("semiconductors".to_string()),
            from_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            to_date: NaiveDate::from_ymd_opt(2025, 3, 14),
            languages: vec!["eng".to_string(), "deu".to_string()],
            categories: vec!["news/Business".to_string(), "news/Technology".to_string()],
            source_locations: vec!["http://en.wikipedia.org/wiki/Germany".to_string()],
            limit: 25,
        };

        let articles = client(server.uri())
            .fetch_articles(&query)
            .await
            .expect("empty page fetched");
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn non_ok_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = client(server.uri())
            .fetch_articles(&FetchQuery::new("eng", 10))
            .await
            .expect_err("unauthorised");

        match err {
            SourceError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", client("https://api.newsapi.ai/".to_string()));
        assert!(!rendered.contains("test-key"));
    }
}
