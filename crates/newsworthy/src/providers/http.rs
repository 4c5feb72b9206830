use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{
    DocumentAnalysis, DocumentAnalyzer, ProviderError, SentimentClassifier, SentimentResult,
    ZeroShotClassifier, ZeroShotResult,
};

/// Connection settings for the inference sidecar.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpProviderConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    text: &'a str,
    candidate_labels: &'a [String],
}

/// Provider adapter that delegates every capability to a remote inference service.
///
/// Endpoints: `POST analyze`, `POST sentiment`, `POST zero-shot`, relative to `base_url`.
#[derive(Debug, Clone)]
pub struct HttpNlpProvider {
    client: Client,
    base_url: Url,
}

impl HttpNlpProvider {
    pub fn new(config: &HttpProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .map_err(ProviderError::Transport)?;

        let mut base_url = Url::parse(&config.base_url).map_err(|err| {
            ProviderError::Unavailable(format!("invalid endpoint '{}': {err}", config.base_url))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|err| ProviderError::Unavailable(format!("invalid endpoint: {err}")))?;

        debug!(%url, "calling inference provider");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

#[async_trait]
impl DocumentAnalyzer for HttpNlpProvider {
    async fn analyze(&self, text: &str) -> Result<DocumentAnalysis, ProviderError> {
        self.post("analyze", &TextRequest { text }).await
    }
}

#[async_trait]
impl SentimentClassifier for HttpNlpProvider {
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentResult, ProviderError> {
        let predictions: Vec<SentimentResult> =
            self.post("sentiment", &TextRequest { text }).await?;
        predictions.into_iter().next().ok_or(ProviderError::EmptyScores)
    }
}

#[async_trait]
impl ZeroShotClassifier for HttpNlpProvider {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ProviderError> {
        let result: ZeroShotResult = self
            .post(
                "zero-shot",
                &ZeroShotRequest {
                    text,
                    candidate_labels,
                },
            )
            .await?;

        if !result.is_aligned() {
            return Err(ProviderError::Decode(format!(
                "{} labels but {} scores",
                result.labels.len(),
                result.scores.len()
            )));
        }
        Ok(result)
    }
}
