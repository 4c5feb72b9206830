use metrics_exporter_prometheus::PrometheusHandle;
use newsworthy::api::EvaluationService;
use newsworthy::config::{AppConfig, NlpProviderKind, ProviderSettings};
use newsworthy::error::AppError;
use newsworthy::evaluation::{ArticleEvaluator, ScoringConfig};
use newsworthy::providers::http::HttpNlpProvider;
use newsworthy::providers::lexicon::LexiconProvider;
use newsworthy::providers::NlpProviders;
use newsworthy::sources::NewsApiClient;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_providers(settings: &ProviderSettings) -> Result<NlpProviders, AppError> {
    let providers = match settings.kind {
        NlpProviderKind::Lexicon => NlpProviders::from_shared(Arc::new(LexiconProvider::new())),
        NlpProviderKind::Http => {
            let provider = HttpNlpProvider::new(&settings.http)?;
            NlpProviders::from_shared(Arc::new(provider))
        }
    };
    info!(kind = ?settings.kind, "nlp providers ready");
    Ok(providers)
}

/// Evaluator plus, when an API key is present, the news source.
pub(crate) fn build_service(config: &AppConfig) -> Result<EvaluationService, AppError> {
    let providers = build_providers(&config.providers)?;
    let evaluator = ArticleEvaluator::new(providers, ScoringConfig::default());
    let service = EvaluationService::new(evaluator);

    if !config.news.is_configured() {
        info!("NEWSAPI_KEY not set; fetch-and-evaluate disabled");
        return Ok(service);
    }

    let client = NewsApiClient::new(&config.news)?;
    Ok(service.with_source(Arc::new(client), config.news.articles_limit))
}
