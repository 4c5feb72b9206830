use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use super::service::{EvaluationService, FetchReport, FetchRequest, ServiceError};
use crate::error::AppError;
use crate::evaluation::{Article, ArticleEvaluation};

pub fn evaluation_router(service: Arc<EvaluationService>) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/fetch-and-evaluate", post(fetch_and_evaluate_handler))
        .with_state(service)
}

pub(crate) async fn evaluate_handler(
    State(service): State<Arc<EvaluationService>>,
    Json(article): Json<Article>,
) -> Result<Json<ArticleEvaluation>, AppError> {
    let evaluation = service.evaluate(&article).await?;
    Ok(Json(evaluation))
}

pub(crate) async fn fetch_and_evaluate_handler(
    State(service): State<Arc<EvaluationService>>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<FetchReport>, AppError> {
    let report = service.fetch_and_evaluate(request, false).await?;
    Ok(Json(report))
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::SourceUnavailable => AppError::SourceUnavailable,
            ServiceError::Source(err) => AppError::Source(err),
            ServiceError::Evaluation(err) => AppError::Evaluation(err),
        }
    }
}
