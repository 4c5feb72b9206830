//! HTTP surface of the evaluator: single-article scoring and fetch-then-score batches.

mod router;
mod service;

pub use router::evaluation_router;
pub use service::{EvaluatedArticle, EvaluationService, FetchReport, FetchRequest, ServiceError};
