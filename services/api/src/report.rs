use crate::infra::build_service;
use chrono::{TimeZone, Utc};
use clap::Args;
use newsworthy::api::{FetchReport, FetchRequest};
use newsworthy::config::AppConfig;
use newsworthy::error::AppError;
use newsworthy::evaluation::{Article, ArticleEvaluation};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Article JSON file to evaluate. Defaults to a built-in sample article.
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Print the raw evaluation JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FetchArgs {
    /// Free-text query forwarded to the news source
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Maximum number of articles to fetch (defaults to ARTICLES_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<u32>,
    /// Language filter, repeatable (defaults to DEFAULT_LANGUAGE)
    #[arg(long)]
    pub(crate) language: Vec<String>,
    /// Show every evaluated article, not only the worthy ones
    #[arg(long)]
    pub(crate) all: bool,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;

    let article = match args.file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<Article>(&raw)?
        }
        None => sample_article(),
    };

    let evaluation = service.evaluate(&article).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print!("{}", render_evaluation(&article, &evaluation));
    }
    Ok(())
}

pub(crate) async fn run_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;

    let languages = if args.language.is_empty() {
        vec![config.news.default_language.clone()]
    } else {
        args.language
    };
    let request = FetchRequest {
        query: args.query,
        languages,
        limit: args.limit,
        ..FetchRequest::default()
    };

    let report = service.fetch_and_evaluate(request, args.all).await?;
    print!("{}", render_fetch_report(&report));
    Ok(())
}

pub(crate) fn render_evaluation(article: &Article, evaluation: &ArticleEvaluation) -> String {
    let metrics = &evaluation.metrics;
    let verdict = if evaluation.is_worthy {
        "worthy"
    } else {
        "not worthy"
    };

    let mut out = format!(
        "{} ({})\n- evaluation {}\n- overall {:.3} | confidence {:.3} | {}\n",
        article.title,
        article.source,
        evaluation.evaluation_id,
        evaluation.overall_score,
        evaluation.confidence_score,
        verdict
    );
    out.push_str("Metrics:\n");
    out.push_str(&format!(
        "  - named entities: {}\n",
        metrics.named_entities_count
    ));
    for (name, value) in [
        ("fact density", metrics.fact_density_score),
        ("novelty", metrics.novelty_score),
        ("analytical depth", metrics.analytical_depth_score),
        ("readability", metrics.readability_score),
        ("topic relevance", metrics.topic_relevance_score),
        ("sentiment", metrics.sentiment_score),
    ] {
        out.push_str(&format!("  - {name}: {value:.3}\n"));
    }
    if !evaluation.reasons.is_empty() {
        out.push_str("Reasons:\n");
        for reason in &evaluation.reasons {
            out.push_str(&format!("  - {reason}\n"));
        }
    }
    out
}

pub(crate) fn render_fetch_report(report: &FetchReport) -> String {
    let mut out = format!(
        "Fetched {} articles, {} worthy\n",
        report.total_articles, report.worthy_articles
    );
    for result in &report.results {
        let article = &result.article.article;
        out.push_str(&format!(
            "- [{:.2}] {} | {} | {}\n    {}\n",
            result.evaluation.overall_score,
            article.title,
            article.source,
            article.url,
            result.evaluation.summary()
        ));
    }
    out
}

pub(crate) fn sample_article() -> Article {
    Article {
        title: "Chipmaker commits to new Ohio fab as export rules tighten".to_string(),
        content: "Intel announced on Tuesday a new semiconductor plant outside Columbus, Ohio. \
            The company said the investment was driven by record demand for AI accelerators, \
            because supply from Asian foundries remains constrained. However, analysts at \
            Morgan Stanley cautioned that construction costs rose 18 percent last year. \
            Moreover, the Commerce Department is expected to finalise new export rules in March, \
            therefore the timeline for the first wafers could slip into 2027."
            .to_string(),
        source: "Example Wire".to_string(),
        published_at: Utc
            .with_ymd_and_hms(2025, 3, 11, 14, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
        author: Some("Business Desk".to_string()),
        url: "https://news.example/chipmaker-ohio-fab".to_string(),
        categories: vec!["technology".to_string(), "economy".to_string()],
    }
}
