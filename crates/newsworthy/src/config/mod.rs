use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::providers::http::HttpProviderConfig;

const DEFAULT_NLP_ENDPOINT: &str = "http://127.0.0.1:8081";
const DEFAULT_NEWSAPI_ENDPOINT: &str = "https://api.newsapi.ai/api/v1/article/getArticles";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub providers: ProviderSettings,
    pub news: NewsApiConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let kind = NlpProviderKind::parse(&var_or("NLP_PROVIDER", "lexicon"))?;
        let http = HttpProviderConfig {
            base_url: var_or("NLP_ENDPOINT", DEFAULT_NLP_ENDPOINT),
            connect_timeout: seconds("NLP_CONNECT_TIMEOUT_SECS", 3)?,
            total_timeout: seconds("NLP_TIMEOUT_SECS", 30)?,
        };

        let articles_limit = var_or("ARTICLES_LIMIT", "100")
            .parse::<u32>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ConfigError::InvalidArticlesLimit)?;

        let news = NewsApiConfig {
            api_key: var_or("NEWSAPI_KEY", ""),
            endpoint: var_or("NEWSAPI_ENDPOINT", DEFAULT_NEWSAPI_ENDPOINT),
            default_language: var_or("DEFAULT_LANGUAGE", "eng"),
            articles_limit,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            providers: ProviderSettings { kind, http },
            news,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn seconds(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout { variable: name }),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which NLP backend serves the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlpProviderKind {
    /// In-process rule-based analysis.
    Lexicon,
    /// Remote inference sidecar.
    Http,
}

impl NlpProviderKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lexicon" | "local" => Ok(Self::Lexicon),
            "http" | "remote" => Ok(Self::Http),
            other => Err(ConfigError::UnknownProvider {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: NlpProviderKind,
    pub http: HttpProviderConfig,
}

/// Article source credentials and defaults.
#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub default_language: String,
    pub articles_limit: u32,
}

impl NewsApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownProvider { value: String },
    InvalidTimeout { variable: &'static str },
    InvalidArticlesLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownProvider { value } => {
                write!(f, "NLP_PROVIDER must be 'lexicon' or 'http', got '{value}'")
            }
            ConfigError::InvalidTimeout { variable } => {
                write!(f, "{variable} must be a whole number of seconds")
            }
            ConfigError::InvalidArticlesLimit => {
                write!(f, "ARTICLES_LIMIT must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::UnknownProvider { .. }
            | ConfigError::InvalidTimeout { .. }
            | ConfigError::InvalidArticlesLimit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "NLP_PROVIDER",
            "NLP_ENDPOINT",
            "NLP_CONNECT_TIMEOUT_SECS",
            "NLP_TIMEOUT_SECS",
            "NEWSAPI_KEY",
            "NEWSAPI_ENDPOINT",
            "DEFAULT_LANGUAGE",
            "ARTICLES_LIMIT",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.providers.kind, NlpProviderKind::Lexicon);
        assert_eq!(config.providers.http.base_url, DEFAULT_NLP_ENDPOINT);
        assert_eq!(config.providers.http.total_timeout, Duration::from_secs(30));
        assert_eq!(config.news.default_language, "eng");
        assert_eq!(config.news.articles_limit, 100);
        assert!(!config.news.is_configured());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_remote_provider_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NLP_PROVIDER", "HTTP");
        env::set_var("NLP_ENDPOINT", "http://inference:9000/v1");
        env::set_var("NLP_TIMEOUT_SECS", "5");
        env::set_var("NEWSAPI_KEY", "secret");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.providers.kind, NlpProviderKind::Http);
        assert_eq!(config.providers.http.base_url, "http://inference:9000/v1");
        assert_eq!(config.providers.http.total_timeout, Duration::from_secs(5));
        assert!(config.news.is_configured());
        reset_env();
    }

    #[test]
    fn rejects_unknown_provider_kind() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NLP_PROVIDER", "transformers");
        let err = AppConfig::load().expect_err("unknown provider rejected");
        assert!(matches!(err, ConfigError::UnknownProvider { ref value } if value == "transformers"));
        reset_env();
    }

    #[test]
    fn rejects_malformed_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NLP_CONNECT_TIMEOUT_SECS", "soon");
        let err = AppConfig::load().expect_err("timeout rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidTimeout {
                variable: "NLP_CONNECT_TIMEOUT_SECS"
            }
        ));

        reset_env();
        env::set_var("ARTICLES_LIMIT", "0");
        let err = AppConfig::load().expect_err("zero limit rejected");
        assert!(matches!(err, ConfigError::InvalidArticlesLimit));
        reset_env();
    }
}
