mod error;
mod extract;
mod fallback;
mod invoker;
mod pipeline;
mod prompt;
mod routes;
mod submission;
#[cfg(test)]
mod test_support;

use crate::extract::ExtractionStrategy;
use crate::invoker::{LlmClient, Provider};
use crate::submission::SubmissionGuard;
use axum::Router;
use env_logger::Env;
use log::{error, info};
use serde::Deserialize;
use std::fmt;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_redoc::Redoc;
use utoipa_redoc::Servable;

fn get_default_port() -> u16 {
    8080
}

fn get_default_request_timeout() -> u64 {
    60
}

fn get_default_max_concurrent() -> usize {
    5
}

#[derive(Deserialize)]
pub struct Config {
    #[serde(default = "get_default_port")]
    port: u16,
    #[serde(default)]
    llm_provider: Provider,
    llm_base_url: Option<String>,
    llm_api_key: String,
    llm_model: Option<String>,
    /// Seconds.
    #[serde(default = "get_default_request_timeout")]
    llm_request_timeout: u64,
    #[serde(default = "get_default_max_concurrent")]
    upstream_max_concurrent: usize,
    #[serde(default)]
    extraction_strategy: ExtractionStrategy,
}

impl Config {
    fn base_url(&self) -> &str {
        self.llm_base_url
            .as_deref()
            .unwrap_or(self.llm_provider.default_base_url())
    }

    fn model(&self) -> &str {
        self.llm_model
            .as_deref()
            .unwrap_or(self.llm_provider.default_model())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("llm_provider", &self.llm_provider)
            .field("llm_base_url", &self.base_url())
            .field("llm_api_key", &"<redacted>")
            .field("llm_model", &self.model())
            .field("llm_request_timeout", &self.llm_request_timeout)
            .field("upstream_max_concurrent", &self.upstream_max_concurrent)
            .field("extraction_strategy", &self.extraction_strategy)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    llm: Arc<LlmClient>,
    upstream_semaphore: Arc<Semaphore>,
    submissions: Arc<SubmissionGuard>,
}

impl AppState {
    fn new(config: Config) -> Result<Self, reqwest::Error> {
        let llm = LlmClient::new(
            config.llm_provider,
            config.base_url(),
            config.llm_api_key.clone(),
            config.model().to_string(),
            Duration::from_secs(config.llm_request_timeout),
        )?;
        Ok(AppState {
            llm: Arc::new(llm),
            upstream_semaphore: Arc::new(Semaphore::new(config.upstream_max_concurrent)),
            submissions: Arc::new(SubmissionGuard::default()),
            config: Arc::new(config),
        })
    }
}

#[derive(OpenApi)]
#[openapi(info(description = "API for AI-assisted health analysis"))]
struct ApiDoc;

fn app(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(routes::analyze_symptoms))
        .routes(routes!(routes::analyze_womens_health))
        .routes(routes!(routes::analyze_lab_report))
        .routes(routes!(routes::analyze_mental_wellness))
        .routes(routes!(routes::analyze_nutrition))
        .routes(routes!(routes::analyze_reproductive_health))
        .routes(routes!(routes::analyze_maternal_health))
        .routes(routes!(routes::analyze_youth_health))
        .split_for_parts();

    router
        .merge(Redoc::with_url("/redoc", api))
        .with_state(state)
}

async fn run() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = envy::from_env::<Config>()?;
    info!("{config:?}");

    let port = config.port;
    let state = AppState::new(config)?;

    info!("Starting on port {}", port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            exit(1)
        }
    };

    if let Err(err) = rt.block_on(run()) {
        error!("{}", err);
        exit(1)
    }
}
