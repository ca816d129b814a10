mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::{BatchCoordinator, Matcher, MatcherConfig, RetryPolicy};
use crate::models::ScoringWeights;
use crate::routes::matches::AppState;
use crate::services::EsClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting company profile matching service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the profile index client
    let request_timeout = Duration::from_secs(settings.elasticsearch.request_timeout_secs.unwrap_or(30));
    let index = Arc::new(
        EsClient::new(
            settings.elasticsearch.url.clone(),
            settings.elasticsearch.index.clone(),
            settings.elasticsearch.username.clone(),
            settings.elasticsearch.password.clone(),
            request_timeout,
        )
        .unwrap_or_else(|e| {
            error!("Failed to initialize index client: {}", e);
            panic!("Index client error: {}", e);
        }),
    );

    if index.ping().await {
        info!("Profile index reachable at {}", settings.elasticsearch.url);
    } else {
        error!(
            "Profile index at {} is not reachable; matching will fail until it is",
            settings.elasticsearch.url
        );
    }

    // Initialize matcher with configured weights
    let weights = ScoringWeights {
        domain: settings.scoring.weights.domain,
        phone: settings.scoring.weights.phone,
        facebook: settings.scoring.weights.facebook,
        name_max: settings.scoring.weights.name_max,
    };

    let matcher_config = MatcherConfig {
        weights,
        name_distance_threshold: settings.scoring.name_distance_threshold,
        candidate_limit: settings.matching.candidate_limit,
        name_fuzzy_max_edits: settings.matching.name_fuzzy_max_edits,
        retry: RetryPolicy {
            max_attempts: settings.matching.max_retries,
            backoff: Duration::from_millis(settings.matching.retry_backoff_ms),
        },
    };

    let matcher = Arc::new(Matcher::new(index.clone(), matcher_config));

    info!("Matcher initialized with weights: {:?}", weights);

    // Initialize batch coordinator
    let coordinator = Arc::new(BatchCoordinator::new(
        matcher.clone(),
        settings.batch.concurrency,
        Duration::from_secs(settings.batch.timeout_secs),
    ));

    info!(
        "Batch coordinator initialized (concurrency: {}, timeout: {}s)",
        settings.batch.concurrency, settings.batch.timeout_secs
    );

    // Build application state
    let app_state = AppState {
        matcher,
        coordinator,
        index,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
