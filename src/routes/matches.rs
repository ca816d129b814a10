use crate::core::{BatchCoordinator, MatchError, Matcher};
use crate::models::{
    BulkMatchItem, BulkMatchResponse, ErrorResponse, HealthResponse, ItemError, MatchRequest,
    MatchResponse,
};
use crate::services::EsClient;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<Matcher>,
    pub coordinator: Arc<BatchCoordinator>,
    pub index: Arc<EsClient>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match", web::post().to(match_one))
        .route("/match/bulk", web::post().to(match_bulk));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let index_healthy = state.index.ping().await;
    let status = if index_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Single match endpoint
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// {
///   "name": "Acme Corp",
///   "website": "https://acme.com",
///   "phone": "+1 234 567 8901",
///   "facebook": "facebook.com/acmecorp"
/// }
/// ```
async fn match_one(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_request".to_string(),
            message: "At least one of name, website, phone, or facebook must be provided"
                .to_string(),
            status_code: 400,
        });
    }

    let request_id = uuid::Uuid::new_v4();
    tracing::info!("Resolving match request {}", request_id);

    match state.matcher.resolve(&req).await {
        Ok(result) if result.is_match() => {
            tracing::info!(
                "Request {} matched candidate {:?} (confidence {:.2})",
                request_id,
                result.candidate_id,
                result.confidence
            );
            HttpResponse::Ok().json(MatchResponse {
                status: "success".to_string(),
                result,
            })
        }
        Ok(_) => {
            tracing::info!("Request {} found no matching profile", request_id);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "not_found".to_string(),
                message: "No matching company profile found".to_string(),
                status_code: 404,
            })
        }
        Err(e) => {
            tracing::error!("Request {} failed: {}", request_id, e);
            error_to_response(&e)
        }
    }
}

/// Bulk match endpoint
///
/// POST /api/v1/match/bulk
///
/// Takes a JSON array of match requests and returns one result per
/// input, in input order. Failed items carry an error marker instead
/// of aborting the batch.
async fn match_bulk(
    state: web::Data<AppState>,
    req: web::Json<Vec<MatchRequest>>,
) -> impl Responder {
    let inputs = req.into_inner();
    let total_count = inputs.len();

    tracing::info!("Resolving bulk match of {} requests", total_count);

    let outcomes = state.coordinator.resolve_batch(inputs.clone()).await;

    let results: Vec<BulkMatchItem> = inputs
        .into_iter()
        .zip(outcomes)
        .map(|(input, outcome)| match outcome {
            Ok(result) => BulkMatchItem {
                input,
                result: Some(result),
                error: None,
            },
            Err(e) => BulkMatchItem {
                input,
                result: None,
                error: Some(ItemError {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                }),
            },
        })
        .collect();

    let match_count = results
        .iter()
        .filter(|item| item.result.as_ref().is_some_and(|r| r.is_match()))
        .count();

    tracing::info!("Bulk match complete: {}/{} matched", match_count, total_count);

    HttpResponse::Ok().json(BulkMatchResponse {
        status: "success".to_string(),
        match_count,
        total_count,
        results,
    })
}

fn error_to_response(error: &MatchError) -> HttpResponse {
    match error {
        MatchError::InvalidInput => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message: error.to_string(),
            status_code: 400,
        }),
        MatchError::Index(_) => HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "index_unavailable".to_string(),
            message: error.to_string(),
            status_code: 503,
        }),
        MatchError::Timeout | MatchError::Internal(_) => {
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal_error".to_string(),
                message: error.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(MatchError::InvalidInput.kind(), "invalid_input");
        assert_eq!(MatchError::Timeout.kind(), "timeout");
    }
}
