use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::error::RecommendError;
use crate::models::{
    ErrorResponse, HealthResponse, InteractionEvent, PreferenceProfile, RecommendationsQuery,
    RecommendationsResponse, RecordInteractionRequest, RecordInteractionResponse, SaveVenueRequest,
    SavedVenuesResponse,
};
use crate::services::{RecommendationService, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

/// Configure user-facing recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/users/{user_id}/recommendations", web::get().to(get_recommendations))
        .route("/users/{user_id}/quiz", web::put().to(submit_quiz))
        .route("/users/{user_id}/saved-venues", web::post().to(save_venue))
        .route("/users/{user_id}/saved-venues", web::get().to(list_saved_venues))
        .route("/interactions", web::post().to(record_interaction));
}

pub(crate) fn error_response(err: &RecommendError) -> HttpResponse {
    match err {
        RecommendError::InvalidArgument(msg) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_argument".to_string(),
            message: msg.clone(),
            status_code: 400,
        }),
        RecommendError::NotReady => HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "not_ready".to_string(),
            message: err.to_string(),
            status_code: 503,
        }),
        RecommendError::Storage(StoreError::NotFound(msg)) => {
            HttpResponse::NotFound().json(ErrorResponse {
                error: "not_found".to_string(),
                message: msg.clone(),
                status_code: 404,
            })
        }
        RecommendError::Storage(e) => {
            tracing::error!("Storage failure: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "storage_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.service.store().health_check().await.unwrap_or(false);
    let status = if store_healthy { "healthy" } else { "degraded" };
    let selector = state.service.selector();

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: selector.mode().to_string(),
        engine_warm: selector.is_warm(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommendations endpoint
///
/// GET /api/v1/users/{userId}/recommendations?count=10
///
/// Always answers with a list; an unknown user or a user without a quiz
/// response gets an empty one.
async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RecommendationsQuery>,
) -> impl Responder {
    let user_id = path.into_inner();
    let settings = state.service.settings();
    let count = query
        .count
        .map(usize::from)
        .unwrap_or(settings.default_count)
        .min(settings.max_count);

    tracing::info!("Recommending for user: {}, count: {}", user_id, count);

    let result = state.service.recommend_detailed(&user_id, count).await;

    let venues = match state.service.resolve_venues(&result.venue_ids).await {
        Ok(venues) => venues,
        Err(e) => {
            tracing::error!("Failed to resolve recommended venues for {}: {}", user_id, e);
            Vec::new()
        }
    };

    tracing::info!(
        "Returning {} venues for user {} ({:?})",
        venues.len(),
        user_id,
        result.source
    );

    HttpResponse::Ok().json(RecommendationsResponse {
        user_id,
        source: result.source,
        venues,
    })
}

/// Quiz submission endpoint
///
/// PUT /api/v1/users/{userId}/quiz
///
/// Request body:
/// ```json
/// {
///   "budget": "₹₹",
///   "desiredAmbiences": ["Cozy"],
///   "mood": "study|work|date|hangout",
///   "wantsPetFriendly": false
/// }
/// ```
async fn submit_quiz(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PreferenceProfile>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.service.submit_quiz(&user_id, req.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Record interaction endpoint
///
/// POST /api/v1/interactions
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "venueId": "string",
///   "kind": "view"
/// }
/// ```
async fn record_interaction(
    state: web::Data<AppState>,
    req: web::Json<RecordInteractionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    let event = InteractionEvent::new(req.user_id, req.venue_id, req.kind);
    let event_id = event.id.to_string();

    state.service.ingest_interaction(event).await;

    HttpResponse::Accepted().json(RecordInteractionResponse {
        accepted: true,
        event_id,
    })
}

/// Save venue endpoint
///
/// POST /api/v1/users/{userId}/saved-venues
async fn save_venue(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SaveVenueRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let user_id = path.into_inner();
    match state.service.save_venue(&user_id, &req.venue_id).await {
        Ok(true) => HttpResponse::Created().finish(),
        Ok(false) => HttpResponse::Ok().finish(),
        Err(e) => error_response(&e),
    }
}

/// List saved venues endpoint
///
/// GET /api/v1/users/{userId}/saved-venues
async fn list_saved_venues(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.service.list_saved_venues(&user_id).await {
        Ok(venue_ids) => HttpResponse::Ok().json(SavedVenuesResponse {
            user_id,
            count: venue_ids.len(),
            venue_ids,
        }),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationSource;

    #[test]
    fn test_invalid_argument_maps_to_bad_request() {
        let response = error_response(&RecommendError::InvalidArgument("radius".into()));
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = RecommendError::Storage(StoreError::NotFound("Venue v9".into()));
        assert_eq!(error_response(&err).status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_recommendation_source_serializes_lowercase() {
        let json = serde_json::to_string(&RecommendationSource::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
    }
}
