use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, NearbyQuery, NearbyResponse, RegisterVenueRequest, VenueAttributes};
use crate::routes::recommendations::{error_response, validation_error, AppState};

/// Configure venue routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/venues", web::post().to(register_venue))
        .route("/venues/nearby", web::get().to(venues_nearby))
        .route("/venues/{venue_id}", web::get().to(get_venue));
}

/// Register or update a venue
///
/// POST /api/v1/venues
async fn register_venue(
    state: web::Data<AppState>,
    req: web::Json<RegisterVenueRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let venue = VenueAttributes::from(req.into_inner());
    let venue_id = venue.venue_id.clone();

    match state.service.register_venue(venue).await {
        Ok(()) => {
            tracing::info!("Registered venue {}", venue_id);
            HttpResponse::Created().json(serde_json::json!({ "venueId": venue_id }))
        }
        Err(e) => error_response(&e),
    }
}

/// Fetch a single venue
///
/// GET /api/v1/venues/{venueId}
async fn get_venue(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let venue_id = path.into_inner();

    match state.service.store().get_venue(&venue_id).await {
        Ok(Some(venue)) => HttpResponse::Ok().json(venue),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("Venue {} not found", venue_id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch venue {}: {}", venue_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "storage_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Venues near a point
///
/// GET /api/v1/venues/nearby?lat=12.97&lng=77.59&radiusKm=5
///
/// A negative radius is rejected with 400.
async fn venues_nearby(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let radius_km = query
        .radius_km
        .unwrap_or(state.service.settings().default_radius_km);

    match state.service.venues_near(query.lat, query.lng, radius_km).await {
        Ok(venues) => {
            tracing::debug!(
                "{} venues within {}km of ({}, {})",
                venues.len(),
                radius_km,
                query.lat,
                query.lng
            );
            HttpResponse::Ok().json(NearbyResponse { radius_km, venues })
        }
        Err(e) => error_response(&e),
    }
}
