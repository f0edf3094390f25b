use serde::{Deserialize, Serialize};

use crate::models::domain::VenueAttributes;

/// Which path produced a recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Personalized,
    Fallback,
    /// No personalized opinion and no stored quiz response
    None,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub source: RecommendationSource,
    pub venues: Vec<VenueAttributes>,
}

/// Response for the proximity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    pub venues: Vec<VenueAttributes>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: String,
    #[serde(rename = "engineWarm")]
    pub engine_warm: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record interaction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInteractionResponse {
    pub accepted: bool,
    #[serde(rename = "eventId")]
    pub event_id: String,
}

/// Saved venues for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedVenuesResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "venueIds")]
    pub venue_ids: Vec<String>,
    pub count: usize,
}
