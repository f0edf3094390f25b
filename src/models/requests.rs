use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{
    Ambience, BudgetTier, InstaWorthiness, Lighting, NoiseLevel, SeatingStyle, VenueAttributes,
    WifiQuality,
};

/// Query string for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsQuery {
    pub count: Option<u16>,
}

/// Request to record an interaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordInteractionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "venue_id", rename = "venueId")]
    pub venue_id: String,
    #[validate(length(min = 1, max = 64))]
    pub kind: String,
}

/// Request to bookmark a venue for a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveVenueRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "venue_id", rename = "venueId")]
    pub venue_id: String,
}

/// Query string for the proximity search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[serde(alias = "radius_km", rename = "radiusKm")]
    pub radius_km: Option<f64>,
}

/// Request to register or update a venue
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterVenueRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "venueId")]
    pub venue_id: String,
    #[serde(default)]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(rename = "budgetTier")]
    pub budget_tier: BudgetTier,
    pub ambience: Ambience,
    #[serde(rename = "noiseLevel")]
    pub noise_level: NoiseLevel,
    pub lighting: Lighting,
    #[serde(rename = "seatingStyle")]
    pub seating_style: SeatingStyle,
    #[serde(rename = "workFriendly", default)]
    pub work_friendly: bool,
    #[serde(rename = "wifiQuality")]
    pub wifi_quality: WifiQuality,
    #[serde(rename = "petFriendly", default)]
    pub pet_friendly: bool,
    #[serde(rename = "instaWorthiness")]
    pub insta_worthiness: InstaWorthiness,
    #[serde(rename = "plugAvailable", default)]
    pub plug_available: bool,
}

impl From<RegisterVenueRequest> for VenueAttributes {
    fn from(req: RegisterVenueRequest) -> Self {
        Self {
            venue_id: req.venue_id,
            name: req.name,
            latitude: req.latitude,
            longitude: req.longitude,
            budget_tier: req.budget_tier,
            ambience: req.ambience,
            noise_level: req.noise_level,
            lighting: req.lighting,
            seating_style: req.seating_style,
            work_friendly: req.work_friendly,
            wifi_quality: req.wifi_quality,
            pet_friendly: req.pet_friendly,
            insta_worthiness: req.insta_worthiness,
            plug_available: req.plug_available,
        }
    }
}
