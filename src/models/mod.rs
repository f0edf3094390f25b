// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Ambience, BudgetTier, InstaWorthiness, InteractionEvent, Lighting, Mood, NoiseLevel,
    PreferenceProfile, ScoredCandidate, SeatingStyle, VenueAttributes, WifiQuality,
};
pub use requests::{
    NearbyQuery, RecommendationsQuery, RecordInteractionRequest, RegisterVenueRequest,
    SaveVenueRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, NearbyResponse, RecommendationSource, RecommendationsResponse,
    RecordInteractionResponse, SavedVenuesResponse,
};
