//! Cafe Recs - venue recommendations from quiz responses
//!
//! This library provides the recommendation core: a geo proximity filter,
//! a deterministic rule-table scorer, and a pluggable engine chosen once
//! per process that may replace the rule table with personalized results.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{haversine_distance, rank, select_near, EngineSelector, RecommendationEngine};
pub use error::{RecommendError, RecommendResult};
pub use models::{InteractionEvent, PreferenceProfile, VenueAttributes};
pub use services::{RecommendationService, VenueStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let distance = haversine_distance(12.9716, 77.5946, 12.9716, 77.5946);
        assert_eq!(distance, 0.0);
        assert!(select_near(&[], 12.9716, 77.5946, 5.0).unwrap().is_empty());
    }
}
