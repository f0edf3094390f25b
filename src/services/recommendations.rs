use std::sync::Arc;

use crate::config::RecommendationSettings;
use crate::core::{distance::select_near, EngineSelector};
use crate::error::{RecommendError, RecommendResult};
use crate::models::{InteractionEvent, PreferenceProfile, RecommendationSource, VenueAttributes};
use crate::services::store::{StoreError, VenueStore};

/// Ranked ids and the path that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendations {
    pub venue_ids: Vec<String>,
    pub source: RecommendationSource,
}

/// Entry point used by the request handlers
///
/// Asks the active engine first and falls back to the rule table over
/// the full venue set. Only invalid arguments are reported as errors;
/// everything else degrades to an empty list.
pub struct RecommendationService {
    store: Arc<dyn VenueStore>,
    selector: Arc<EngineSelector>,
    settings: RecommendationSettings,
}

impl RecommendationService {
    pub fn new(
        store: Arc<dyn VenueStore>,
        selector: Arc<EngineSelector>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            store,
            selector,
            settings,
        }
    }

    pub fn store(&self) -> &dyn VenueStore {
        self.store.as_ref()
    }

    pub fn selector(&self) -> &EngineSelector {
        self.selector.as_ref()
    }

    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Recommended venue ids for a user
    pub async fn get_recommendations(&self, user_id: &str, count: usize) -> Vec<String> {
        self.recommend_detailed(user_id, count).await.venue_ids
    }

    pub async fn recommend_detailed(&self, user_id: &str, count: usize) -> Recommendations {
        if count == 0 {
            return Recommendations {
                venue_ids: Vec::new(),
                source: RecommendationSource::None,
            };
        }

        if let Some(engine) = self.selector.active() {
            match engine.recommend(user_id, count).await {
                Ok(ids) if !ids.is_empty() => {
                    tracing::debug!("{} personalized ids for {}", ids.len(), user_id);
                    return Recommendations {
                        venue_ids: ids,
                        source: RecommendationSource::Personalized,
                    };
                }
                Ok(_) => tracing::debug!("No personalized opinion for {}", user_id),
                Err(e) => tracing::warn!("Personalized query failed for {}: {}", user_id, e),
            }
        }

        let profile = match self.store.get_user_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!("No quiz response stored for {}", user_id);
                return Recommendations {
                    venue_ids: Vec::new(),
                    source: RecommendationSource::None,
                };
            }
            Err(e) => {
                tracing::error!("Failed to load profile for {}: {}", user_id, e);
                return Recommendations {
                    venue_ids: Vec::new(),
                    source: RecommendationSource::None,
                };
            }
        };

        let venues = match self.store.list_all_venues().await {
            Ok(venues) => venues,
            Err(e) => {
                tracing::error!("Failed to list venues for fallback ranking: {}", e);
                Vec::new()
            }
        };

        let venue_ids = self
            .selector
            .engine()
            .fallback_recommend(&profile, &venues, count);

        tracing::debug!(
            "Fallback ranked {} of {} venues for {}",
            venue_ids.len(),
            venues.len(),
            user_id
        );

        Recommendations {
            venue_ids,
            source: RecommendationSource::Fallback,
        }
    }

    /// Persist an interaction and hand it to the engine; never fails
    pub async fn ingest_interaction(&self, event: InteractionEvent) {
        if let Err(e) = self.store.append_interaction(&event).await {
            tracing::warn!(
                "Failed to persist interaction {} -> {}: {}",
                event.user_id,
                event.venue_id,
                e
            );
        }

        self.selector.engine().record_interaction(&event).await;
    }

    /// Store a quiz response, replacing any previous one
    pub async fn submit_quiz(
        &self,
        user_id: &str,
        profile: PreferenceProfile,
    ) -> RecommendResult<()> {
        if user_id.trim().is_empty() {
            return Err(RecommendError::InvalidArgument("user id must not be empty".into()));
        }

        self.store.save_user_profile(user_id, &profile).await?;
        self.selector
            .engine()
            .register_user(user_id, Some(&profile))
            .await;

        tracing::info!("Stored quiz response for {} (mood: {:?})", user_id, profile.mood);
        Ok(())
    }

    pub async fn register_venue(&self, venue: VenueAttributes) -> RecommendResult<()> {
        if venue.venue_id.trim().is_empty() {
            return Err(RecommendError::InvalidArgument("venue id must not be empty".into()));
        }

        self.store.upsert_venue(&venue).await?;
        self.selector.engine().register_venue(&venue).await;
        Ok(())
    }

    /// Bookmark a venue and record it as a "save" interaction
    pub async fn save_venue(&self, user_id: &str, venue_id: &str) -> RecommendResult<bool> {
        let newly_saved = self.store.save_venue(user_id, venue_id).await?;
        if newly_saved {
            self.ingest_interaction(InteractionEvent::new(user_id, venue_id, "save"))
                .await;
        }
        Ok(newly_saved)
    }

    pub async fn list_saved_venues(&self, user_id: &str) -> RecommendResult<Vec<String>> {
        Ok(self.store.list_saved_venues(user_id).await?)
    }

    /// Venues within `radius_km` of a point, in registration order
    pub async fn venues_near(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> RecommendResult<Vec<VenueAttributes>> {
        let venues = self.store.list_all_venues().await?;
        select_near(&venues, lat, lng, radius_km)
    }

    /// Resolve ids to venue records, skipping ids that no longer exist
    pub async fn resolve_venues(&self, venue_ids: &[String]) -> Result<Vec<VenueAttributes>, StoreError> {
        let mut venues = Vec::with_capacity(venue_ids.len());
        for id in venue_ids {
            match self.store.get_venue(id).await? {
                Some(venue) => venues.push(venue),
                None => tracing::debug!("Recommended venue {} no longer exists", id),
            }
        }
        Ok(venues)
    }
}
