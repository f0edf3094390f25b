use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{InteractionEvent, PreferenceProfile, VenueAttributes};

/// Errors that can occur in a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Persistence for venues, users, interactions and saved venues
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Every known venue, in registration order
    async fn list_all_venues(&self) -> Result<Vec<VenueAttributes>, StoreError>;

    async fn get_venue(&self, venue_id: &str) -> Result<Option<VenueAttributes>, StoreError>;

    /// Insert a venue or replace an existing one with the same id
    async fn upsert_venue(&self, venue: &VenueAttributes) -> Result<(), StoreError>;

    async fn get_user_profile(&self, user_id: &str)
        -> Result<Option<PreferenceProfile>, StoreError>;

    /// Replace the user's quiz response wholesale, creating the user if needed
    async fn save_user_profile(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
    ) -> Result<(), StoreError>;

    async fn append_interaction(&self, event: &InteractionEvent) -> Result<(), StoreError>;

    /// Bookmark a venue; returns false if it was already saved
    async fn save_venue(&self, user_id: &str, venue_id: &str) -> Result<bool, StoreError>;

    async fn list_saved_venues(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[derive(Debug, Default)]
struct MemoryTables {
    venue_order: Vec<String>,
    venues: HashMap<String, VenueAttributes>,
    profiles: HashMap<String, PreferenceProfile>,
    interactions: Vec<InteractionEvent>,
    saved: HashMap<String, Vec<String>>,
}

/// Process-local store used in development and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<MemoryTables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with venues
    pub fn with_venues(venues: impl IntoIterator<Item = VenueAttributes>) -> Self {
        let mut tables = MemoryTables::default();
        for venue in venues {
            if !tables.venues.contains_key(&venue.venue_id) {
                tables.venue_order.push(venue.venue_id.clone());
            }
            tables.venues.insert(venue.venue_id.clone(), venue);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub async fn interaction_count(&self) -> usize {
        self.tables.read().await.interactions.len()
    }
}

#[async_trait]
impl VenueStore for InMemoryStore {
    async fn list_all_venues(&self) -> Result<Vec<VenueAttributes>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .venue_order
            .iter()
            .filter_map(|id| tables.venues.get(id).cloned())
            .collect())
    }

    async fn get_venue(&self, venue_id: &str) -> Result<Option<VenueAttributes>, StoreError> {
        Ok(self.tables.read().await.venues.get(venue_id).cloned())
    }

    async fn upsert_venue(&self, venue: &VenueAttributes) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.venues.contains_key(&venue.venue_id) {
            tables.venue_order.push(venue.venue_id.clone());
        }
        tables.venues.insert(venue.venue_id.clone(), venue.clone());
        Ok(())
    }

    async fn get_user_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<PreferenceProfile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(user_id).cloned())
    }

    async fn save_user_profile(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
    ) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .profiles
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn append_interaction(&self, event: &InteractionEvent) -> Result<(), StoreError> {
        self.tables.write().await.interactions.push(event.clone());
        Ok(())
    }

    async fn save_venue(&self, user_id: &str, venue_id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.venues.contains_key(venue_id) {
            return Err(StoreError::NotFound(format!("Venue {}", venue_id)));
        }

        let saved = tables.saved.entry(user_id.to_string()).or_default();
        if saved.iter().any(|id| id == venue_id) {
            return Ok(false);
        }
        saved.push(venue_id.to_string());
        Ok(true)
    }

    async fn list_saved_venues(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .saved
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
