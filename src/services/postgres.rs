use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::models::{InteractionEvent, PreferenceProfile, VenueAttributes};
use crate::services::store::{StoreError, VenueStore};

/// PostgreSQL-backed venue and user store
///
/// Venue tags and quiz responses are kept as JSONB so the schema does not
/// have to track every categorical field.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Decode a JSONB document into a typed record
///
/// Rows written by an older schema (renamed enum variants, missing fields)
/// surface as `StoreError::Serialization` instead of aborting the process.
fn decode_document<T: DeserializeOwned>(
    key: &str,
    document: serde_json::Value,
) -> Result<T, StoreError> {
    serde_json::from_value(document).map_err(|e| {
        tracing::warn!("Undecodable stored document {}: {}", key, e);
        StoreError::Serialization(e)
    })
}

#[async_trait]
impl VenueStore for PostgresStore {
    async fn list_all_venues(&self) -> Result<Vec<VenueAttributes>, StoreError> {
        let query = r#"
            SELECT venue_id, attributes
            FROM venues
            ORDER BY created_at, venue_id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let venues = rows
            .iter()
            .map(|row| {
                let venue_id: String = row.try_get("venue_id")?;
                let document: Json<serde_json::Value> = row.try_get("attributes")?;
                decode_document(&venue_id, document.0)
            })
            .collect::<Result<Vec<VenueAttributes>, StoreError>>()?;

        tracing::debug!("Loaded {} venues", venues.len());

        Ok(venues)
    }

    async fn get_venue(&self, venue_id: &str) -> Result<Option<VenueAttributes>, StoreError> {
        let query = r#"
            SELECT attributes
            FROM venues
            WHERE venue_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(venue_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let document: Json<serde_json::Value> = row.try_get("attributes")?;
                decode_document(venue_id, document.0).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Uses INSERT ... ON CONFLICT so re-registration updates in place
    async fn upsert_venue(&self, venue: &VenueAttributes) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO venues (venue_id, latitude, longitude, attributes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (venue_id)
            DO UPDATE SET
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                attributes = EXCLUDED.attributes,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(&venue.venue_id)
            .bind(venue.latitude)
            .bind(venue.longitude)
            .bind(Json(venue))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Upserted venue {}", venue.venue_id);

        Ok(())
    }

    async fn get_user_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<PreferenceProfile>, StoreError> {
        let query = r#"
            SELECT quiz_responses
            FROM users
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let document = match row {
            Some(row) => row.try_get::<Option<Json<serde_json::Value>>, _>("quiz_responses")?,
            None => None,
        };

        document
            .map(|document| decode_document(user_id, document.0))
            .transpose()
    }

    async fn save_user_profile(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO users (user_id, quiz_responses, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                quiz_responses = EXCLUDED.quiz_responses,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn append_interaction(&self, event: &InteractionEvent) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO interactions (id, user_id, venue_id, kind, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(query)
            .bind(event.id)
            .bind(&event.user_id)
            .bind(&event.venue_id)
            .bind(&event.kind)
            .bind(event.occurred_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded interaction: {} -> {} ({})",
            event.user_id,
            event.venue_id,
            event.kind
        );

        Ok(())
    }

    async fn save_venue(&self, user_id: &str, venue_id: &str) -> Result<bool, StoreError> {
        if self.get_venue(venue_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Venue {}", venue_id)));
        }

        let query = r#"
            INSERT INTO saved_venues (user_id, venue_id, saved_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, venue_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(venue_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_saved_venues(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let query = r#"
            SELECT venue_id
            FROM saved_venues
            WHERE user_id = $1
            ORDER BY saved_at
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let venue_ids = rows
            .iter()
            .map(|row| row.try_get("venue_id"))
            .collect::<Result<Vec<String>, sqlx::Error>>()?;

        Ok(venue_ids)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
