use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{OnceCell, RwLock};

use crate::core::ranking;
use crate::error::{RecommendError, RecommendResult};
use crate::models::{InteractionEvent, PreferenceProfile, VenueAttributes};

/// Lifecycle of an engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => EngineState::Initializing,
            2 => EngineState::Ready,
            _ => EngineState::Uninitialized,
        }
    }
}

/// Atomic holder for [`EngineState`]
#[derive(Debug, Default)]
struct StateCell(AtomicU8);

impl StateCell {
    fn get(&self) -> EngineState {
        EngineState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: EngineState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Pluggable recommendation engine
///
/// Stateful engines reject calls made before they reach `Ready`:
/// `recommend` returns `NotReady` and ingestion calls are dropped with a
/// warning. [`RuleBasedEngine`] holds no state to guard and answers empty
/// in every state.
/// Ingestion never reports failure to the caller. An empty `recommend`
/// result means the engine has no opinion for that user.
#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn state(&self) -> EngineState;

    /// One-time setup; repeated calls are no-ops
    async fn initialize(&self) -> RecommendResult<()>;

    async fn register_user(&self, user_id: &str, profile: Option<&PreferenceProfile>);

    async fn register_venue(&self, venue: &VenueAttributes);

    async fn record_interaction(&self, event: &InteractionEvent);

    async fn recommend(&self, user_id: &str, count: usize) -> RecommendResult<Vec<String>>;

    /// Rank with the rule table; identical for every engine variant
    fn fallback_recommend(
        &self,
        profile: &PreferenceProfile,
        venues: &[VenueAttributes],
        count: usize,
    ) -> Vec<String> {
        ranking::rank(profile, venues, count)
    }
}

/// Counts of what a personalized engine has ingested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LearningStats {
    pub users: usize,
    pub venues: usize,
    pub interactions: usize,
}

/// Interactions kept in memory before the oldest are evicted
pub const DEFAULT_MAX_INTERACTIONS: usize = 10_000;

/// Source of learned rankings behind a [`PersonalizedEngine`]
///
/// Queries run under the engine's timeout; an empty answer means no opinion.
#[async_trait]
pub trait PreferenceModel: Send + Sync {
    async fn query(&self, user_id: &str, count: usize) -> Vec<String>;
}

/// Model used until a trained one is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct UntrainedModel;

#[async_trait]
impl PreferenceModel for UntrainedModel {
    async fn query(&self, _user_id: &str, _count: usize) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
struct LearningStore {
    users: HashMap<String, Option<PreferenceProfile>>,
    venues: HashMap<String, VenueAttributes>,
    interactions: VecDeque<InteractionEvent>,
}

/// Stateful engine that collects signals for a learned model
///
/// With the default [`UntrainedModel`] every query answers "no opinion"
/// and callers fall through to the rule table. Only the most recent
/// `max_interactions` events are retained.
pub struct PersonalizedEngine {
    state: StateCell,
    init: OnceCell<()>,
    store: RwLock<LearningStore>,
    model: Arc<dyn PreferenceModel>,
    query_timeout: Duration,
    max_interactions: usize,
}

impl PersonalizedEngine {
    pub fn new(query_timeout: Duration, max_interactions: usize) -> Self {
        Self {
            state: StateCell::default(),
            init: OnceCell::new(),
            store: RwLock::new(LearningStore::default()),
            model: Arc::new(UntrainedModel),
            query_timeout,
            max_interactions,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn PreferenceModel>) -> Self {
        self.model = model;
        self
    }

    pub async fn stats(&self) -> LearningStats {
        let store = self.store.read().await;
        LearningStats {
            users: store.users.len(),
            venues: store.venues.len(),
            interactions: store.interactions.len(),
        }
    }

    /// Retained interactions recorded for one user
    pub async fn interaction_count_for(&self, user_id: &str) -> usize {
        let store = self.store.read().await;
        store.interactions.iter().filter(|e| e.user_id == user_id).count()
    }

    fn ensure_ready(&self) -> RecommendResult<()> {
        match self.state.get() {
            EngineState::Ready => Ok(()),
            _ => Err(RecommendError::NotReady),
        }
    }

    async fn try_register_user(
        &self,
        user_id: &str,
        profile: Option<&PreferenceProfile>,
    ) -> RecommendResult<()> {
        self.ensure_ready()?;
        if user_id.is_empty() {
            return Err(RecommendError::InvalidArgument("empty user id".into()));
        }
        self.store
            .write()
            .await
            .users
            .insert(user_id.to_string(), profile.cloned());
        Ok(())
    }

    async fn try_register_venue(&self, venue: &VenueAttributes) -> RecommendResult<()> {
        self.ensure_ready()?;
        if venue.venue_id.is_empty() {
            return Err(RecommendError::InvalidArgument("empty venue id".into()));
        }
        self.store
            .write()
            .await
            .venues
            .insert(venue.venue_id.clone(), venue.clone());
        Ok(())
    }

    async fn try_record_interaction(&self, event: &InteractionEvent) -> RecommendResult<()> {
        self.ensure_ready()?;
        if self.max_interactions == 0 {
            return Ok(());
        }

        let mut store = self.store.write().await;
        while store.interactions.len() >= self.max_interactions {
            store.interactions.pop_front();
        }
        store.interactions.push_back(event.clone());
        Ok(())
    }
}

impl Default for PersonalizedEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), DEFAULT_MAX_INTERACTIONS)
    }
}

#[async_trait]
impl RecommendationEngine for PersonalizedEngine {
    fn name(&self) -> &'static str {
        "personalized"
    }

    fn state(&self) -> EngineState {
        self.state.get()
    }

    async fn initialize(&self) -> RecommendResult<()> {
        self.init
            .get_or_init(|| async {
                self.state.set(EngineState::Initializing);
                tracing::info!("Initializing personalized engine");
                self.state.set(EngineState::Ready);
            })
            .await;
        Ok(())
    }

    async fn register_user(&self, user_id: &str, profile: Option<&PreferenceProfile>) {
        if let Err(e) = self.try_register_user(user_id, profile).await {
            tracing::warn!("Dropped user registration for {}: {}", user_id, e);
        }
    }

    async fn register_venue(&self, venue: &VenueAttributes) {
        if let Err(e) = self.try_register_venue(venue).await {
            tracing::warn!("Dropped venue registration for {}: {}", venue.venue_id, e);
        }
    }

    async fn record_interaction(&self, event: &InteractionEvent) {
        if let Err(e) = self.try_record_interaction(event).await {
            tracing::warn!(
                "Dropped interaction {} -> {} ({}): {}",
                event.user_id,
                event.venue_id,
                event.kind,
                e
            );
        }
    }

    async fn recommend(&self, user_id: &str, count: usize) -> RecommendResult<Vec<String>> {
        self.ensure_ready()?;
        if count == 0 {
            return Ok(Vec::new());
        }

        match tokio::time::timeout(self.query_timeout, self.model.query(user_id, count)).await {
            Ok(mut ids) => {
                ids.truncate(count);
                Ok(ids)
            }
            Err(_) => {
                tracing::warn!(
                    "Personalized query for {} timed out after {:?}",
                    user_id,
                    self.query_timeout
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Stateless engine that always defers to the rule table
#[derive(Debug, Default)]
pub struct RuleBasedEngine {
    state: StateCell,
}

impl RuleBasedEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecommendationEngine for RuleBasedEngine {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    fn state(&self) -> EngineState {
        self.state.get()
    }

    async fn initialize(&self) -> RecommendResult<()> {
        self.state.set(EngineState::Ready);
        Ok(())
    }

    async fn register_user(&self, _user_id: &str, _profile: Option<&PreferenceProfile>) {}

    async fn register_venue(&self, _venue: &VenueAttributes) {}

    async fn record_interaction(&self, _event: &InteractionEvent) {}

    /// Always empty, before and after initialization
    async fn recommend(&self, _user_id: &str, _count: usize) -> RecommendResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Ambience, BudgetTier, InstaWorthiness, Lighting, Mood, NoiseLevel, SeatingStyle,
        WifiQuality,
    };
    use std::sync::Arc;

    fn create_venue(id: &str) -> VenueAttributes {
        VenueAttributes {
            venue_id: id.to_string(),
            name: format!("Cafe {}", id),
            latitude: 12.9716,
            longitude: 77.5946,
            budget_tier: BudgetTier::Mid,
            ambience: Ambience::Cozy,
            noise_level: NoiseLevel::Quiet,
            lighting: Lighting::Natural,
            seating_style: SeatingStyle::Tables,
            work_friendly: true,
            wifi_quality: WifiQuality::Good,
            pet_friendly: false,
            insta_worthiness: InstaWorthiness::Low,
            plug_available: true,
        }
    }

    fn create_profile() -> PreferenceProfile {
        PreferenceProfile {
            budget: BudgetTier::Mid,
            desired_ambiences: vec![Ambience::Cozy],
            mood: Mood::Study,
            wants_pet_friendly: false,
        }
    }

    #[tokio::test]
    async fn test_personalized_rejects_queries_before_ready() {
        let engine = PersonalizedEngine::default();
        assert_eq!(engine.state(), EngineState::Uninitialized);

        let result = engine.recommend("user-1", 10).await;
        assert!(matches!(result, Err(RecommendError::NotReady)));

        // ingestion before ready is dropped, not applied later
        engine.register_venue(&create_venue("v1")).await;
        engine.initialize().await.unwrap();
        assert_eq!(engine.stats().await.venues, 0);
    }

    #[tokio::test]
    async fn test_personalized_initialize_is_idempotent() {
        let engine = PersonalizedEngine::default();
        engine.initialize().await.unwrap();
        engine.register_venue(&create_venue("v1")).await;
        let before = engine.stats().await;

        engine.initialize().await.unwrap();

        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.stats().await, before);
    }

    #[tokio::test]
    async fn test_personalized_ingests_and_has_no_opinion() {
        let engine = PersonalizedEngine::default();
        engine.initialize().await.unwrap();

        let profile = create_profile();
        engine.register_user("user-1", Some(&profile)).await;
        engine.register_venue(&create_venue("v1")).await;
        engine
            .record_interaction(&InteractionEvent::new("user-1", "v1", "view"))
            .await;

        assert_eq!(
            engine.stats().await,
            LearningStats { users: 1, venues: 1, interactions: 1 }
        );
        assert!(engine.recommend("user-1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_personalized_tolerates_concurrent_ingestion() {
        let engine = Arc::new(PersonalizedEngine::default());
        engine.initialize().await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                let venue_id = format!("v{}", i);
                engine.register_venue(&create_venue(&venue_id)).await;
                engine
                    .record_interaction(&InteractionEvent::new("user-1", venue_id, "view"))
                    .await;
                engine.recommend("user-1", 5).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_empty());
        }

        let stats = engine.stats().await;
        assert_eq!(stats.venues, 16);
        assert_eq!(stats.interactions, 16);
    }

    /// Model that answers after a fixed delay
    struct SlowModel {
        delay: Duration,
        ids: Vec<String>,
    }

    #[async_trait]
    impl PreferenceModel for SlowModel {
        async fn query(&self, _user_id: &str, _count: usize) -> Vec<String> {
            tokio::time::sleep(self.delay).await;
            self.ids.clone()
        }
    }

    fn engine_with_model(delay: Duration) -> PersonalizedEngine {
        PersonalizedEngine::new(Duration::from_millis(250), DEFAULT_MAX_INTERACTIONS).with_model(
            Arc::new(SlowModel {
                delay,
                ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_answer_is_truncated_to_count() {
        let engine = engine_with_model(Duration::from_millis(10));
        engine.initialize().await.unwrap();

        assert_eq!(engine.recommend("user-1", 2).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_query_times_out_as_no_opinion() {
        let engine = engine_with_model(Duration::from_secs(30));
        engine.initialize().await.unwrap();

        let ids = engine.recommend("user-1", 10).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_interaction_log_evicts_oldest_beyond_cap() {
        let engine = PersonalizedEngine::new(Duration::from_millis(250), 3);
        engine.initialize().await.unwrap();

        for venue in ["v1", "v2"] {
            engine
                .record_interaction(&InteractionEvent::new("early", venue, "view"))
                .await;
        }
        for venue in ["v3", "v4", "v5"] {
            engine
                .record_interaction(&InteractionEvent::new("late", venue, "view"))
                .await;
        }

        assert_eq!(engine.stats().await.interactions, 3);
        assert_eq!(engine.interaction_count_for("early").await, 0);
        assert_eq!(engine.interaction_count_for("late").await, 3);
    }

    #[tokio::test]
    async fn test_zero_interaction_cap_keeps_nothing() {
        let engine = PersonalizedEngine::new(Duration::from_millis(250), 0);
        engine.initialize().await.unwrap();
        engine
            .record_interaction(&InteractionEvent::new("user-1", "v1", "view"))
            .await;

        assert_eq!(engine.stats().await.interactions, 0);
    }

    #[tokio::test]
    async fn test_pre_ready_policy_per_variant() {
        let personalized = PersonalizedEngine::default();
        assert!(matches!(
            personalized.recommend("user-1", 10).await,
            Err(RecommendError::NotReady)
        ));

        let rule_based = RuleBasedEngine::new();
        assert_eq!(rule_based.state(), EngineState::Uninitialized);
        assert!(rule_based.recommend("user-1", 10).await.unwrap().is_empty());

        rule_based.initialize().await.unwrap();
        assert!(rule_based.recommend("user-1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rule_based_never_has_an_opinion() {
        let engine = RuleBasedEngine::new();
        engine.initialize().await.unwrap();

        let profile = create_profile();
        engine.register_user("user-1", Some(&profile)).await;
        engine
            .record_interaction(&InteractionEvent::new("user-1", "v1", "save"))
            .await;

        assert!(engine.recommend("user-1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_is_identical_across_variants() {
        let personalized = PersonalizedEngine::default();
        let rule_based = RuleBasedEngine::new();

        let mut other = create_venue("other");
        other.budget_tier = BudgetTier::Low;
        let venues = vec![other, create_venue("match")];
        let profile = create_profile();

        let a = personalized.fallback_recommend(&profile, &venues, 10);
        let b = rule_based.fallback_recommend(&profile, &venues, 10);
        assert_eq!(a, b);
        assert_eq!(a, vec!["match", "other"]);
    }
}
