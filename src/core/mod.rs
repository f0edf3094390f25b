// Core algorithm exports
pub mod distance;
pub mod engine;
pub mod ranking;
pub mod scoring;
pub mod selector;

pub use distance::{haversine_distance, select_near};
pub use engine::{
    EngineState, LearningStats, PersonalizedEngine, PreferenceModel, RecommendationEngine,
    RuleBasedEngine, UntrainedModel, DEFAULT_MAX_INTERACTIONS,
};
pub use ranking::{rank, Ranker, DEFAULT_LIMIT};
pub use scoring::{calculate_affinity_score, mood_bonus, FallbackScorer, Scorer};
pub use selector::{BackfillReport, EngineMode, EngineSelector};
