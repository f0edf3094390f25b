use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::config::PersonalizationSettings;
use crate::core::engine::{PersonalizedEngine, RecommendationEngine, RuleBasedEngine};
use crate::services::store::VenueStore;

/// Which engine variant the process runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineMode {
    Personalized,
    RuleBased,
}

impl std::fmt::Display for EngineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineMode::Personalized => write!(f, "personalized"),
            EngineMode::RuleBased => write!(f, "rule-based"),
        }
    }
}

/// Outcome of the startup warm-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillReport {
    pub venues_pushed: usize,
    pub completed: bool,
}

/// Holds the engine chosen for the lifetime of the process
///
/// Built once at startup and shared; the engine is never swapped.
/// Until warm-up finishes [`EngineSelector::active`] returns `None` and
/// callers use the rule table directly. A successful warm-up runs at most
/// once; later calls return the first report.
pub struct EngineSelector {
    mode: EngineMode,
    engine: Arc<dyn RecommendationEngine>,
    backfill: OnceCell<BackfillReport>,
}

impl EngineSelector {
    /// Choose the personalized engine iff both credentials are present and non-empty
    pub fn from_settings(settings: &PersonalizationSettings) -> Self {
        let mode = if settings.has_credentials() {
            EngineMode::Personalized
        } else {
            EngineMode::RuleBased
        };

        let engine: Arc<dyn RecommendationEngine> = match mode {
            EngineMode::Personalized => Arc::new(PersonalizedEngine::new(
                Duration::from_millis(settings.query_timeout_ms),
                settings.max_interactions,
            )),
            EngineMode::RuleBased => Arc::new(RuleBasedEngine::new()),
        };

        tracing::info!("Selected {} recommendation engine", mode);

        Self::with_engine(mode, engine)
    }

    pub fn with_engine(mode: EngineMode, engine: Arc<dyn RecommendationEngine>) -> Self {
        Self {
            mode,
            engine,
            backfill: OnceCell::new(),
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn engine(&self) -> &dyn RecommendationEngine {
        self.engine.as_ref()
    }

    pub fn is_warm(&self) -> bool {
        self.backfill.initialized()
    }

    /// The engine, once it is advertised as ready for traffic
    pub fn active(&self) -> Option<&dyn RecommendationEngine> {
        if self.is_warm() {
            Some(self.engine.as_ref())
        } else {
            None
        }
    }

    /// Initialize the engine and push every known venue into it
    ///
    /// Failures are logged; the process keeps serving from the rule table.
    /// A failed initialization can be retried, a completed backfill is not
    /// repeated.
    pub async fn warm_up(&self, store: &dyn VenueStore) -> BackfillReport {
        match self
            .backfill
            .get_or_try_init(|| self.initialize_and_backfill(store))
            .await
        {
            Ok(report) => *report,
            Err(report) => report,
        }
    }

    async fn initialize_and_backfill(
        &self,
        store: &dyn VenueStore,
    ) -> Result<BackfillReport, BackfillReport> {
        if let Err(e) = self.engine.initialize().await {
            tracing::error!("Failed to initialize {} engine: {}", self.mode, e);
            return Err(BackfillReport { venues_pushed: 0, completed: false });
        }

        let venues = match store.list_all_venues().await {
            Ok(venues) => venues,
            Err(e) => {
                tracing::error!("Venue backfill skipped, could not list venues: {}", e);
                Vec::new()
            }
        };

        for venue in &venues {
            self.engine.register_venue(venue).await;
        }

        tracing::info!(
            "{} engine warm, backfilled {} venues",
            self.mode,
            venues.len()
        );

        Ok(BackfillReport {
            venues_pushed: venues.len(),
            completed: true,
        })
    }

    /// Run [`EngineSelector::warm_up`] in the background
    pub fn spawn_warm_up(
        self: &Arc<Self>,
        store: Arc<dyn VenueStore>,
    ) -> tokio::task::JoinHandle<BackfillReport> {
        let selector = Arc::clone(self);
        tokio::spawn(async move { selector.warm_up(store.as_ref()).await })
    }
}
