use crate::core::scoring::{FallbackScorer, Scorer};
use crate::models::{PreferenceProfile, ScoredCandidate, VenueAttributes};

/// Number of ids returned when the caller does not ask for a count
pub const DEFAULT_LIMIT: usize = 10;

/// Scores a candidate set and keeps the best venues
///
/// Ties keep the order candidates were supplied in.
#[derive(Debug, Clone, Default)]
pub struct Ranker<S = FallbackScorer> {
    scorer: S,
}

impl<S: Scorer> Ranker<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Score every venue and return them best first
    pub fn score_all(
        &self,
        profile: &PreferenceProfile,
        venues: &[VenueAttributes],
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = venues
            .iter()
            .map(|venue| ScoredCandidate {
                venue_id: venue.venue_id.clone(),
                score: self.scorer.score(profile, venue),
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Rank venues for a profile and keep at most `limit` ids
    pub fn rank(
        &self,
        profile: &PreferenceProfile,
        venues: &[VenueAttributes],
        limit: usize,
    ) -> Vec<String> {
        if limit == 0 || venues.is_empty() {
            return Vec::new();
        }

        let mut scored = self.score_all(profile, venues);
        scored.truncate(limit);

        tracing::trace!(
            "Ranked {} venues, kept {} (top score: {:?})",
            venues.len(),
            scored.len(),
            scored.first().map(|c| c.score)
        );

        scored.into_iter().map(|candidate| candidate.venue_id).collect()
    }
}

/// Rank venues with the fallback rule table
pub fn rank(profile: &PreferenceProfile, venues: &[VenueAttributes], limit: usize) -> Vec<String> {
    Ranker::new(FallbackScorer).rank(profile, venues, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Ambience, BudgetTier, InstaWorthiness, Lighting, Mood, NoiseLevel, SeatingStyle,
        WifiQuality,
    };

    fn create_venue(id: &str, budget_tier: BudgetTier, ambience: Ambience) -> VenueAttributes {
        VenueAttributes {
            venue_id: id.to_string(),
            name: format!("Cafe {}", id),
            latitude: 12.9716,
            longitude: 77.5946,
            budget_tier,
            ambience,
            noise_level: NoiseLevel::Moderate,
            lighting: Lighting::Natural,
            seating_style: SeatingStyle::Tables,
            work_friendly: false,
            wifi_quality: WifiQuality::Basic,
            pet_friendly: false,
            insta_worthiness: InstaWorthiness::Low,
            plug_available: false,
        }
    }

    fn create_profile() -> PreferenceProfile {
        PreferenceProfile {
            budget: BudgetTier::Mid,
            desired_ambiences: vec![Ambience::Cozy],
            mood: Mood::Other,
            wants_pet_friendly: false,
        }
    }

    #[test]
    fn test_rank_orders_by_score() {
        let venues = vec![
            create_venue("none", BudgetTier::Low, Ambience::Minimal),   // 0
            create_venue("both", BudgetTier::Mid, Ambience::Cozy),      // 7
            create_venue("budget", BudgetTier::Mid, Ambience::Minimal), // 3
        ];

        let ids = rank(&create_profile(), &venues, DEFAULT_LIMIT);
        assert_eq!(ids, vec!["both", "budget", "none"]);
    }

    #[test]
    fn test_rank_keeps_input_order_on_ties() {
        let venues = vec![
            create_venue("a", BudgetTier::Mid, Ambience::Minimal),
            create_venue("b", BudgetTier::Low, Ambience::Minimal),
            create_venue("c", BudgetTier::Mid, Ambience::Garden),
            create_venue("d", BudgetTier::Mid, Ambience::Industrial),
        ];

        let ids = rank(&create_profile(), &venues, DEFAULT_LIMIT);
        assert_eq!(ids, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_rank_respects_limit() {
        let venues: Vec<VenueAttributes> = (0..20)
            .map(|i| create_venue(&i.to_string(), BudgetTier::Mid, Ambience::Cozy))
            .collect();

        assert_eq!(rank(&create_profile(), &venues, 5).len(), 5);
        assert_eq!(rank(&create_profile(), &venues, 50).len(), 20);
        assert!(rank(&create_profile(), &venues, 0).is_empty());
    }

    #[test]
    fn test_rank_empty_candidates() {
        assert!(rank(&create_profile(), &[], DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_custom_scorer() {
        struct ByNameLength;

        impl Scorer for ByNameLength {
            fn score(&self, _profile: &PreferenceProfile, venue: &VenueAttributes) -> u32 {
                venue.name.len() as u32
            }
        }

        let mut short = create_venue("short", BudgetTier::Mid, Ambience::Cozy);
        short.name = "A".to_string();
        let mut long = create_venue("long", BudgetTier::Low, Ambience::Minimal);
        long.name = "A much longer name".to_string();

        let ranker = Ranker::new(ByNameLength);
        assert_eq!(ranker.rank(&create_profile(), &[short, long], 10), vec!["long", "short"]);
    }
}
