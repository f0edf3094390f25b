use crate::models::{
    Ambience, InstaWorthiness, Lighting, Mood, NoiseLevel, PreferenceProfile, SeatingStyle,
    VenueAttributes, WifiQuality,
};

/// Assigns an affinity score to a venue for a preference profile
///
/// Implementations must be deterministic so rankings are reproducible.
pub trait Scorer: Send + Sync {
    fn score(&self, profile: &PreferenceProfile, venue: &VenueAttributes) -> u32;
}

/// The rule-table scorer used whenever no personalized opinion exists
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackScorer;

impl Scorer for FallbackScorer {
    fn score(&self, profile: &PreferenceProfile, venue: &VenueAttributes) -> u32 {
        calculate_affinity_score(profile, venue)
    }
}

/// Calculate the additive affinity score for a venue
///
/// Scoring table:
/// - budget tier matches: +3
/// - ambience is one of the desired ambiences: +4
/// - mood bonus (see [`mood_bonus`]): 0..=7
/// - high insta-worthiness: +2
/// - pet friendly and the user wants that: +1
pub fn calculate_affinity_score(profile: &PreferenceProfile, venue: &VenueAttributes) -> u32 {
    let mut score = 0;

    if profile.budget == venue.budget_tier {
        score += 3;
    }

    if profile.desired_ambiences.contains(&venue.ambience) {
        score += 4;
    }

    score += mood_bonus(profile.mood, venue);

    if venue.insta_worthiness == InstaWorthiness::High {
        score += 2;
    }

    if venue.pet_friendly && profile.wants_pet_friendly {
        score += 1;
    }

    score
}

/// Points for how well a venue suits the declared mood
///
/// Exactly one rule group applies per mood; `Mood::Other` earns nothing.
#[inline]
pub fn mood_bonus(mood: Mood, venue: &VenueAttributes) -> u32 {
    match mood {
        Mood::Study => {
            points(venue.noise_level == NoiseLevel::Quiet, 3)
                + points(venue.work_friendly, 2)
                + points(venue.plug_available, 1)
        }
        Mood::Work => {
            points(venue.work_friendly, 4)
                + points(venue.wifi_quality == WifiQuality::Excellent, 2)
                + points(venue.plug_available, 2)
        }
        Mood::Date => {
            points(venue.ambience == Ambience::Aesthetic, 3)
                + points(venue.lighting == Lighting::Moody, 2)
                + points(venue.seating_style == SeatingStyle::Booths, 1)
        }
        Mood::Hangout => {
            points(venue.noise_level == NoiseLevel::Social, 2)
                + points(venue.ambience == Ambience::Cozy, 2)
        }
        Mood::Other => 0,
    }
}

#[inline]
fn points(condition: bool, value: u32) -> u32 {
    if condition {
        value
    } else {
        0
    }
}
