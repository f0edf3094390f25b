use serde::{Deserialize, Serialize};

/// Price band a venue sits in, written the way the quiz shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetTier {
    #[serde(rename = "₹")]
    Low,
    #[serde(rename = "₹₹")]
    Mid,
    #[serde(rename = "₹₹₹")]
    High,
    #[serde(rename = "₹₹₹₹")]
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ambience {
    Cozy,
    Aesthetic,
    Minimal,
    Industrial,
    Vintage,
    Garden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseLevel {
    Quiet,
    Moderate,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lighting {
    Bright,
    Natural,
    Moody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatingStyle {
    Booths,
    Tables,
    Couches,
    Outdoor,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WifiQuality {
    None,
    Basic,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstaWorthiness {
    Low,
    Medium,
    High,
}

/// What the user wants the visit for
///
/// Unknown moods deserialize to `Other`, which never triggers a
/// mood-specific bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Study,
    Work,
    Date,
    Hangout,
    #[serde(other)]
    Other,
}

/// Venue record with location and descriptive tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueAttributes {
    #[serde(rename = "venueId")]
    pub venue_id: String,
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "budgetTier")]
    pub budget_tier: BudgetTier,
    pub ambience: Ambience,
    #[serde(rename = "noiseLevel")]
    pub noise_level: NoiseLevel,
    pub lighting: Lighting,
    #[serde(rename = "seatingStyle")]
    pub seating_style: SeatingStyle,
    #[serde(rename = "workFriendly", default)]
    pub work_friendly: bool,
    #[serde(rename = "wifiQuality")]
    pub wifi_quality: WifiQuality,
    #[serde(rename = "petFriendly", default)]
    pub pet_friendly: bool,
    #[serde(rename = "instaWorthiness")]
    pub insta_worthiness: InstaWorthiness,
    #[serde(rename = "plugAvailable", default)]
    pub plug_available: bool,
}

/// Quiz response; replaced wholesale on every submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub budget: BudgetTier,
    #[serde(rename = "desiredAmbiences", default)]
    pub desired_ambiences: Vec<Ambience>,
    pub mood: Mood,
    #[serde(rename = "wantsPetFriendly", default)]
    pub wants_pet_friendly: bool,
}

/// Append-only record of a user touching a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub id: uuid::Uuid,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "venueId")]
    pub venue_id: String,
    /// Free-form tag such as "view" or "save"
    pub kind: String,
    #[serde(rename = "occurredAt")]
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

impl InteractionEvent {
    pub fn new(user_id: impl Into<String>, venue_id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id: user_id.into(),
            venue_id: venue_id.into(),
            kind: kind.into(),
            occurred_at: chrono::Utc::now(),
        }
    }
}

/// Venue id paired with its fallback score, only alive while ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub venue_id: String,
    pub score: u32,
}
