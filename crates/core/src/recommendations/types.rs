//! Types for the query-driven recommendation engine

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::amenity::{CandidateAmenity, PriceTier};
use crate::domain::energy::EnergyLevel;

/// Traveler preferences a search can be narrowed by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub vibe_tags: Vec<String>,
    #[serde(default)]
    pub price_tier: Option<PriceTier>,
    #[serde(default)]
    pub accessibility: Vec<String>,
}

/// The part of the itinerary used to infer the journey phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub departs_at: NaiveDateTime,
    #[serde(default)]
    pub layovers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    /// Terminal code the traveler is at; empty disables the terminal filter.
    pub location: String,
    pub now: NaiveDateTime,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub journey: Option<Journey>,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
}

impl RecommendationContext {
    pub fn new(location: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            location: location.into(),
            now,
            preferences: Preferences::default(),
            journey: None,
            energy_level: None,
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_journey(mut self, journey: Journey) -> Self {
        self.journey = Some(journey);
        self
    }

    pub fn with_energy_level(mut self, level: EnergyLevel) -> Self {
        self.energy_level = Some(level);
        self
    }
}

/// Where in the trip the traveler currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyPhase {
    Departure,
    Transit,
    Arrival,
}

/// Energy label reported in an explanation. `Unknown` and `Error` flag runs
/// that had nothing to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLabel {
    Low,
    Medium,
    High,
    Unknown,
    Error,
}

impl From<EnergyLevel> for EnergyLabel {
    fn from(level: EnergyLevel) -> Self {
        match level {
            EnergyLevel::Low => Self::Low,
            EnergyLevel::Medium => Self::Medium,
            EnergyLevel::High => Self::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub energy_level: EnergyLabel,
    pub reasoning: Vec<String>,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<CandidateAmenity>,
    pub fallbacks: Vec<CandidateAmenity>,
    pub journey_context: JourneyPhase,
    pub explanation: Explanation,
}

impl RecommendationResult {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty() && self.fallbacks.is_empty()
    }
}

/// Result counts and the departure window used for phase inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationLimits {
    pub max_results: usize,
    pub max_fallbacks: usize,
    pub departure_window_minutes: i64,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self { max_results: 10, max_fallbacks: 10, departure_window_minutes: 120 }
    }
}
