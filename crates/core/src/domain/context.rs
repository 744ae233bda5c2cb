use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Price preference a traveler can state. Ordinals sit on the same 1..=4 scale
/// as [`PriceTier`](super::amenity::PriceTier); premium maps to the top tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePreference {
    Budget,
    Moderate,
    Premium,
}

impl PricePreference {
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Budget => 1,
            Self::Moderate => 2,
            Self::Premium => 4,
        }
    }
}

impl FromStr for PricePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "budget" => Ok(Self::Budget),
            "moderate" => Ok(Self::Moderate),
            "premium" => Ok(Self::Premium),
            other => Err(format!(
                "unsupported price preference `{other}` (expected budget|moderate|premium)"
            )),
        }
    }
}

/// Situational snapshot of a traveler, built fresh for every request.
///
/// `current_time` is the wall-clock time at the airport; only its hour is used
/// by the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerContext {
    pub current_terminal: String,
    pub layover_minutes: u32,
    pub current_time: NaiveDateTime,
    #[serde(default)]
    pub previous_choices: Vec<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub price_preference: Option<PricePreference>,
    #[serde(default)]
    pub is_rushing: bool,
}

impl TravelerContext {
    pub fn new(
        current_terminal: impl Into<String>,
        layover_minutes: u32,
        current_time: NaiveDateTime,
    ) -> Self {
        Self {
            current_terminal: current_terminal.into(),
            layover_minutes,
            current_time,
            previous_choices: Vec::new(),
            dietary_preferences: Vec::new(),
            price_preference: None,
            is_rushing: false,
        }
    }

    pub fn with_previous_choices(mut self, choices: Vec<String>) -> Self {
        self.previous_choices = choices;
        self
    }

    pub fn with_dietary_preferences(mut self, tags: Vec<String>) -> Self {
        self.dietary_preferences = tags;
        self
    }

    pub fn with_price_preference(mut self, preference: PricePreference) -> Self {
        self.price_preference = Some(preference);
        self
    }

    pub fn rushing(mut self, is_rushing: bool) -> Self {
        self.is_rushing = is_rushing;
        self
    }

    pub fn hour(&self) -> u32 {
        self.current_time.hour()
    }

    pub fn has_chosen(&self, amenity_id: &str) -> bool {
        self.previous_choices.iter().any(|choice| choice == amenity_id)
    }
}
