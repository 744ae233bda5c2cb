//! The five independent scoring dimensions.
//!
//! Every scorer is a pure function of the amenity and the traveler context and
//! returns a value in `0.0..=100.0`. Missing amenity data never fails a
//! scorer; it lands on the neutral value of that dimension.

use crate::domain::amenity::{CandidateAmenity, PriceTier};
use crate::domain::context::TravelerContext;

use super::terminals;

/// Score used when a dimension has nothing to say about an amenity.
pub const NEUTRAL_SCORE: f64 = 50.0;

const ROUND_THE_CLOCK_MARKERS: &[&str] = &["24/7", "24 hours", "24hrs", "24h", "24-hour", "open 24"];

/// Source of the popularity dimension.
///
/// Implementations must be thread-safe and return values in `0.0..=100.0`;
/// the scoring engine clamps whatever comes back.
pub trait PopularitySignal: Send + Sync {
    fn popularity(&self, amenity: &CandidateAmenity) -> f64;
}

/// Name and price heuristic standing in for real traffic data.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPopularity;

const HIGH_TRAFFIC_NAMES: &[(&str, f64)] = &[
    ("starbucks", 95.0),
    ("din tai fung", 95.0),
    ("jewel", 95.0),
    ("plaza premium", 92.0),
    ("ya kun", 92.0),
    ("mcdonald", 90.0),
    ("burger king", 90.0),
];

impl PopularitySignal for HeuristicPopularity {
    fn popularity(&self, amenity: &CandidateAmenity) -> f64 {
        let name = amenity.name.to_lowercase();
        if let Some((_, score)) = HIGH_TRAFFIC_NAMES.iter().find(|(known, _)| name.contains(known)) {
            return *score;
        }

        match amenity.price_tier {
            Some(PriceTier::Budget) => 70.0,
            Some(PriceTier::Premium) => 60.0,
            _ => NEUTRAL_SCORE,
        }
    }
}

/// Step function from the walking-distance proxy to a score.
pub fn proximity_from_distance(distance: u32) -> f64 {
    match distance {
        0 => 100.0,
        1..=5 => 80.0,
        6..=10 => 50.0,
        11..=15 => 20.0,
        _ => 0.0,
    }
}

pub fn proximity(amenity: &CandidateAmenity, context: &TravelerContext) -> f64 {
    proximity_from_distance(terminals::distance(&context.current_terminal, &amenity.terminal_code))
}

pub fn temporal(amenity: &CandidateAmenity, context: &TravelerContext) -> f64 {
    let hour = context.hour();

    match hour {
        6..=10 => keyword_score(amenity, &["breakfast", "coffee"], &["bakery", "cafe"], 80.0),
        11..=13 => keyword_score(amenity, &["lunch", "hawker"], &["quick", "fast"], 80.0),
        17..=18 => keyword_score(amenity, &["bar", "cocktail"], &["wine", "beer"], 80.0),
        22..=23 | 0..=4 => {
            if is_round_the_clock(&amenity.opening_hours) {
                100.0
            } else if amenity.mentions_any(&["bar", "lounge"]) {
                60.0
            } else {
                NEUTRAL_SCORE
            }
        }
        _ => NEUTRAL_SCORE,
    }
}

fn keyword_score(amenity: &CandidateAmenity, best: &[&str], good: &[&str], good_score: f64) -> f64 {
    if amenity.mentions_any(best) {
        100.0
    } else if amenity.mentions_any(good) {
        good_score
    } else {
        NEUTRAL_SCORE
    }
}

pub fn availability(amenity: &CandidateAmenity, context: &TravelerContext) -> f64 {
    let hours = amenity.opening_hours.to_lowercase();

    if is_round_the_clock(&hours) {
        return 100.0;
    }
    if hours.contains("closed") {
        return 0.0;
    }

    let daytime = (6..22).contains(&context.hour());
    if daytime || hours.contains("late") || hours.contains("early") {
        80.0
    } else {
        20.0
    }
}

fn is_round_the_clock(hours: &str) -> bool {
    let hours = hours.to_lowercase();
    ROUND_THE_CLOCK_MARKERS.iter().any(|marker| hours.contains(marker))
}

pub fn popularity(signal: &dyn PopularitySignal, amenity: &CandidateAmenity) -> f64 {
    bounded(signal.popularity(amenity))
}

pub fn personalization(amenity: &CandidateAmenity, context: &TravelerContext) -> f64 {
    let mut score = NEUTRAL_SCORE;

    if let (Some(preference), Some(tier)) = (context.price_preference, amenity.price_tier) {
        let gap = (i16::from(preference.ordinal()) - i16::from(tier.ordinal())).abs();
        match gap {
            0 => score += 30.0,
            1 => score += 10.0,
            _ => {}
        }
    }

    let description = amenity.description.to_lowercase();
    for dietary in &context.dietary_preferences {
        let dietary = dietary.trim().to_lowercase();
        if dietary.is_empty() {
            continue;
        }
        let tagged = amenity.tags.iter().any(|tag| tag.to_lowercase().contains(&dietary));
        if tagged || description.contains(&dietary) {
            score += 20.0;
        }
    }

    if context.has_chosen(&amenity.id) {
        score -= 30.0;
    }

    bounded(score)
}

/// Clamp to `0.0..=100.0`, mapping non-finite values to zero.
pub fn bounded(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}
