//! Weighted combination of the factor scores

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::amenity::CandidateAmenity;
use crate::domain::context::TravelerContext;

use super::factors::{self, HeuristicPopularity, PopularitySignal};
use super::mode::{select_mode, Mode, WeightProfile};
use super::terminals;

/// Availability above this counts as "currently open".
pub const OPEN_THRESHOLD: f64 = 50.0;
/// Personalization above this counts as a preference match.
pub const PREFERENCE_THRESHOLD: f64 = 50.0;
/// Temporal fit above this marks the amenity's peak time.
pub const PEAK_TIME_THRESHOLD: f64 = 80.0;

/// Individual factor scores, each in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorScores {
    pub proximity: f64,
    pub temporal: f64,
    pub availability: f64,
    pub popularity: f64,
    pub personalization: f64,
}

impl FactorScores {
    /// `Σ factor × weight / 100`. Stays in `0.0..=100.0` whenever the factors
    /// do, because every profile sums to 100.
    pub fn weighted_total(&self, weights: &WeightProfile) -> f64 {
        let total = self.proximity * f64::from(weights.proximity)
            + self.availability * f64::from(weights.availability)
            + self.temporal * f64::from(weights.temporal)
            + self.popularity * f64::from(weights.popularity)
            + self.personalization * f64::from(weights.personalization);

        total / 100.0
    }
}

/// An amenity together with how well it fits the current context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAmenity {
    pub amenity: CandidateAmenity,
    pub scores: FactorScores,
    pub total_score: f64,
    /// Walking-time proxy from the traveler's terminal.
    pub walking_minutes: u32,
    pub is_open: bool,
    pub matches_preferences: bool,
    pub peak_time: bool,
}

/// Scores amenities against one traveler context.
#[derive(Clone)]
pub struct ScoringEngine {
    mode: Mode,
    weights: WeightProfile,
    popularity: Arc<dyn PopularitySignal>,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("mode", &self.mode)
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    /// Engine for `context`, using the heuristic popularity signal.
    pub fn new(context: &TravelerContext) -> Self {
        Self::with_popularity(context, Arc::new(HeuristicPopularity))
    }

    pub fn with_popularity(context: &TravelerContext, popularity: Arc<dyn PopularitySignal>) -> Self {
        let mode = select_mode(context.layover_minutes);
        Self { mode, weights: mode.weights(), popularity }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn weights(&self) -> WeightProfile {
        self.weights
    }

    pub fn factor_scores(&self, amenity: &CandidateAmenity, context: &TravelerContext) -> FactorScores {
        FactorScores {
            proximity: factors::proximity(amenity, context),
            temporal: factors::temporal(amenity, context),
            availability: factors::availability(amenity, context),
            popularity: factors::popularity(self.popularity.as_ref(), amenity),
            personalization: factors::personalization(amenity, context),
        }
    }

    pub fn score(&self, amenity: &CandidateAmenity, context: &TravelerContext) -> ScoredAmenity {
        let scores = self.factor_scores(amenity, context);
        let total_score = scores.weighted_total(&self.weights);

        ScoredAmenity {
            amenity: amenity.clone(),
            scores,
            total_score,
            walking_minutes: terminals::distance(&context.current_terminal, &amenity.terminal_code),
            is_open: scores.availability > OPEN_THRESHOLD,
            matches_preferences: scores.personalization > PREFERENCE_THRESHOLD,
            peak_time: scores.temporal > PEAK_TIME_THRESHOLD,
        }
    }

    /// Score every amenity and order by total score, best first. The sort is
    /// stable, so ties keep catalog order.
    pub fn rank(&self, amenities: &[CandidateAmenity], context: &TravelerContext) -> Vec<ScoredAmenity> {
        let mut scored: Vec<ScoredAmenity> =
            amenities.iter().map(|amenity| self.score(amenity, context)).collect();

        scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

        tracing::debug!(
            event_name = "smart.scoring.ranked",
            mode = %self.mode,
            candidates = scored.len(),
            best = scored.first().map(|top| top.total_score).unwrap_or_default(),
            "ranked amenities"
        );

        scored
    }
}
