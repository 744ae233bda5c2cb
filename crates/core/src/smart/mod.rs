//! Smart-N recommendations
//!
//! Context-aware scoring and rotation of airport amenities. A [`SmartEngine`]
//! is built for one [`TravelerContext`]; it picks a [`Mode`] from the
//! remaining free time, scores every amenity on five factors, and pages
//! through the best candidates.

pub mod factors;
pub mod mode;
pub mod rotation;
pub mod scoring;
pub mod terminals;

use std::sync::Arc;

pub use factors::{HeuristicPopularity, PopularitySignal};
pub use mode::{select_mode, Mode, WeightProfile};
pub use rotation::{page_from_ranked, RotationItem, RotationPage, RotationSettings};
pub use scoring::{FactorScores, ScoredAmenity, ScoringEngine};

use crate::domain::amenity::CandidateAmenity;
use crate::domain::context::TravelerContext;

/// Entry point used by presentation layers to render the ranked carousel.
#[derive(Debug, Clone)]
pub struct SmartEngine {
    context: TravelerContext,
    scoring: ScoringEngine,
    rotation: RotationSettings,
}

impl SmartEngine {
    pub fn new(context: TravelerContext) -> Self {
        let scoring = ScoringEngine::new(&context);
        tracing::debug!(
            event_name = "smart.mode.selected",
            layover_minutes = context.layover_minutes,
            mode = %scoring.mode(),
            "selected scoring mode"
        );
        Self { context, scoring, rotation: RotationSettings::default() }
    }

    pub fn with_rotation(mut self, rotation: RotationSettings) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the popularity dimension, e.g. with real traffic data.
    pub fn with_popularity(mut self, popularity: Arc<dyn PopularitySignal>) -> Self {
        self.scoring = ScoringEngine::with_popularity(&self.context, popularity);
        self
    }

    pub fn context(&self) -> &TravelerContext {
        &self.context
    }

    pub fn get_mode(&self) -> Mode {
        self.scoring.mode()
    }

    pub fn get_weights(&self) -> WeightProfile {
        self.scoring.weights()
    }

    pub fn score(&self, amenity: &CandidateAmenity) -> ScoredAmenity {
        self.scoring.score(amenity, &self.context)
    }

    pub fn rank(&self, amenities: &[CandidateAmenity]) -> Vec<ScoredAmenity> {
        self.scoring.rank(amenities, &self.context)
    }

    /// Page `rotation_index` of the ranked pool. An empty catalog gives an
    /// empty page.
    pub fn get_page(&self, amenities: &[CandidateAmenity], rotation_index: usize) -> RotationPage {
        page_from_ranked(self.rank(amenities), rotation_index, self.rotation)
    }

    pub fn get_mode_recommendations(&self) -> &'static [&'static str] {
        self.get_mode().recommendations()
    }

    /// Short status strings for the chips above the carousel.
    pub fn get_context_pills(&self) -> Vec<String> {
        let mut pills = Vec::new();

        if self.context.layover_minutes < mode::RUSH_THRESHOLD_MINUTES {
            pills.push(format!("{} min left", self.context.layover_minutes));
        } else if self.context.is_rushing {
            pills.push("Rushing".to_owned());
        }

        let terminal = self.context.current_terminal.trim();
        if !terminal.is_empty() {
            pills.push(format!("Terminal {terminal}"));
        }

        pills.push(self.get_mode().label().to_owned());
        pills
    }
}
