//! Recommendation engine implementation

use chrono::Duration;

use super::types::*;
use super::{
    ACCESSIBILITY_MATCH_POINTS, CONSIDERED_FACTORS, HOURS_PRESENT_POINTS, PRICE_MATCH_POINTS,
    TAG_MATCH_POINTS,
};
use crate::catalog::parse_catalog;
use crate::domain::amenity::CandidateAmenity;
use crate::domain::energy::EnergyLevel;

fn contains_ignore_case(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|candidate| candidate.trim().eq_ignore_ascii_case(needle.trim()))
}

fn overlap_count(left: &[String], right: &[String]) -> usize {
    left.iter().filter(|tag| contains_ignore_case(right, tag)).count()
}

fn tag_matches(wanted: &[String], amenity: &CandidateAmenity) -> usize {
    wanted.iter().filter(|tag| amenity.has_tag(tag)).count()
}

fn factor_names() -> Vec<String> {
    CONSIDERED_FACTORS.iter().map(|factor| (*factor).to_owned()).collect()
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    limits: RecommendationLimits,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: RecommendationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> RecommendationLimits {
        self.limits
    }

    /// Filter, score and explain `catalog` for a free-text `query`.
    pub fn recommend(
        &self,
        query: &str,
        context: &RecommendationContext,
        catalog: &[CandidateAmenity],
    ) -> RecommendationResult {
        let journey_context = self.infer_journey_phase(context);

        if catalog.is_empty() {
            tracing::debug!(
                event_name = "recommendations.catalog.empty",
                location = %context.location,
                "no amenities to recommend from"
            );
            return Self::degraded(
                journey_context,
                EnergyLabel::Unknown,
                "No amenities are available for this location yet".to_owned(),
            );
        }

        let needle = query.trim().to_lowercase();
        let mut scored: Vec<(u32, &CandidateAmenity)> = catalog
            .iter()
            .filter(|amenity| self.matches(amenity, &needle, context))
            .map(|amenity| (self.relevance_score(amenity, context), amenity))
            .collect();
        let matched = scored.len();

        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut ranked = scored.into_iter().map(|(_, amenity)| amenity.clone());
        let recommendations: Vec<CandidateAmenity> =
            ranked.by_ref().take(self.limits.max_results).collect();
        let fallbacks: Vec<CandidateAmenity> = ranked.take(self.limits.max_fallbacks).collect();

        tracing::debug!(
            event_name = "recommendations.completed",
            query = %needle,
            candidates = catalog.len(),
            matched,
            recommendations = recommendations.len(),
            fallbacks = fallbacks.len(),
            "recommendation run completed"
        );

        let energy_level = context.energy_level.unwrap_or(EnergyLevel::Medium);
        RecommendationResult {
            recommendations,
            fallbacks,
            journey_context,
            explanation: Explanation {
                energy_level: energy_level.into(),
                reasoning: vec![format!(
                    "{matched} of {} amenities match your search and preferences",
                    catalog.len()
                )],
                factors: factor_names(),
            },
        }
    }

    /// Same as [`recommend`](Self::recommend) for a catalog that still has to
    /// be decoded. A malformed catalog produces an empty result flagged with
    /// [`EnergyLabel::Error`] instead of an error value.
    pub fn recommend_json(
        &self,
        query: &str,
        context: &RecommendationContext,
        raw_catalog: &str,
    ) -> RecommendationResult {
        match parse_catalog(raw_catalog) {
            Ok(catalog) => self.recommend(query, context, &catalog),
            Err(error) => Self::degraded(
                self.infer_journey_phase(context),
                EnergyLabel::Error,
                format!("Amenities could not be loaded: {error}"),
            ),
        }
    }

    pub fn infer_journey_phase(&self, context: &RecommendationContext) -> JourneyPhase {
        let Some(journey) = &context.journey else {
            return JourneyPhase::Departure;
        };

        if !journey.layovers.is_empty() {
            return JourneyPhase::Transit;
        }

        let until_departure = journey.departs_at - context.now;
        if until_departure < Duration::zero() {
            JourneyPhase::Arrival
        } else if until_departure <= self.departure_window() {
            JourneyPhase::Departure
        } else {
            JourneyPhase::Transit
        }
    }

    /// Limits are public, so an out-of-range window falls back to the default
    /// instead of overflowing.
    fn departure_window(&self) -> Duration {
        Duration::try_minutes(self.limits.departure_window_minutes).unwrap_or_else(|| {
            Duration::minutes(RecommendationLimits::default().departure_window_minutes)
        })
    }

    fn matches(&self, amenity: &CandidateAmenity, needle: &str, context: &RecommendationContext) -> bool {
        if !needle.is_empty() && !amenity.name.to_lowercase().contains(needle) {
            return false;
        }

        let location = context.location.trim();
        if !location.is_empty() && !amenity.terminal_code.trim().eq_ignore_ascii_case(location) {
            return false;
        }

        let wanted = &context.preferences.vibe_tags;
        wanted.is_empty() || tag_matches(wanted, amenity) > 0
    }

    fn relevance_score(&self, amenity: &CandidateAmenity, context: &RecommendationContext) -> u32 {
        let preferences = &context.preferences;
        let mut score = 0;

        score += TAG_MATCH_POINTS * tag_matches(&preferences.vibe_tags, amenity) as u32;

        if preferences.price_tier.is_some() && preferences.price_tier == amenity.price_tier {
            score += PRICE_MATCH_POINTS;
        }

        if overlap_count(&preferences.accessibility, &amenity.accessibility) > 0 {
            score += ACCESSIBILITY_MATCH_POINTS;
        }

        if !amenity.opening_hours.trim().is_empty() {
            score += HOURS_PRESENT_POINTS;
        }

        score
    }

    fn degraded(
        journey_context: JourneyPhase,
        energy_level: EnergyLabel,
        reason: String,
    ) -> RecommendationResult {
        RecommendationResult {
            recommendations: Vec::new(),
            fallbacks: Vec::new(),
            journey_context,
            explanation: Explanation {
                energy_level,
                reasoning: vec![reason],
                factors: factor_names(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::domain::amenity::PriceTier;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn catalog() -> Vec<CandidateAmenity> {
        vec![
            CandidateAmenity::new("1", "Kopi Bar", "T1").with_tags(["coffee", "quick"]),
            CandidateAmenity::new("2", "Sky Lounge", "T1")
                .with_tags(["lounge", "quiet"])
                .with_price_tier(PriceTier::Premium)
                .with_opening_hours("24/7")
                .with_accessibility(["wheelchair"]),
            CandidateAmenity::new("3", "Noodle Bar", "T1")
                .with_tags(["quick", "hawker"])
                .with_price_tier(PriceTier::Budget)
                .with_opening_hours("06:00-23:00"),
            CandidateAmenity::new("4", "Garden Bar", "T3").with_tags(["quiet"]),
        ]
    }

    #[test]
    fn filters_by_query_terminal_and_tags() {
        let engine = RecommendationEngine::new();
        let context = RecommendationContext::new("t1", at(12, 0));

        let bars = engine.recommend("BAR", &context, &catalog());
        let ids: Vec<&str> = bars.recommendations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);

        let quiet = context.clone().with_preferences(Preferences {
            vibe_tags: vec!["quiet".into()],
            ..Preferences::default()
        });
        let result = engine.recommend("", &quiet, &catalog());
        let ids: Vec<&str> = result.recommendations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn scores_are_additive() {
        let engine = RecommendationEngine::new();
        let context = RecommendationContext::new("", at(12, 0));

        let full_match = Preferences {
            vibe_tags: vec!["lounge".into(), "quiet".into()],
            price_tier: Some(PriceTier::Premium),
            accessibility: vec!["Wheelchair".into()],
        };
        let catalog = catalog();
        let context = context.with_preferences(full_match);
        assert_eq!(engine.relevance_score(&catalog[1], &context), 10 + 10 + 5 + 3 + 2);
        assert_eq!(engine.relevance_score(&catalog[3], &context), 10);
        assert_eq!(engine.relevance_score(&catalog[0], &context), 0);
    }

    #[test]
    fn overflow_goes_to_fallbacks() {
        let engine = RecommendationEngine::with_limits(RecommendationLimits {
            max_results: 2,
            max_fallbacks: 1,
            ..RecommendationLimits::default()
        });
        let result = engine.recommend("", &RecommendationContext::new("", at(12, 0)), &catalog());

        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.fallbacks.len(), 1);
        assert_eq!(result.recommendations[0].id, "2");
    }

    #[test]
    fn default_limits_split_ten_and_ten() {
        let big: Vec<CandidateAmenity> =
            (0..25).map(|index| CandidateAmenity::new(index.to_string(), "Shop", "T2")).collect();
        let result =
            RecommendationEngine::new().recommend("", &RecommendationContext::new("T2", at(9, 0)), &big);

        assert_eq!(result.recommendations.len(), 10);
        assert_eq!(result.fallbacks.len(), 10);
        assert_eq!(result.recommendations[0].id, "0");
        assert_eq!(result.fallbacks[0].id, "10");
    }

    #[test]
    fn explanation_reports_match_count_and_energy() {
        let context =
            RecommendationContext::new("T1", at(12, 0)).with_energy_level(EnergyLevel::High);
        let result = RecommendationEngine::new().recommend("bar", &context, &catalog());

        assert_eq!(result.explanation.energy_level, EnergyLabel::High);
        assert_eq!(result.explanation.reasoning, vec!["2 of 4 amenities match your search and preferences"]);
        assert_eq!(result.explanation.factors.len(), CONSIDERED_FACTORS.len());
    }

    #[test]
    fn empty_catalog_is_flagged_unknown() {
        let result =
            RecommendationEngine::new().recommend("", &RecommendationContext::new("T1", at(8, 0)), &[]);

        assert!(result.is_empty());
        assert_eq!(result.explanation.energy_level, EnergyLabel::Unknown);
        assert_eq!(result.explanation.reasoning.len(), 1);
    }

    #[test]
    fn malformed_catalog_is_flagged_error() {
        let engine = RecommendationEngine::new();
        let context = RecommendationContext::new("T1", at(8, 0));

        let result = engine.recommend_json("", &context, "{not json");
        assert!(result.is_empty());
        assert_eq!(result.explanation.energy_level, EnergyLabel::Error);

        let decoded = engine.recommend_json("", &context, r#"[{"id": "a", "name": "Kiosk", "terminal_code": "T1"}]"#);
        assert_eq!(decoded.recommendations.len(), 1);
    }

    #[test]
    fn journey_phase_inference() {
        let engine = RecommendationEngine::new();
        let now = at(12, 0);
        let context = |departs_at: NaiveDateTime, layovers: Vec<String>| {
            RecommendationContext::new("T1", now).with_journey(Journey { departs_at, layovers })
        };

        assert_eq!(engine.infer_journey_phase(&RecommendationContext::new("T1", now)), JourneyPhase::Departure);
        assert_eq!(engine.infer_journey_phase(&context(at(18, 0), vec!["DOH".into()])), JourneyPhase::Transit);
        assert_eq!(engine.infer_journey_phase(&context(at(9, 0), Vec::new())), JourneyPhase::Arrival);
        assert_eq!(engine.infer_journey_phase(&context(at(13, 30), Vec::new())), JourneyPhase::Departure);
        assert_eq!(engine.infer_journey_phase(&context(at(14, 0), Vec::new())), JourneyPhase::Departure);
        assert_eq!(engine.infer_journey_phase(&context(at(16, 0), Vec::new())), JourneyPhase::Transit);
    }

    #[test]
    fn oversized_window_falls_back_to_default() {
        let engine = RecommendationEngine::with_limits(RecommendationLimits {
            departure_window_minutes: i64::MAX,
            ..RecommendationLimits::default()
        });
        let now = at(12, 0);
        let departing = |departs_at: NaiveDateTime| {
            RecommendationContext::new("T1", now)
                .with_journey(Journey { departs_at, layovers: Vec::new() })
        };

        assert_eq!(engine.infer_journey_phase(&departing(at(13, 30))), JourneyPhase::Departure);
        assert_eq!(engine.infer_journey_phase(&departing(at(16, 0))), JourneyPhase::Transit);

        let result = engine.recommend("", &departing(at(13, 30)), &[]);
        assert!(result.is_empty());
        assert_eq!(result.journey_context, JourneyPhase::Departure);
        assert_eq!(result.explanation.energy_level, EnergyLabel::Unknown);
    }

    #[test]
    fn preferred_tags_match_ignoring_case_and_padding() {
        let engine = RecommendationEngine::new();
        let context = RecommendationContext::new("T1", at(12, 0)).with_preferences(Preferences {
            vibe_tags: vec![" Quiet ".to_owned()],
            ..Preferences::default()
        });

        let result = engine.recommend("", &context, &catalog());
        let ids: Vec<&str> = result.recommendations.iter().map(|amenity| amenity.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }
}
