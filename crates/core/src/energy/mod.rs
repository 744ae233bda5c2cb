//! Energy-level defaults for the assistant flow.
//!
//! The advisor proposes how energetic the next activity should be from the
//! time of day and an explicitly chosen mood, and keeps the corrections
//! travelers make so they can be analysed later.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::energy::EnergyLevel;

/// Suggestions remembered for matching corrections; older ones are evicted
/// first and later corrections to them count as unknown.
pub const MAX_TRACKED_SUGGESTIONS: usize = 1024;

/// Confidence of a suggestion derived from the clock alone.
pub const TIME_OF_DAY_CONFIDENCE: f64 = 0.6;
/// Confidence when an explicit mood overrides the clock.
pub const MOOD_OVERRIDE_CONFIDENCE: f64 = 0.8;
/// Confidence when mood and clock agree.
pub const MOOD_AGREES_CONFIDENCE: f64 = 0.9;

/// Mood a traveler picked explicitly in the journey flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Chill,
    Explore,
}

impl Mood {
    fn level(self) -> EnergyLevel {
        match self {
            Self::Chill => EnergyLevel::Low,
            Self::Explore => EnergyLevel::High,
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chill" => Ok(Self::Chill),
            "explore" => Ok(Self::Explore),
            other => Err(format!("unsupported mood `{other}` (expected chill|explore)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyContext {
    pub now: NaiveDateTime,
    #[serde(default)]
    pub mood: Option<Mood>,
}

impl EnergyContext {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now, mood: None }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAlternative {
    pub level: EnergyLevel,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySuggestion {
    pub id: String,
    pub level: EnergyLevel,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub alternatives: Vec<EnergyAlternative>,
}

/// A level the traveler chose instead of (or in confirmation of) a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyCorrection {
    pub suggestion_id: String,
    /// Level this advisor proposed under `suggestion_id`, if it issued one.
    pub suggested_level: Option<EnergyLevel>,
    pub chosen_level: EnergyLevel,
    pub context: EnergyContext,
    pub recorded_at: DateTime<Utc>,
}

/// Issued levels by suggestion id, in issue order.
#[derive(Debug, Default)]
struct IssuedSuggestions {
    levels: HashMap<String, EnergyLevel>,
    order: VecDeque<String>,
}

impl IssuedSuggestions {
    fn insert(&mut self, id: String, level: EnergyLevel, capacity: usize) {
        self.order.push_back(id.clone());
        self.levels.insert(id, level);

        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.levels.remove(&oldest);
            }
        }
    }

    fn get(&self, id: &str) -> Option<EnergyLevel> {
        self.levels.get(id).copied()
    }
}

/// Keeps at most `capacity` issued suggestions (see
/// [`MAX_TRACKED_SUGGESTIONS`]). Corrections are kept in full.
#[derive(Debug)]
pub struct EnergyAdvisor {
    capacity: usize,
    issued: Mutex<IssuedSuggestions>,
    corrections: Mutex<Vec<EnergyCorrection>>,
}

impl Default for EnergyAdvisor {
    fn default() -> Self {
        Self::with_capacity(MAX_TRACKED_SUGGESTIONS)
    }
}

fn time_of_day_level(now: &NaiveDateTime) -> (EnergyLevel, &'static str) {
    match now.hour() {
        5..=11 => (EnergyLevel::High, "Mornings are a good time to get moving"),
        17..=23 | 0..=4 => (EnergyLevel::Low, "It is getting late, so something relaxed fits best"),
        _ => (EnergyLevel::Medium, "Midday suits a balanced pace"),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EnergyAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            issued: Mutex::new(IssuedSuggestions::default()),
            corrections: Mutex::new(Vec::new()),
        }
    }

    pub fn suggest(&self, context: &EnergyContext) -> EnergySuggestion {
        let (mut level, reason) = time_of_day_level(&context.now);
        let mut confidence = TIME_OF_DAY_CONFIDENCE;
        let mut reasoning = vec![reason.to_owned()];

        if let Some(mood) = context.mood {
            let mood_level = mood.level();
            if mood_level == level {
                confidence = MOOD_AGREES_CONFIDENCE;
                reasoning.push(format!("Your {} mood agrees with that", mood_label(mood)));
            } else {
                level = mood_level;
                confidence = MOOD_OVERRIDE_CONFIDENCE;
                reasoning.push(format!(
                    "You picked a {} mood, so energy is set to {level}",
                    mood_label(mood)
                ));
            }
        }

        let alternative_confidence = (1.0 - confidence) / 2.0;
        let alternatives = EnergyLevel::ALL
            .into_iter()
            .filter(|candidate| *candidate != level)
            .map(|candidate| EnergyAlternative { level: candidate, confidence: alternative_confidence })
            .collect();

        let suggestion = EnergySuggestion {
            id: Uuid::new_v4().to_string(),
            level,
            confidence,
            reasoning,
            alternatives,
        };

        lock(&self.issued).insert(suggestion.id.clone(), suggestion.level, self.capacity);
        tracing::debug!(
            event_name = "energy.suggestion.issued",
            suggestion_id = %suggestion.id,
            level = %suggestion.level,
            confidence = suggestion.confidence,
            "issued energy suggestion"
        );

        suggestion
    }

    /// Store the traveler's chosen level. Unknown suggestion ids are recorded
    /// as well, without a suggested level.
    pub fn record_correction(
        &self,
        suggestion_id: &str,
        chosen_level: EnergyLevel,
        context: &EnergyContext,
    ) {
        let suggested_level = lock(&self.issued).get(suggestion_id);

        tracing::info!(
            event_name = "energy.correction.recorded",
            suggestion_id,
            chosen_level = %chosen_level,
            known_suggestion = suggested_level.is_some(),
            "recorded energy correction"
        );

        lock(&self.corrections).push(EnergyCorrection {
            suggestion_id: suggestion_id.to_owned(),
            suggested_level,
            chosen_level,
            context: context.clone(),
            recorded_at: Utc::now(),
        });
    }

    pub fn corrections(&self) -> Vec<EnergyCorrection> {
        lock(&self.corrections).clone()
    }

    /// Share of corrections to known suggestions where the traveler picked a
    /// different level. `None` until such a correction exists.
    pub fn override_rate(&self) -> Option<f64> {
        let corrections = lock(&self.corrections);
        let known: Vec<&EnergyCorrection> =
            corrections.iter().filter(|correction| correction.suggested_level.is_some()).collect();

        if known.is_empty() {
            return None;
        }

        let overridden = known
            .iter()
            .filter(|correction| correction.suggested_level != Some(correction.chosen_level))
            .count();

        Some(overridden as f64 / known.len() as f64)
    }
}

fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Chill => "chill",
        Mood::Explore => "explore",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn clock_sets_default_level() {
        let advisor = EnergyAdvisor::new();

        assert_eq!(advisor.suggest(&EnergyContext::new(at(8))).level, EnergyLevel::High);
        assert_eq!(advisor.suggest(&EnergyContext::new(at(14))).level, EnergyLevel::Medium);
        assert_eq!(advisor.suggest(&EnergyContext::new(at(20))).level, EnergyLevel::Low);
        assert_eq!(advisor.suggest(&EnergyContext::new(at(2))).level, EnergyLevel::Low);
    }

    #[test]
    fn mood_overrides_clock() {
        let advisor = EnergyAdvisor::new();

        let chill = advisor.suggest(&EnergyContext::new(at(8)).with_mood(Mood::Chill));
        assert_eq!(chill.level, EnergyLevel::Low);
        assert_eq!(chill.confidence, MOOD_OVERRIDE_CONFIDENCE);
        assert_eq!(chill.reasoning.len(), 2);

        let explore = advisor.suggest(&EnergyContext::new(at(21)).with_mood(Mood::Explore));
        assert_eq!(explore.level, EnergyLevel::High);

        let agreeing = advisor.suggest(&EnergyContext::new(at(9)).with_mood(Mood::Explore));
        assert_eq!(agreeing.level, EnergyLevel::High);
        assert_eq!(agreeing.confidence, MOOD_AGREES_CONFIDENCE);
    }

    #[test]
    fn alternatives_cover_the_other_levels() {
        let suggestion = EnergyAdvisor::new().suggest(&EnergyContext::new(at(14)));
        let levels: Vec<EnergyLevel> =
            suggestion.alternatives.iter().map(|alternative| alternative.level).collect();

        assert_eq!(levels, vec![EnergyLevel::Low, EnergyLevel::High]);
        let total: f64 = suggestion.confidence
            + suggestion.alternatives.iter().map(|alternative| alternative.confidence).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn correction_does_not_touch_earlier_suggestion() {
        let advisor = EnergyAdvisor::new();
        let context = EnergyContext::new(at(8));
        let first = advisor.suggest(&context);
        let snapshot = first.clone();

        advisor.record_correction(&first.id, EnergyLevel::Low, &context);
        let second = advisor.suggest(&context);

        assert_eq!(first, snapshot);
        assert_eq!(second.level, first.level);
        assert_ne!(second.id, first.id);
    }

    #[test]
    fn unknown_ids_are_recorded_without_suggested_level() {
        let advisor = EnergyAdvisor::new();
        advisor.record_correction("missing", EnergyLevel::Medium, &EnergyContext::new(at(12)));

        let corrections = advisor.corrections();
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].suggestion_id, "missing");
        assert_eq!(corrections[0].suggested_level, None);
        assert_eq!(advisor.override_rate(), None);
    }

    #[test]
    fn override_rate_counts_changed_levels() {
        let advisor = EnergyAdvisor::new();
        let context = EnergyContext::new(at(8));

        let kept = advisor.suggest(&context);
        advisor.record_correction(&kept.id, kept.level, &context);
        let changed = advisor.suggest(&context);
        advisor.record_correction(&changed.id, EnergyLevel::Low, &context);

        assert_eq!(advisor.override_rate(), Some(0.5));
        assert_eq!(advisor.corrections().len(), 2);
    }

    #[test]
    fn oldest_suggestions_are_forgotten_past_capacity() {
        let advisor = EnergyAdvisor::with_capacity(2);
        let context = EnergyContext::new(at(8));

        let oldest = advisor.suggest(&context);
        let middle = advisor.suggest(&context);
        let newest = advisor.suggest(&context);

        advisor.record_correction(&oldest.id, EnergyLevel::Low, &context);
        advisor.record_correction(&middle.id, EnergyLevel::Low, &context);
        advisor.record_correction(&newest.id, newest.level, &context);

        let corrections = advisor.corrections();
        assert_eq!(corrections[0].suggested_level, None);
        assert_eq!(corrections[1].suggested_level, Some(EnergyLevel::High));
        assert_eq!(corrections[2].suggested_level, Some(EnergyLevel::High));
        assert_eq!(advisor.override_rate(), Some(0.5));
        assert_eq!(lock(&advisor.issued).levels.len(), 2);
    }
}
