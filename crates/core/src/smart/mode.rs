//! Operating modes chosen from the traveler's remaining free time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Layovers shorter than this many minutes run in [`Mode::Rush`].
pub const RUSH_THRESHOLD_MINUTES: u32 = 30;
/// Layovers of at least this many minutes run in [`Mode::Leisure`].
pub const LEISURE_THRESHOLD_MINUTES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Rush,
    Explorer,
    Leisure,
}

/// Per-factor weights of a mode. Weights are whole percentages and sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub proximity: u32,
    pub availability: u32,
    pub temporal: u32,
    pub popularity: u32,
    pub personalization: u32,
}

impl WeightProfile {
    pub fn total(&self) -> u32 {
        self.proximity + self.availability + self.temporal + self.popularity + self.personalization
    }
}

const RUSH_WEIGHTS: WeightProfile =
    WeightProfile { proximity: 50, availability: 30, temporal: 10, popularity: 10, personalization: 0 };

const EXPLORER_WEIGHTS: WeightProfile =
    WeightProfile { proximity: 30, availability: 20, temporal: 15, popularity: 25, personalization: 10 };

const LEISURE_WEIGHTS: WeightProfile =
    WeightProfile { proximity: 20, availability: 10, temporal: 15, popularity: 30, personalization: 25 };

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Rush, Mode::Explorer, Mode::Leisure];

    pub fn weights(self) -> WeightProfile {
        match self {
            Self::Rush => RUSH_WEIGHTS,
            Self::Explorer => EXPLORER_WEIGHTS,
            Self::Leisure => LEISURE_WEIGHTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rush => "Rush mode",
            Self::Explorer => "Explorer mode",
            Self::Leisure => "Leisure mode",
        }
    }

    /// Fixed hints shown next to the carousel for this mode.
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            Self::Rush => &[
                "Stick to spots within a few minutes of your gate",
                "Grab-and-go food and coffee are your best bet",
                "Skip sit-down dining and long queues",
            ],
            Self::Explorer => &[
                "You have time for one proper stop nearby",
                "Try a local favourite on the way to your gate",
                "Keep an eye on the walk back to boarding",
            ],
            Self::Leisure => &[
                "Settle into a lounge or a sit-down meal",
                "Explore popular spots in other terminals",
                "Treat yourself to something you have not tried yet",
            ],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rush => "rush",
            Self::Explorer => "explorer",
            Self::Leisure => "leisure",
        };
        f.write_str(name)
    }
}

pub fn select_mode(layover_minutes: u32) -> Mode {
    if layover_minutes < RUSH_THRESHOLD_MINUTES {
        Mode::Rush
    } else if layover_minutes < LEISURE_THRESHOLD_MINUTES {
        Mode::Explorer
    } else {
        Mode::Leisure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_sums_to_one_hundred() {
        for mode in Mode::ALL {
            assert_eq!(mode.weights().total(), 100, "{mode} weights must sum to 100");
        }
    }

    #[test]
    fn selects_mode_from_layover() {
        assert_eq!(select_mode(15), Mode::Rush);
        assert_eq!(select_mode(60), Mode::Explorer);
        assert_eq!(select_mode(120), Mode::Leisure);
    }

    #[test]
    fn thresholds_are_inclusive_on_the_upper_mode() {
        assert_eq!(select_mode(0), Mode::Rush);
        assert_eq!(select_mode(29), Mode::Rush);
        assert_eq!(select_mode(30), Mode::Explorer);
        assert_eq!(select_mode(89), Mode::Explorer);
        assert_eq!(select_mode(90), Mode::Leisure);
    }

    #[test]
    fn rush_ignores_personalization() {
        assert_eq!(Mode::Rush.weights().personalization, 0);
        assert_eq!(Mode::Rush.weights().proximity, 50);
    }
}
