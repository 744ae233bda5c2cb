//! Query-driven recommendations
//!
//! A coarser filter, score and explain pipeline used by search surfaces,
//! independent of the Smart-N carousel.

mod engine;
mod types;

pub use engine::RecommendationEngine;
pub use types::*;

/// Factor names reported in every explanation.
pub const CONSIDERED_FACTORS: [&str; 6] =
    ["query", "terminal", "vibe_tags", "price_tier", "accessibility", "opening_hours"];

pub const TAG_MATCH_POINTS: u32 = 10;
pub const PRICE_MATCH_POINTS: u32 = 5;
pub const ACCESSIBILITY_MATCH_POINTS: u32 = 3;
pub const HOURS_PRESENT_POINTS: u32 = 2;
