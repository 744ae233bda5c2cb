pub mod catalog;
pub mod config;
pub mod domain;
pub mod energy;
pub mod errors;
pub mod recommendations;
pub mod smart;

pub use catalog::parse_catalog;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::amenity::{CandidateAmenity, PriceTier};
pub use domain::context::{PricePreference, TravelerContext};
pub use domain::energy::EnergyLevel;
pub use energy::{EnergyAdvisor, EnergyContext, EnergyCorrection, EnergySuggestion, Mood};
pub use errors::{ApplicationError, CatalogError};
pub use recommendations::{
    Explanation, JourneyPhase, RecommendationContext, RecommendationEngine, RecommendationResult,
};
pub use smart::{Mode, RotationPage, RotationSettings, ScoredAmenity, SmartEngine};
