use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use layover_core::config::{AppConfig, LoadOptions};
use layover_core::errors::ApplicationError;
use layover_core::recommendations::{Journey, Preferences};
use layover_core::{EnergyLevel, PriceTier, RecommendationContext, RecommendationEngine};

use crate::commands::{now_or, parse_timestamp, read_catalog_file, to_data, CommandResult};

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Path to a JSON amenity catalog")]
    pub catalog: PathBuf,
    #[arg(long, default_value = "", help = "Name fragment to search for")]
    pub query: String,
    #[arg(long, default_value = "", help = "Terminal to search in (empty searches all)")]
    pub location: String,
    #[arg(long, value_parser = parse_timestamp, help = "Local airport time (default: now)")]
    pub at: Option<NaiveDateTime>,
    #[arg(long = "tag", help = "Preferred vibe tag (repeatable)")]
    pub tags: Vec<String>,
    #[arg(long = "price-tier", help = "Preferred price tier: budget|moderate|upscale|premium")]
    pub price_tier: Option<PriceTier>,
    #[arg(long = "accessibility", help = "Required accessibility feature (repeatable)")]
    pub accessibility: Vec<String>,
    #[arg(long, help = "Energy level to report: low|medium|high")]
    pub energy: Option<EnergyLevel>,
    #[arg(long = "departs-at", value_parser = parse_timestamp, help = "Scheduled departure")]
    pub departs_at: Option<NaiveDateTime>,
    #[arg(long = "layover", help = "Layover airport on the itinerary (repeatable)")]
    pub layovers: Vec<String>,
}

pub fn run(args: &RecommendArgs, options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let raw_catalog = match read_catalog_file(&args.catalog) {
        Ok(raw) => raw,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let mut context = RecommendationContext::new(&args.location, now_or(args.at))
        .with_preferences(Preferences {
            vibe_tags: args.tags.clone(),
            price_tier: args.price_tier,
            accessibility: args.accessibility.clone(),
        });
    if let Some(departs_at) = args.departs_at {
        context = context.with_journey(Journey { departs_at, layovers: args.layovers.clone() });
    }
    if let Some(level) = args.energy {
        context = context.with_energy_level(level);
    }

    let engine = RecommendationEngine::with_limits(config.recommendation_limits());
    let result = engine.recommend_json(&args.query, &context, &raw_catalog);
    let message = result
        .explanation
        .reasoning
        .first()
        .cloned()
        .unwrap_or_else(|| "no recommendations".to_string());

    match to_data(COMMAND, &result) {
        Ok(data) => CommandResult::success_with_data(COMMAND, message, data),
        Err(failure) => failure,
    }
}
