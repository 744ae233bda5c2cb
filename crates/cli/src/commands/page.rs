use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use layover_core::config::{AppConfig, LoadOptions};
use layover_core::errors::ApplicationError;
use layover_core::smart::{Mode, RotationPage, WeightProfile};
use layover_core::{PricePreference, SmartEngine, TravelerContext};
use serde::Serialize;

use crate::commands::{load_catalog, now_or, parse_timestamp, to_data, CommandResult};

const COMMAND: &str = "page";

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    #[arg(long, help = "Path to a JSON amenity catalog")]
    pub catalog: PathBuf,
    #[arg(long, help = "Terminal the traveler is in, e.g. T1")]
    pub terminal: String,
    #[arg(long = "layover-minutes", help = "Free minutes before boarding")]
    pub layover_minutes: u32,
    #[arg(long, value_parser = parse_timestamp, help = "Local airport time (default: now)")]
    pub at: Option<NaiveDateTime>,
    #[arg(long, default_value_t = 0, help = "Carousel page to render")]
    pub rotation: usize,
    #[arg(long, help = "Price preference: budget|moderate|premium")]
    pub price: Option<PricePreference>,
    #[arg(long = "dietary", help = "Dietary tag to favor (repeatable)")]
    pub dietary: Vec<String>,
    #[arg(long = "previous", help = "Amenity id chosen earlier (repeatable)")]
    pub previous: Vec<String>,
    #[arg(long, help = "Traveler flagged themselves as rushing")]
    pub rushing: bool,
}

#[derive(Debug, Serialize)]
struct PageView {
    mode: Mode,
    weights: WeightProfile,
    pills: Vec<String>,
    hints: &'static [&'static str],
    page: RotationPage,
}

pub fn run(args: &PageArgs, options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let mut context = TravelerContext::new(&args.terminal, args.layover_minutes, now_or(args.at))
        .with_dietary_preferences(args.dietary.clone())
        .with_previous_choices(args.previous.clone())
        .rushing(args.rushing);
    if let Some(price) = args.price {
        context = context.with_price_preference(price);
    }

    let engine = SmartEngine::new(context).with_rotation(config.rotation_settings());
    let page = engine.get_page(&catalog, args.rotation);
    let message = format!(
        "{} of {} amenities on page {} ({})",
        page.len(),
        catalog.len(),
        args.rotation,
        engine.get_mode().label()
    );

    let view = PageView {
        mode: engine.get_mode(),
        weights: engine.get_weights(),
        pills: engine.get_context_pills(),
        hints: engine.get_mode_recommendations(),
        page,
    };

    match to_data(COMMAND, &view) {
        Ok(data) => CommandResult::success_with_data(COMMAND, message, data),
        Err(failure) => failure,
    }
}
