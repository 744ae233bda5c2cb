use chrono::NaiveDateTime;
use clap::Args;
use layover_core::energy::EnergySuggestion;
use layover_core::{EnergyAdvisor, EnergyContext, EnergyLevel, Mood};
use serde::Serialize;

use crate::commands::{now_or, parse_timestamp, to_data, CommandResult};

const COMMAND: &str = "suggest-energy";

#[derive(Debug, Clone, Args)]
pub struct EnergyArgs {
    #[arg(long, value_parser = parse_timestamp, help = "Local time (default: now)")]
    pub at: Option<NaiveDateTime>,
    #[arg(long, help = "Current mood: chill|explore")]
    pub mood: Option<Mood>,
    #[arg(long, help = "Level the traveler picked, recorded as a correction")]
    pub chosen: Option<EnergyLevel>,
}

#[derive(Debug, Serialize)]
struct EnergyView {
    suggestion: EnergySuggestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    chosen: Option<EnergyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overridden: Option<bool>,
}

pub fn run(args: &EnergyArgs) -> CommandResult {
    let advisor = EnergyAdvisor::new();
    let mut context = EnergyContext::new(now_or(args.at));
    if let Some(mood) = args.mood {
        context = context.with_mood(mood);
    }

    let suggestion = advisor.suggest(&context);
    let mut message = format!(
        "suggested {} energy ({:.0}% confidence)",
        suggestion.level,
        suggestion.confidence * 100.0
    );

    let overridden = args.chosen.map(|chosen| {
        advisor.record_correction(&suggestion.id, chosen, &context);
        message.push_str(&format!("; recorded choice {chosen}"));
        chosen != suggestion.level
    });

    let view = EnergyView { suggestion, chosen: args.chosen, overridden };
    match to_data(COMMAND, &view) {
        Ok(data) => CommandResult::success_with_data(COMMAND, message, data),
        Err(failure) => failure,
    }
}
