use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Price band of a catalog entry, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    #[serde(alias = "$")]
    Budget,
    #[serde(alias = "$$")]
    Moderate,
    #[serde(alias = "$$$")]
    Upscale,
    #[serde(alias = "$$$$")]
    Premium,
}

impl PriceTier {
    /// Ordinal position on the 1..=4 price scale.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Budget => 1,
            Self::Moderate => 2,
            Self::Upscale => 3,
            Self::Premium => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Moderate => "moderate",
            Self::Upscale => "upscale",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "$" | "budget" => Ok(Self::Budget),
            "$$" | "moderate" => Ok(Self::Moderate),
            "$$$" | "upscale" => Ok(Self::Upscale),
            "$$$$" | "premium" => Ok(Self::Premium),
            other => Err(format!(
                "unsupported price tier `{other}` (expected budget|moderate|upscale|premium)"
            )),
        }
    }
}

/// Read-only view of one catalog entry (shop, lounge, restaurant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAmenity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "terminal")]
    pub terminal_code: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price_tier: Option<PriceTier>,
    /// Free-text opening hours as published by the venue ("24/7", "06:00-22:00", ...).
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
}

impl CandidateAmenity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        terminal_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            terminal_code: terminal_code.into(),
            tags: Vec::new(),
            price_tier: None,
            opening_hours: String::new(),
            image: None,
            accessibility: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price_tier(mut self, tier: PriceTier) -> Self {
        self.price_tier = Some(tier);
        self
    }

    pub fn with_opening_hours(mut self, hours: impl Into<String>) -> Self {
        self.opening_hours = hours.into();
        self
    }

    pub fn with_accessibility<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accessibility = features.into_iter().map(Into::into).collect();
        self
    }

    /// True when any tag or the display name contains one of `keywords`
    /// (case-insensitive substring match).
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        let tags: Vec<String> = self.tags.iter().map(|tag| tag.to_lowercase()).collect();

        keywords.iter().any(|keyword| {
            name.contains(keyword) || tags.iter().any(|tag| tag.contains(keyword))
        })
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|candidate| candidate.trim().eq_ignore_ascii_case(tag))
    }
}
