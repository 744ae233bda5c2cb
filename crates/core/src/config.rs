use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendations::RecommendationLimits;
use crate::smart::RotationSettings;

pub const CONFIG_FILE_NAME: &str = "layover.toml";
pub const NESTED_CONFIG_FILE: &str = "config/layover.toml";
/// One week; longer windows are not meaningful for a departure phase.
pub const MAX_DEPARTURE_WINDOW_MINUTES: i64 = 10_080;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub rotation: RotationConfig,
    pub recommendations: RecommendationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationConfig {
    pub page_size: usize,
    pub pool_pages: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationsConfig {
    pub max_results: usize,
    pub max_fallbacks: usize,
    pub departure_window_minutes: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub page_size: Option<usize>,
    pub pool_pages: Option<usize>,
    pub max_results: Option<usize>,
    pub max_fallbacks: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        let rotation = RotationSettings::default();
        let limits = RecommendationLimits::default();

        Self {
            rotation: RotationConfig {
                page_size: rotation.page_size,
                pool_pages: rotation.pool_pages,
            },
            recommendations: RecommendationsConfig {
                max_results: limits.max_results,
                max_fallbacks: limits.max_fallbacks,
                departure_window_minutes: limits.departure_window_minutes,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn rotation_settings(&self) -> RotationSettings {
        RotationSettings { page_size: self.rotation.page_size, pool_pages: self.rotation.pool_pages }
    }

    pub fn recommendation_limits(&self) -> RecommendationLimits {
        RecommendationLimits {
            max_results: self.recommendations.max_results,
            max_fallbacks: self.recommendations.max_fallbacks,
            departure_window_minutes: self.recommendations.departure_window_minutes,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(rotation) = patch.rotation {
            if let Some(page_size) = rotation.page_size {
                self.rotation.page_size = page_size;
            }
            if let Some(pool_pages) = rotation.pool_pages {
                self.rotation.pool_pages = pool_pages;
            }
        }

        if let Some(recommendations) = patch.recommendations {
            if let Some(max_results) = recommendations.max_results {
                self.recommendations.max_results = max_results;
            }
            if let Some(max_fallbacks) = recommendations.max_fallbacks {
                self.recommendations.max_fallbacks = max_fallbacks;
            }
            if let Some(window) = recommendations.departure_window_minutes {
                self.recommendations.departure_window_minutes = window;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LAYOVER_ROTATION_PAGE_SIZE") {
            self.rotation.page_size = parse_usize("LAYOVER_ROTATION_PAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("LAYOVER_ROTATION_POOL_PAGES") {
            self.rotation.pool_pages = parse_usize("LAYOVER_ROTATION_POOL_PAGES", &value)?;
        }

        if let Some(value) = read_env("LAYOVER_RECOMMENDATIONS_MAX_RESULTS") {
            self.recommendations.max_results =
                parse_usize("LAYOVER_RECOMMENDATIONS_MAX_RESULTS", &value)?;
        }
        if let Some(value) = read_env("LAYOVER_RECOMMENDATIONS_MAX_FALLBACKS") {
            self.recommendations.max_fallbacks =
                parse_usize("LAYOVER_RECOMMENDATIONS_MAX_FALLBACKS", &value)?;
        }
        if let Some(value) = read_env("LAYOVER_RECOMMENDATIONS_DEPARTURE_WINDOW_MINUTES") {
            self.recommendations.departure_window_minutes =
                parse_i64("LAYOVER_RECOMMENDATIONS_DEPARTURE_WINDOW_MINUTES", &value)?;
        }

        let log_level = read_env("LAYOVER_LOGGING_LEVEL").or_else(|| read_env("LAYOVER_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LAYOVER_LOGGING_FORMAT").or_else(|| read_env("LAYOVER_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(page_size) = overrides.page_size {
            self.rotation.page_size = page_size;
        }
        if let Some(pool_pages) = overrides.pool_pages {
            self.rotation.pool_pages = pool_pages;
        }
        if let Some(max_results) = overrides.max_results {
            self.recommendations.max_results = max_results;
        }
        if let Some(max_fallbacks) = overrides.max_fallbacks {
            self.recommendations.max_fallbacks = max_fallbacks;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rotation(&self.rotation)?;
        validate_recommendations(&self.recommendations)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that [`AppConfig::load`] would read, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_rotation(rotation: &RotationConfig) -> Result<(), ConfigError> {
    if !(1..=50).contains(&rotation.page_size) {
        return Err(ConfigError::Validation(
            "rotation.page_size must be in range 1..=50".to_string(),
        ));
    }
    if !(1..=50).contains(&rotation.pool_pages) {
        return Err(ConfigError::Validation(
            "rotation.pool_pages must be in range 1..=50".to_string(),
        ));
    }
    Ok(())
}

fn validate_recommendations(recommendations: &RecommendationsConfig) -> Result<(), ConfigError> {
    if !(1..=100).contains(&recommendations.max_results) {
        return Err(ConfigError::Validation(
            "recommendations.max_results must be in range 1..=100".to_string(),
        ));
    }
    if !(1..=100).contains(&recommendations.max_fallbacks) {
        return Err(ConfigError::Validation(
            "recommendations.max_fallbacks must be in range 1..=100".to_string(),
        ));
    }
    if !(1..=MAX_DEPARTURE_WINDOW_MINUTES).contains(&recommendations.departure_window_minutes) {
        return Err(ConfigError::Validation(format!(
            "recommendations.departure_window_minutes must be in range 1..={MAX_DEPARTURE_WINDOW_MINUTES}"
        )));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_i64(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse::<i64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    rotation: Option<RotationPatch>,
    recommendations: Option<RecommendationsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RotationPatch {
    page_size: Option<usize>,
    pool_pages: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationsPatch {
    max_results: Option<usize>,
    max_fallbacks: Option<usize>,
    departure_window_minutes: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
