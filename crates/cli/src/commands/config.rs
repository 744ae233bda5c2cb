use std::env;
use std::fs;
use std::path::Path;

use layover_core::config::{resolve_config_path, AppConfig, LoadOptions};
use layover_core::errors::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "rotation.page_size",
        &config.rotation.page_size.to_string(),
        source("rotation.page_size", &["LAYOVER_ROTATION_PAGE_SIZE"]),
    ));
    lines.push(render_line(
        "rotation.pool_pages",
        &config.rotation.pool_pages.to_string(),
        source("rotation.pool_pages", &["LAYOVER_ROTATION_POOL_PAGES"]),
    ));
    lines.push(render_line(
        "recommendations.max_results",
        &config.recommendations.max_results.to_string(),
        source("recommendations.max_results", &["LAYOVER_RECOMMENDATIONS_MAX_RESULTS"]),
    ));
    lines.push(render_line(
        "recommendations.max_fallbacks",
        &config.recommendations.max_fallbacks.to_string(),
        source("recommendations.max_fallbacks", &["LAYOVER_RECOMMENDATIONS_MAX_FALLBACKS"]),
    ));
    lines.push(render_line(
        "recommendations.departure_window_minutes",
        &config.recommendations.departure_window_minutes.to_string(),
        source(
            "recommendations.departure_window_minutes",
            &["LAYOVER_RECOMMENDATIONS_DEPARTURE_WINDOW_MINUTES"],
        ),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["LAYOVER_LOGGING_LEVEL", "LAYOVER_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["LAYOVER_LOGGING_FORMAT", "LAYOVER_LOG_FORMAT"]),
    ));

    CommandResult::success("config", lines.join("\n"))
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
