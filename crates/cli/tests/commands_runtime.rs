use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use layover_cli::commands::energy::{self, EnergyArgs};
use layover_cli::commands::page::{self, PageArgs};
use layover_cli::commands::recommend::{self, RecommendArgs};
use layover_cli::commands::{config, parse_timestamp};
use layover_core::config::LoadOptions;
use layover_core::{EnergyLevel, Mood};
use serde_json::Value;
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"id": "kopi", "name": "Kopi Corner", "terminal": "T1", "tags": ["coffee", "quiet"],
     "price_tier": "$", "opening_hours": "24 hours"},
    {"id": "skybar", "name": "Skyline Bar", "terminal": "T4", "tags": ["bar"],
     "price_tier": "$$$", "opening_hours": "06:00-22:00"},
    {"id": "noodles", "name": "Noodle Bar", "terminal": "T1", "tags": ["lunch", "quick"],
     "opening_hours": "10:00-21:00", "accessibility": ["wheelchair"]}
]"#;

#[test]
fn page_ranks_nearby_coffee_first_in_rush_mode() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, CATALOG);

        let result = page::run(&page_args(catalog, 20, "2024-05-14T07:30"), &LoadOptions::default());
        assert_eq!(result.exit_code, 0, "expected successful page render: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "page");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["mode"], "rush");
        assert_eq!(payload["data"]["pills"][0], "20 min left");

        let items = payload["data"]["page"]["items"].as_array().expect("page items");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["amenity"]["id"], "kopi");
        assert_eq!(items[0]["hero"], true);
        assert!(items[1..].iter().all(|item| item["hero"] == false));
    });
}

#[test]
fn page_honors_configured_page_size() {
    with_env(&[("LAYOVER_ROTATION_PAGE_SIZE", "2")], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, CATALOG);

        let mut args = page_args(catalog, 120, "2024-05-14T15:00");
        args.rotation = 1;
        let result = page::run(&args, &LoadOptions::default());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["mode"], "leisure");
        let items = payload["data"]["page"]["items"].as_array().expect("page items");
        assert_eq!(items.len(), 2, "second page wraps back to the start of the pool");
    });
}

#[test]
fn page_reports_malformed_catalog_as_input_failure() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, "{not json");

        let result = page::run(&page_args(catalog, 45, "2024-05-14T12:00"), &LoadOptions::default());
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_malformed");
    });
}

#[test]
fn page_returns_config_failure_for_invalid_settings() {
    with_env(&[("LAYOVER_ROTATION_POOL_PAGES", "0")], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, CATALOG);

        let result = page::run(&page_args(catalog, 45, "2024-05-14T12:00"), &LoadOptions::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "page");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_filters_by_query_and_terminal() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, CATALOG);

        let mut args = recommend_args(catalog, "bar", "T1");
        args.energy = Some(EnergyLevel::Low);
        let result = recommend::run(&args, &LoadOptions::default());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let recommendations =
            payload["data"]["recommendations"].as_array().expect("recommendations");
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0]["id"], "noodles");
        assert_eq!(payload["data"]["explanation"]["energy_level"], "low");
        assert_eq!(payload["data"]["journey_context"], "departure");
    });
}

#[test]
fn recommend_flags_malformed_catalog_without_failing() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, "[{\"id\": 7}]");

        let result = recommend::run(&recommend_args(catalog, "", ""), &LoadOptions::default());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["explanation"]["energy_level"], "error");
        assert_eq!(payload["data"]["recommendations"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn recommend_reports_missing_catalog_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("absent.json");

        let result = recommend::run(&recommend_args(missing, "", ""), &LoadOptions::default());
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "io");
    });
}

#[test]
fn config_reports_validation_failure_as_json() {
    with_env(&[("LAYOVER_RECOMMENDATIONS_DEPARTURE_WINDOW_MINUTES", "20000")], || {
        let result = config::run(&LoadOptions::default());
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn suggest_energy_follows_mood_and_records_choice() {
    let args = EnergyArgs {
        at: Some(parse_timestamp("2024-05-14T08:00").expect("timestamp")),
        mood: Some(Mood::Chill),
        chosen: Some(EnergyLevel::Medium),
    };

    let result = energy::run(&args);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "suggest-energy");
    assert_eq!(payload["data"]["suggestion"]["level"], "low");
    assert_eq!(payload["data"]["suggestion"]["confidence"], 0.8);
    assert_eq!(payload["data"]["overridden"], true);
}

#[test]
fn config_reports_sources_for_env_and_file_values() {
    with_env(&[("LAYOVER_LOG_LEVEL", "debug")], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("layover.toml");
        fs::write(&path, "[rotation]\npage_size = 5\n").expect("write config");

        let options = LoadOptions { config_path: Some(path.clone()), ..LoadOptions::default() };
        let result = config::run(&options);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "ok");

        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains(&format!("- rotation.page_size = 5 (source: file ({}))", path.display())));
        assert!(message.contains("- rotation.pool_pages = 3 (source: default)"));
        assert!(message.contains("- logging.level = debug (source: env (LAYOVER_LOG_LEVEL))"));
    });
}

fn page_args(catalog: PathBuf, layover_minutes: u32, at: &str) -> PageArgs {
    PageArgs {
        catalog,
        terminal: "T1".to_string(),
        layover_minutes,
        at: Some(parse_timestamp(at).expect("timestamp")),
        rotation: 0,
        price: None,
        dietary: Vec::new(),
        previous: Vec::new(),
        rushing: false,
    }
}

fn recommend_args(catalog: PathBuf, query: &str, location: &str) -> RecommendArgs {
    RecommendArgs {
        catalog,
        query: query.to_string(),
        location: location.to_string(),
        at: Some(parse_timestamp("2024-05-14T12:00").expect("timestamp")),
        tags: Vec::new(),
        price_tier: None,
        accessibility: Vec::new(),
        energy: None,
        departs_at: None,
        layovers: Vec::new(),
    }
}

fn write_catalog(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("amenities.json");
    fs::write(&path, contents).expect("write catalog");
    path
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "LAYOVER_ROTATION_PAGE_SIZE",
        "LAYOVER_ROTATION_POOL_PAGES",
        "LAYOVER_RECOMMENDATIONS_MAX_RESULTS",
        "LAYOVER_RECOMMENDATIONS_MAX_FALLBACKS",
        "LAYOVER_RECOMMENDATIONS_DEPARTURE_WINDOW_MINUTES",
        "LAYOVER_LOGGING_LEVEL",
        "LAYOVER_LOGGING_FORMAT",
        "LAYOVER_LOG_LEVEL",
        "LAYOVER_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
