pub mod config;
pub mod energy;
pub mod page;
pub mod recommend;

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use layover_core::errors::ApplicationError;
use layover_core::{parse_catalog, CandidateAmenity};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::ok(command, message.into(), None)
    }

    pub fn success_with_data(command: &str, message: impl Into<String>, data: Value) -> Self {
        Self::ok(command, message.into(), Some(data))
    }

    fn ok(command: &str, message: String, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Serialize a command's data section, reporting failures the same way as
/// any other command error.
fn to_data<T: Serialize>(command: &str, data: &T) -> Result<Value, CommandResult> {
    serde_json::to_value(data).map_err(|error| {
        CommandResult::failure(command, "serialization", error.to_string(), 1)
    })
}

pub fn read_catalog_file(path: &Path) -> Result<String, ApplicationError> {
    fs::read_to_string(path).map_err(|error| ApplicationError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    })
}

pub fn load_catalog(path: &Path) -> Result<Vec<CandidateAmenity>, ApplicationError> {
    let raw = read_catalog_file(path)?;
    Ok(parse_catalog(&raw)?)
}

const TIMESTAMP_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a local airport time such as `2024-05-14T07:30`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("`{value}` is not a timestamp like 2024-05-14T07:30"))
}

pub fn now_or(at: Option<NaiveDateTime>) -> NaiveDateTime {
    at.unwrap_or_else(|| chrono::Local::now().naive_local())
}
