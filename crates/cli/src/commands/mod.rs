pub mod act;
pub mod config;
pub mod maintenance;
pub mod records;
pub mod reminders;
pub mod show;

use chrono::{DateTime, NaiveTime, Utc};
use fleetdesk_core::config::{AppConfig, LoadOptions};
use fleetdesk_core::errors::ApplicationError;
use fleetdesk_core::reminders::parse_iso_date;
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
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn success_with_data(command: &str, message: impl Into<String>, data: Value) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
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
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

fn exit_code_for(error: &ApplicationError) -> u8 {
    match error.error_class() {
        "config_validation" => 2,
        "unknown_record" => 3,
        _ => 4,
    }
}

pub(crate) fn failure_from(command: &str, error: ApplicationError) -> CommandResult {
    let exit_code = exit_code_for(&error);
    CommandResult::failure(command, error.error_class(), error.to_string(), exit_code)
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

/// `--as-of` pins the console clock to midnight UTC of the given date so
/// derived statuses are reproducible; without it the real clock is used.
pub(crate) fn resolve_now(
    command: &str,
    as_of: Option<&str>,
) -> Result<DateTime<Utc>, CommandResult> {
    match as_of {
        None => Ok(Utc::now()),
        Some(raw) => parse_iso_date(raw)
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .map_err(|error| {
                CommandResult::failure(command, "reminder_input", error.to_string(), 4)
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_now, CommandResult};

    #[test]
    fn failure_payload_carries_error_class_and_exit_code() {
        let result = CommandResult::failure("records", "config_validation", "bad config", 2);
        assert_eq!(result.exit_code, 2);

        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("payload is JSON");
        assert_eq!(payload["command"], "records");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    }

    #[test]
    fn as_of_pins_the_clock_to_midnight_utc() {
        let now = resolve_now("records", Some("2026-08-01")).expect("valid date");
        assert_eq!(now.to_rfc3339(), "2026-08-01T00:00:00+00:00");

        let error = resolve_now("records", Some("tomorrow")).expect_err("invalid date fails");
        assert_eq!(error.exit_code, 4);
    }
}
