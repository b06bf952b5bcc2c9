use fleetdesk_core::registry::demo_dataset;
use fleetdesk_core::reminders::{days_until, ReminderSeverity};
use serde_json::{json, Value};
use thiserror::Error;

use crate::commands::{failure_from, load_config, resolve_now, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderProfile {
    Legal,
    Sla,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown reminder profile `{0}` (expected legal|sla)")]
pub struct UnknownProfile(String);

impl std::str::FromStr for ReminderProfile {
    type Err = UnknownProfile;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legal" => Ok(Self::Legal),
            "sla" => Ok(Self::Sla),
            other => Err(UnknownProfile(other.to_owned())),
        }
    }
}

pub fn run(profile: Option<ReminderProfile>, as_of: Option<&str>) -> CommandResult {
    let config = match load_config("reminders") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let now = match resolve_now("reminders", as_of) {
        Ok(now) => now,
        Err(result) => return result,
    };
    let registry = match demo_dataset(now, &config.workflows) {
        Ok(registry) => registry,
        Err(error) => return failure_from("reminders", error),
    };

    let profile = profile.unwrap_or(ReminderProfile::Legal);
    let table = match profile {
        ReminderProfile::Legal => config.reminders.legal_table(),
        ReminderProfile::Sla => config.reminders.sla_table(),
    };
    let table = match table {
        Ok(table) => table,
        Err(error) => return failure_from("reminders", error.into()),
    };

    let today = now.date_naive();
    let mut urgent = 0usize;
    let rows: Vec<Value> = registry
        .documents()
        .iter()
        .map(|document| {
            let classification = table.classify(days_until(document.expiry_date, today));
            if classification.severity_rank() >= ReminderSeverity::Critical.rank() {
                urgent += 1;
            }
            json!({
                "id": document.id.0,
                "name": document.name,
                "branch": document.branch,
                "expiry_date": document.expiry_date.to_string(),
                "days_remaining": classification.days_remaining,
                "label": classification.label,
                "severity": format!("{:?}", classification.severity),
            })
        })
        .collect();

    let message = format!("{} document(s), {urgent} needing immediate attention", rows.len());
    CommandResult::success_with_data("reminders", message, Value::Array(rows))
}
