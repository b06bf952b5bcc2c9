use fleetdesk_core::registry::demo_dataset;
use fleetdesk_core::RecordKind;
use serde_json::{json, Value};

use crate::commands::{failure_from, load_config, resolve_now, CommandResult};

pub fn run(kind: Option<RecordKind>, as_of: Option<&str>) -> CommandResult {
    let config = match load_config("records") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let now = match resolve_now("records", as_of) {
        Ok(now) => now,
        Err(result) => return result,
    };
    let registry = match demo_dataset(now, &config.workflows) {
        Ok(registry) => registry,
        Err(error) => return failure_from("records", error),
    };
    let sla_table = match config.reminders.sla_table() {
        Ok(table) => table,
        Err(error) => return failure_from("records", error.into()),
    };

    let today = now.date_naive();
    let rows: Vec<Value> = registry
        .records()
        .iter()
        .filter(|record| kind.map_or(true, |kind| record.kind == kind))
        .map(|record| {
            let sla_badge = record
                .active_sla_days_remaining(today)
                .map(|days| sla_table.classify(days).label);
            json!({
                "id": record.id.0,
                "kind": record.kind.key(),
                "title": record.title,
                "branch": record.branch,
                "status": format!("{:?}", record.approval_status()),
                "active_role": record.active_role(),
                "sla_badge": sla_badge,
                "cost": record.cost.to_string(),
            })
        })
        .collect();

    let message = format!("{} record(s)", rows.len());
    CommandResult::success_with_data("records", message, Value::Array(rows))
}
