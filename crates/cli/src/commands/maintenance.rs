use rust_decimal::Decimal;

use fleetdesk_core::registry::demo_dataset;
use serde_json::{json, Value};

use crate::commands::{failure_from, load_config, resolve_now, CommandResult};

pub fn run(as_of: Option<&str>) -> CommandResult {
    let config = match load_config("maintenance") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let now = match resolve_now("maintenance", as_of) {
        Ok(now) => now,
        Err(result) => return result,
    };
    let registry = match demo_dataset(now, &config.workflows) {
        Ok(registry) => registry,
        Err(error) => return failure_from("maintenance", error),
    };

    let today = now.date_naive();
    let mut open_total = Decimal::ZERO;
    let rows: Vec<Value> = registry
        .maintenance()
        .iter()
        .map(|request| {
            if request.is_open() {
                open_total += request.total_cost();
            }
            json!({
                "id": request.id.0,
                "asset": request.asset,
                "branch": request.branch,
                "open": request.is_open(),
                "requested_on": request.requested_on.to_string(),
                "completed_on": request.completed_on.map(|completed_on| completed_on.to_string()),
                "turnaround_days": request.turnaround_days(today),
                "total_cost": request.total_cost().to_string(),
            })
        })
        .collect();

    let message = format!("{} request(s), {open_total} open cost", rows.len());
    CommandResult::success_with_data("maintenance", message, Value::Array(rows))
}
