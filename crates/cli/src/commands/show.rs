use fleetdesk_core::errors::ApplicationError;
use fleetdesk_core::registry::demo_dataset;
use serde_json::{json, Value};

use crate::commands::{failure_from, load_config, resolve_now, CommandResult};

pub fn run(record_id: &str, as_of: Option<&str>) -> CommandResult {
    let config = match load_config("show") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let now = match resolve_now("show", as_of) {
        Ok(now) => now,
        Err(result) => return result,
    };
    let registry = match demo_dataset(now, &config.workflows) {
        Ok(registry) => registry,
        Err(error) => return failure_from("show", error),
    };

    let Some(record) = registry.record(record_id) else {
        return failure_from("show", ApplicationError::UnknownRecord(record_id.to_owned()));
    };

    let steps: Vec<Value> = record
        .steps
        .iter()
        .map(|step| {
            json!({
                "level": step.level,
                "role": step.role,
                "sla_days": step.sla_days,
                "status": format!("{:?}", step.status),
                "decided_at": step.decided_at.map(|decided_at| decided_at.to_rfc3339()),
                "approver": step.approver,
                "comment": step.comment,
            })
        })
        .collect();

    let data = json!({
        "id": record.id.0,
        "kind": record.kind.key(),
        "title": record.title,
        "branch": record.branch,
        "requested_by": record.requested_by,
        "cost": record.cost.to_string(),
        "submitted_at": record.submitted_at.to_rfc3339(),
        "status": format!("{:?}", record.approval_status()),
        "active_role": record.active_role(),
        "steps": steps,
    });

    let message = format!("{record_id}: {:?}", record.approval_status());
    CommandResult::success_with_data("show", message, data)
}
