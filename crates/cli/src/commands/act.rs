use fleetdesk_core::audit::{AuditContext, InMemoryAuditSink};
use fleetdesk_core::domain::workflow::ApprovalAction;
use fleetdesk_core::errors::ApplicationError;
use fleetdesk_core::registry::demo_dataset;
use fleetdesk_core::workflow::{reset_for_resubmission, ApprovalEngine};
use serde_json::json;

use crate::commands::{failure_from, load_config, resolve_now, CommandResult};

fn command_name(action: ApprovalAction) -> &'static str {
    match action {
        ApprovalAction::Approve => "approve",
        ApprovalAction::Reject => "reject",
        ApprovalAction::Revise => "revise",
    }
}

pub fn run(
    action: ApprovalAction,
    record_id: &str,
    actor: &str,
    comment: Option<&str>,
    as_of: Option<&str>,
) -> CommandResult {
    let command = command_name(action);
    let config = match load_config(command) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let now = match resolve_now(command, as_of) {
        Ok(now) => now,
        Err(result) => return result,
    };
    let mut registry = match demo_dataset(now, &config.workflows) {
        Ok(registry) => registry,
        Err(error) => return failure_from(command, error),
    };

    let Some(record) = registry.record_mut(record_id) else {
        return failure_from(command, ApplicationError::UnknownRecord(record_id.to_owned()));
    };
    let template = match config.workflows.template_for(record.kind) {
        Ok(template) => template,
        Err(error) => return failure_from(command, error.into()),
    };
    let engine = ApprovalEngine::new(template);

    let sink = InMemoryAuditSink::default();
    let audit = AuditContext::new(Some(record.id.clone()), format!("cli-{command}"), actor);
    match engine.apply_with_audit(&record.steps, action, comment, now, &sink, &audit) {
        Ok(next) => {
            record.steps = next;
            let status = record.approval_status();
            tracing::info!(
                event_name = "workflow.action_applied",
                record_id,
                action = command,
                actor,
                "workflow action recorded"
            );

            let data = json!({
                "id": record.id.0,
                "status": format!("{status:?}"),
                "active_role": record.active_role(),
                "audit_events": sink.events().len(),
            });
            let message =
                format!("{record_id}: {command} by {actor} recorded; overall status {status:?}");
            CommandResult::success_with_data(command, message, data)
        }
        Err(error) => failure_from(command, error.into()),
    }
}

pub fn resubmit(record_id: &str, as_of: Option<&str>) -> CommandResult {
    let config = match load_config("resubmit") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let now = match resolve_now("resubmit", as_of) {
        Ok(now) => now,
        Err(result) => return result,
    };
    let mut registry = match demo_dataset(now, &config.workflows) {
        Ok(registry) => registry,
        Err(error) => return failure_from("resubmit", error),
    };

    let Some(record) = registry.record_mut(record_id) else {
        return failure_from("resubmit", ApplicationError::UnknownRecord(record_id.to_owned()));
    };

    match reset_for_resubmission(&record.steps) {
        Ok(next) => {
            record.steps = next;
            let data = json!({
                "id": record.id.0,
                "status": format!("{:?}", record.approval_status()),
                "active_role": record.active_role(),
            });
            let message = format!("{record_id}: workflow reopened at the first tier");
            CommandResult::success_with_data("resubmit", message, data)
        }
        Err(error) => failure_from("resubmit", error.into()),
    }
}
