use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::workflow::{ApprovalAction, ApprovalStatus, StepStatus, WorkflowStep};
use crate::workflow::template::{TierSetError, WorkflowTemplate};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot apply {action:?}: workflow already resolved as {status:?}")]
    InvalidTransition { action: ApprovalAction, status: ApprovalStatus },
    #[error("resubmission requires a revised workflow, found {status:?}")]
    NotRevised { status: ApprovalStatus },
    #[error(transparent)]
    MalformedTierSet(#[from] TierSetError),
}

/// First step, in ascending tier order, still Pending. `None` means the
/// workflow is resolved. Tolerates unsorted input.
pub fn active_step(steps: &[WorkflowStep]) -> Option<&WorkflowStep> {
    steps.iter().filter(|step| step.is_pending()).min_by_key(|step| step.level)
}

/// Applies one approval action to the active step and returns the new step
/// list. The input list is never mutated.
///
/// A Rejected or Revised workflow still carries inert Pending steps for
/// display, so terminality is judged on the overall status, not on whether
/// a Pending step remains.
pub fn apply_action(
    steps: &[WorkflowStep],
    action: ApprovalAction,
    actor: &str,
    comment: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<WorkflowStep>, WorkflowError> {
    let status = overall_status(steps);
    if !matches!(status, ApprovalStatus::Draft | ApprovalStatus::PendingApproval) {
        return Err(WorkflowError::InvalidTransition { action, status });
    }
    let Some(active) = active_step(steps) else {
        return Err(WorkflowError::InvalidTransition { action, status });
    };
    let active_level = active.level;

    let mut next = steps.to_vec();
    for step in &mut next {
        if step.level == active_level && step.is_pending() {
            step.status = action.step_status();
            step.decided_at = Some(now);
            step.approver = Some(actor.to_owned());
            step.comment = comment.map(str::to_owned);
            break;
        }
    }

    Ok(next)
}

/// Record-level status from the step aggregate. Precedence, most severe
/// first: Rejected, Revised, Approved (all tiers), Draft (untouched),
/// PendingApproval.
pub fn overall_status(steps: &[WorkflowStep]) -> ApprovalStatus {
    if steps.iter().any(|step| step.status == StepStatus::Rejected) {
        return ApprovalStatus::Rejected;
    }
    if steps.iter().any(|step| step.status == StepStatus::Revised) {
        return ApprovalStatus::Revised;
    }

    let resolved = steps
        .iter()
        .all(|step| matches!(step.status, StepStatus::Approved | StepStatus::Skipped));
    if resolved && steps.iter().any(|step| step.status == StepStatus::Approved) {
        return ApprovalStatus::Approved;
    }

    if steps.iter().all(|step| step.is_pending()) {
        return ApprovalStatus::Draft;
    }

    ApprovalStatus::PendingApproval
}

/// Revise policy: full restart. Every step returns to Pending with its
/// decision fields cleared, so the resubmitted record re-runs from the
/// lowest tier. Refuses to reset a workflow that is not Revised.
pub fn reset_for_resubmission(steps: &[WorkflowStep]) -> Result<Vec<WorkflowStep>, WorkflowError> {
    let status = overall_status(steps);
    if status != ApprovalStatus::Revised {
        return Err(WorkflowError::NotRevised { status });
    }

    Ok(steps
        .iter()
        .map(|step| WorkflowStep {
            status: StepStatus::Pending,
            decided_at: None,
            approver: None,
            comment: None,
            ..step.clone()
        })
        .collect())
}

/// Binds a validated template to the step-list operations and emits audit
/// events around each action.
#[derive(Clone, Debug)]
pub struct ApprovalEngine {
    template: WorkflowTemplate,
}

impl ApprovalEngine {
    pub fn new(template: WorkflowTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &WorkflowTemplate {
        &self.template
    }

    pub fn start(&self) -> Vec<WorkflowStep> {
        self.template.instantiate()
    }

    pub fn apply(
        &self,
        steps: &[WorkflowStep],
        action: ApprovalAction,
        actor: &str,
        comment: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<WorkflowStep>, WorkflowError> {
        apply_action(steps, action, actor, comment, now)
    }

    pub fn apply_with_audit<S>(
        &self,
        steps: &[WorkflowStep],
        action: ApprovalAction,
        comment: Option<&str>,
        now: DateTime<Utc>,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<Vec<WorkflowStep>, WorkflowError>
    where
        S: AuditSink,
    {
        let acted_level = active_step(steps).map(|step| step.level);
        let result = apply_action(steps, action, &audit.actor, comment, now);
        match &result {
            Ok(next) => {
                let mut event = AuditEvent::new(
                    audit.record_id.clone(),
                    audit.correlation_id.clone(),
                    "workflow.action_applied",
                    AuditCategory::Workflow,
                    audit.actor.clone(),
                    AuditOutcome::Success,
                )
                .with_metadata("workflow", self.template.name())
                .with_metadata("action", format!("{action:?}"))
                .with_metadata("overall", format!("{:?}", overall_status(next)));
                if let Some(level) = acted_level {
                    event = event.with_metadata("level", level.to_string());
                }
                sink.emit(event);
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit.record_id.clone(),
                        audit.correlation_id.clone(),
                        "workflow.action_rejected",
                        AuditCategory::Workflow,
                        audit.actor.clone(),
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("workflow", self.template.name())
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}
