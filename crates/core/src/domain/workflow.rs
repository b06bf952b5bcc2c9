use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverKind {
    Role,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTier {
    pub level: u32,
    pub approver_kind: ApproverKind,
    pub approver: String,
    pub sla_days: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Pending,
    Approved,
    Rejected,
    Revised,
    Skipped,
}

/// Execution record of one tier against one business record. Ordering is
/// carried by `level`, never by position in the containing list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub level: u32,
    pub role: String,
    pub sla_days: u32,
    pub status: StepStatus,
    pub decided_at: Option<DateTime<Utc>>,
    pub approver: Option<String>,
    pub comment: Option<String>,
}

impl WorkflowStep {
    pub fn pending(tier: &ApprovalTier) -> Self {
        Self {
            level: tier.level,
            role: tier.approver.clone(),
            sla_days: tier.sla_days,
            status: StepStatus::Pending,
            decided_at: None,
            approver: None,
            comment: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Revised,
}

impl ApprovalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalAction {
    Approve,
    Reject,
    Revise,
}

impl ApprovalAction {
    pub fn step_status(self) -> StepStatus {
        match self {
            Self::Approve => StepStatus::Approved,
            Self::Reject => StepStatus::Rejected,
            Self::Revise => StepStatus::Revised,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApprovalAction, ApprovalTier, ApproverKind, StepStatus, WorkflowStep};

    #[test]
    fn pending_step_copies_tier_fields_and_has_no_decision() {
        let tier = ApprovalTier {
            level: 2,
            approver_kind: ApproverKind::Role,
            approver: "Regional Manager".to_string(),
            sla_days: 3,
        };

        let step = WorkflowStep::pending(&tier);
        assert_eq!(step.level, 2);
        assert_eq!(step.role, "Regional Manager");
        assert_eq!(step.sla_days, 3);
        assert!(step.is_pending());
        assert!(step.decided_at.is_none());
        assert!(step.approver.is_none());
        assert!(step.comment.is_none());
    }

    #[test]
    fn actions_map_to_their_step_statuses() {
        assert_eq!(ApprovalAction::Approve.step_status(), StepStatus::Approved);
        assert_eq!(ApprovalAction::Reject.step_status(), StepStatus::Rejected);
        assert_eq!(ApprovalAction::Revise.step_status(), StepStatus::Revised);
    }

    #[test]
    fn steps_serialize_for_console_payloads() {
        let tier = ApprovalTier {
            level: 1,
            approver_kind: ApproverKind::User,
            approver: "company.owner".to_string(),
            sla_days: 7,
        };

        let json = serde_json::to_value(WorkflowStep::pending(&tier)).expect("step serializes");
        assert_eq!(json["level"], 1);
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["decided_at"], serde_json::Value::Null);
    }
}
