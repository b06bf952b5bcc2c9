use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::workflow::{ApprovalStatus, WorkflowStep};
use crate::workflow::engine::{active_step, overall_status};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    VehicleRequest,
    BuildingAsset,
    SalesAuction,
    BranchImprovement,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::VehicleRequest,
        RecordKind::BuildingAsset,
        RecordKind::SalesAuction,
        RecordKind::BranchImprovement,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::VehicleRequest => "vehicle_request",
            Self::BuildingAsset => "building_asset",
            Self::SalesAuction => "sales_auction",
            Self::BranchImprovement => "branch_improvement",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown record kind `{0}` (expected vehicle_request|building_asset|sales_auction|branch_improvement)")]
pub struct UnknownRecordKind(pub String);

impl std::str::FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vehicle_request" => Ok(Self::VehicleRequest),
            "building_asset" => Ok(Self::BuildingAsset),
            "sales_auction" => Ok(Self::SalesAuction),
            "branch_improvement" => Ok(Self::BranchImprovement),
            other => Err(UnknownRecordKind(other.to_owned())),
        }
    }
}

/// A workflow-bearing console record: vehicle request, building-asset
/// proposal, sales auction, or branch-improvement proposal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub title: String,
    pub branch: String,
    pub requested_by: String,
    pub cost: Decimal,
    pub submitted_at: DateTime<Utc>,
    pub steps: Vec<WorkflowStep>,
}

impl AssetRecord {
    pub fn approval_status(&self) -> ApprovalStatus {
        overall_status(&self.steps)
    }

    /// Role waiting to act. Rejected and Revised workflows keep their later
    /// Pending steps for display, but nothing is waiting on them.
    pub fn active_role(&self) -> Option<&str> {
        match self.approval_status() {
            ApprovalStatus::Draft | ApprovalStatus::PendingApproval => {
                active_step(&self.steps).map(|step| step.role.as_str())
            }
            _ => None,
        }
    }

    /// Days the active tier has left inside its SLA, negative once overdue.
    /// `None` when nothing is waiting to act.
    pub fn active_sla_days_remaining(&self, today: NaiveDate) -> Option<i64> {
        if self.active_role().is_none() {
            return None;
        }
        let step = active_step(&self.steps)?;
        let waited = (today - self.submitted_at.date_naive()).num_days();
        Some(i64::from(step.sla_days) - waited)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceLine {
    pub description: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: RecordId,
    pub asset: String,
    pub branch: String,
    pub requested_on: NaiveDate,
    pub completed_on: Option<NaiveDate>,
    pub lines: Vec<MaintenanceLine>,
}

impl MaintenanceRequest {
    pub fn total_cost(&self) -> Decimal {
        self.lines.iter().map(|line| line.unit_cost * Decimal::from(line.quantity)).sum()
    }

    /// Days from request to completion, or to `today` while still open.
    pub fn turnaround_days(&self, today: NaiveDate) -> i64 {
        let end = self.completed_on.unwrap_or(today);
        (end - self.requested_on).num_days()
    }

    pub fn is_open(&self) -> bool {
        self.completed_on.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDocument {
    pub id: RecordId,
    pub name: String,
    pub branch: String,
    pub expiry_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::domain::workflow::{ApprovalStatus, StepStatus, WorkflowStep};

    use super::{AssetRecord, MaintenanceLine, MaintenanceRequest, RecordId, RecordKind};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn step(level: u32, role: &str, status: StepStatus) -> WorkflowStep {
        WorkflowStep {
            level,
            role: role.to_string(),
            sla_days: 3,
            status,
            decided_at: None,
            approver: None,
            comment: None,
        }
    }

    fn record(steps: Vec<WorkflowStep>) -> AssetRecord {
        AssetRecord {
            id: RecordId("REC-V-1001".to_string()),
            kind: RecordKind::VehicleRequest,
            title: "Replacement pickup".to_string(),
            branch: "Riverside".to_string(),
            requested_by: "d.okafor".to_string(),
            cost: Decimal::new(38_500_00, 2),
            submitted_at: Utc.with_ymd_and_hms(2026, 7, 30, 8, 0, 0).unwrap(),
            steps,
        }
    }

    #[test]
    fn record_status_and_active_role_derive_from_steps() {
        let record = record(vec![
            step(1, "Branch Manager", StepStatus::Approved),
            step(2, "Regional Manager", StepStatus::Pending),
        ]);

        assert_eq!(record.approval_status(), ApprovalStatus::PendingApproval);
        assert_eq!(record.active_role(), Some("Regional Manager"));
    }

    #[test]
    fn sla_days_remaining_counts_down_from_submission() {
        let record = record(vec![step(1, "Branch Manager", StepStatus::Pending)]);

        assert_eq!(record.active_sla_days_remaining(date(2026, 7, 31)), Some(2));
        assert_eq!(record.active_sla_days_remaining(date(2026, 8, 4)), Some(-2));

        let mut resolved = record.clone();
        for step in &mut resolved.steps {
            step.status = StepStatus::Approved;
        }
        assert_eq!(resolved.active_sla_days_remaining(date(2026, 7, 31)), None);
    }

    #[test]
    fn maintenance_total_cost_sums_quantity_times_unit_cost() {
        let request = MaintenanceRequest {
            id: RecordId("MNT-5001".to_string()),
            asset: "Forklift FL-3".to_string(),
            branch: "Harbor".to_string(),
            requested_on: date(2026, 7, 20),
            completed_on: None,
            lines: vec![
                MaintenanceLine {
                    description: "Hydraulic hose".to_string(),
                    quantity: 2,
                    unit_cost: Decimal::new(145_00, 2),
                },
                MaintenanceLine {
                    description: "Labor (hours)".to_string(),
                    quantity: 3,
                    unit_cost: Decimal::new(85_50, 2),
                },
            ],
        };

        assert_eq!(request.total_cost(), Decimal::new(546_50, 2));
    }

    #[test]
    fn turnaround_uses_completion_when_present_and_today_otherwise() {
        let mut request = MaintenanceRequest {
            id: RecordId("MNT-5002".to_string()),
            asset: "HVAC unit".to_string(),
            branch: "Central".to_string(),
            requested_on: date(2026, 7, 1),
            completed_on: Some(date(2026, 7, 5)),
            lines: Vec::new(),
        };

        assert_eq!(request.turnaround_days(date(2026, 8, 1)), 4);
        assert!(!request.is_open());

        request.completed_on = None;
        assert_eq!(request.turnaround_days(date(2026, 7, 11)), 10);
        assert!(request.is_open());
    }

    #[test]
    fn record_kind_round_trips_through_its_key() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.key().parse::<RecordKind>(), Ok(kind));
        }
        assert!("fleet_vehicle".parse::<RecordKind>().is_err());
    }
}
