use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::config::WorkflowsConfig;
use crate::domain::record::{
    AssetRecord, LegalDocument, MaintenanceLine, MaintenanceRequest, RecordId, RecordKind,
};
use crate::domain::workflow::ApprovalAction;
use crate::errors::ApplicationError;
use crate::workflow::apply_action;

/// The console's backing store: plain in-memory collections, rebuilt on
/// every run. Persistence is an explicit non-goal.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistry {
    records: Vec<AssetRecord>,
    maintenance: Vec<MaintenanceRequest>,
    documents: Vec<LegalDocument>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_record(&mut self, record: AssetRecord) {
        self.records.push(record);
    }

    pub fn insert_maintenance(&mut self, request: MaintenanceRequest) {
        self.maintenance.push(request);
    }

    pub fn insert_document(&mut self, document: LegalDocument) {
        self.documents.push(document);
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|record| record.id.0 == id)
    }

    pub fn record_mut(&mut self, id: &str) -> Option<&mut AssetRecord> {
        self.records.iter_mut().find(|record| record.id.0 == id)
    }

    pub fn maintenance(&self) -> &[MaintenanceRequest] {
        &self.maintenance
    }

    pub fn documents(&self) -> &[LegalDocument] {
        &self.documents
    }
}

/// Deterministic console fixtures keyed off the supplied clock: one record
/// per kind at a different point of the approval lifecycle, maintenance in
/// both open and completed states, and a legal document in every reminder
/// bucket of the fine table.
pub fn demo_dataset(
    now: DateTime<Utc>,
    workflows: &WorkflowsConfig,
) -> Result<InMemoryRegistry, ApplicationError> {
    let mut registry = InMemoryRegistry::new();
    let today = now.date_naive();

    let vehicle = workflows.template_for(RecordKind::VehicleRequest)?;
    let steps = vehicle.instantiate();
    let steps = apply_action(
        &steps,
        ApprovalAction::Approve,
        "b.tan",
        Some("Quotes attached, within branch budget"),
        now - Duration::days(5),
    )?;
    registry.insert_record(AssetRecord {
        id: RecordId("REC-V-1001".to_string()),
        kind: RecordKind::VehicleRequest,
        title: "Replacement pickup for Riverside deliveries".to_string(),
        branch: "Riverside".to_string(),
        requested_by: "d.okafor".to_string(),
        cost: Decimal::new(38_500_00, 2),
        submitted_at: now - Duration::days(6),
        steps,
    });

    let building = workflows.template_for(RecordKind::BuildingAsset)?;
    registry.insert_record(AssetRecord {
        id: RecordId("REC-B-2001".to_string()),
        kind: RecordKind::BuildingAsset,
        title: "Rooftop HVAC overhaul, Central office".to_string(),
        branch: "Central".to_string(),
        requested_by: "m.silva".to_string(),
        cost: Decimal::new(112_000_00, 2),
        submitted_at: now - Duration::days(1),
        steps: building.instantiate(),
    });

    let auction = workflows.template_for(RecordKind::SalesAuction)?;
    let steps = auction.instantiate();
    let steps = apply_action(
        &steps,
        ApprovalAction::Approve,
        "r.haddad",
        None,
        now - Duration::days(3),
    )?;
    let steps = apply_action(
        &steps,
        ApprovalAction::Reject,
        "company.owner",
        Some("Reserve price below book value"),
        now - Duration::days(1),
    )?;
    registry.insert_record(AssetRecord {
        id: RecordId("REC-S-3001".to_string()),
        kind: RecordKind::SalesAuction,
        title: "Auction of four retired sedans".to_string(),
        branch: "Harbor".to_string(),
        requested_by: "j.keller".to_string(),
        cost: Decimal::new(52_000_00, 2),
        submitted_at: now - Duration::days(8),
        steps,
    });

    let improvement = workflows.template_for(RecordKind::BranchImprovement)?;
    let steps = improvement.instantiate();
    let steps = apply_action(
        &steps,
        ApprovalAction::Approve,
        "b.tan",
        None,
        now - Duration::days(4),
    )?;
    let steps = apply_action(
        &steps,
        ApprovalAction::Revise,
        "r.haddad",
        Some("Split lobby and signage costs into separate lines"),
        now - Duration::days(2),
    )?;
    registry.insert_record(AssetRecord {
        id: RecordId("REC-I-4001".to_string()),
        kind: RecordKind::BranchImprovement,
        title: "Lobby refurbishment, Riverside branch".to_string(),
        branch: "Riverside".to_string(),
        requested_by: "a.nunes".to_string(),
        cost: Decimal::new(24_750_00, 2),
        submitted_at: now - Duration::days(7),
        steps,
    });

    registry.insert_maintenance(MaintenanceRequest {
        id: RecordId("MNT-5001".to_string()),
        asset: "Forklift FL-3".to_string(),
        branch: "Harbor".to_string(),
        requested_on: today - Duration::days(9),
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
    });
    registry.insert_maintenance(MaintenanceRequest {
        id: RecordId("MNT-5002".to_string()),
        asset: "Passenger elevator, Central office".to_string(),
        branch: "Central".to_string(),
        requested_on: today - Duration::days(30),
        completed_on: Some(today - Duration::days(26)),
        lines: vec![MaintenanceLine {
            description: "Annual inspection and certification".to_string(),
            quantity: 1,
            unit_cost: Decimal::new(1_200_00, 2),
        }],
    });

    let documents = [
        ("DOC-6001", "Fleet insurance policy", "Riverside", -10),
        ("DOC-6002", "Vehicle registration, REG-4411", "Riverside", 14),
        ("DOC-6003", "Elevator operating permit", "Central", 45),
        ("DOC-6004", "Fire safety certificate", "Harbor", 75),
        ("DOC-6005", "Business operating license", "Central", 120),
        ("DOC-6006", "Warehouse lease agreement", "Harbor", 400),
    ];
    for (id, name, branch, offset_days) in documents {
        registry.insert_document(LegalDocument {
            id: RecordId(id.to_string()),
            name: name.to_string(),
            branch: branch.to_string(),
            expiry_date: today + Duration::days(offset_days),
        });
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::config::AppConfig;
    use crate::domain::workflow::ApprovalStatus;
    use crate::reminders::{days_until, ReminderSeverity, ThresholdTable};

    use super::demo_dataset;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn demo_dataset_is_deterministic_for_a_fixed_clock() {
        let workflows = AppConfig::default().workflows;
        let first = demo_dataset(now(), &workflows).expect("seed");
        let second = demo_dataset(now(), &workflows).expect("seed");

        assert_eq!(first.records(), second.records());
        assert_eq!(first.maintenance(), second.maintenance());
        assert_eq!(first.documents(), second.documents());
    }

    #[test]
    fn demo_records_cover_the_approval_lifecycle() {
        let workflows = AppConfig::default().workflows;
        let registry = demo_dataset(now(), &workflows).expect("seed");

        let status_of = |id: &str| {
            registry.record(id).map(|record| record.approval_status()).expect("seeded record")
        };
        assert_eq!(status_of("REC-V-1001"), ApprovalStatus::PendingApproval);
        assert_eq!(status_of("REC-B-2001"), ApprovalStatus::Draft);
        assert_eq!(status_of("REC-S-3001"), ApprovalStatus::Rejected);
        assert_eq!(status_of("REC-I-4001"), ApprovalStatus::Revised);

        let vehicle = registry.record("REC-V-1001").expect("seeded record");
        assert_eq!(vehicle.active_role(), Some("Regional Manager"));
    }

    #[test]
    fn demo_documents_cover_every_fine_table_bucket() {
        let workflows = AppConfig::default().workflows;
        let registry = demo_dataset(now(), &workflows).expect("seed");
        let table = ThresholdTable::fine();
        let today = now().date_naive();

        let mut severities: Vec<ReminderSeverity> = registry
            .documents()
            .iter()
            .map(|document| table.classify(days_until(document.expiry_date, today)).severity)
            .collect();
        severities.sort();
        severities.dedup();

        assert_eq!(
            severities,
            vec![
                ReminderSeverity::Safe,
                ReminderSeverity::Upcoming,
                ReminderSeverity::Warning,
                ReminderSeverity::Attention,
                ReminderSeverity::Critical,
                ReminderSeverity::Expired,
            ]
        );
    }
}
