pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod reminders;
pub mod workflow;

pub use audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
};
pub use domain::record::{
    AssetRecord, LegalDocument, MaintenanceLine, MaintenanceRequest, RecordId, RecordKind,
    UnknownRecordKind,
};
pub use domain::workflow::{
    ApprovalAction, ApprovalStatus, ApprovalTier, ApproverKind, StepStatus, WorkflowStep,
};
pub use errors::{ApplicationError, DomainError};
pub use registry::{demo_dataset, InMemoryRegistry};
pub use reminders::{
    days_until, days_until_instant, parse_iso_date, Classification, ReminderBucket, ReminderError,
    ReminderSeverity, ThresholdError, ThresholdTable,
};
pub use workflow::{
    active_step, apply_action, overall_status, reset_for_resubmission, ApprovalEngine,
    TierSetError, WorkflowError, WorkflowTemplate,
};
