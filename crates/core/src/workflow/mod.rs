pub mod engine;
pub mod template;

pub use engine::{
    active_step, apply_action, overall_status, reset_for_resubmission, ApprovalEngine,
    WorkflowError,
};
pub use template::{TierSetError, WorkflowTemplate};
