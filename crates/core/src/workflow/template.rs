use thiserror::Error;

use crate::domain::workflow::{ApprovalTier, WorkflowStep};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TierSetError {
    #[error("workflow requires at least one tier")]
    Empty,
    #[error("tier level must be positive (tier at position {position})")]
    NonPositiveLevel { position: usize },
    #[error("tier level {level} appears more than once")]
    DuplicateLevel { level: u32 },
}

/// Validated, ordered tier set for one record kind. Construction sorts the
/// tiers by ascending level so callers never rely on source ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowTemplate {
    name: String,
    tiers: Vec<ApprovalTier>,
}

impl WorkflowTemplate {
    pub fn new(
        name: impl Into<String>,
        mut tiers: Vec<ApprovalTier>,
    ) -> Result<Self, TierSetError> {
        if tiers.is_empty() {
            return Err(TierSetError::Empty);
        }
        if let Some(position) = tiers.iter().position(|tier| tier.level == 0) {
            return Err(TierSetError::NonPositiveLevel { position });
        }

        tiers.sort_by_key(|tier| tier.level);
        if let Some(pair) = tiers.windows(2).find(|pair| pair[0].level == pair[1].level) {
            return Err(TierSetError::DuplicateLevel { level: pair[0].level });
        }

        Ok(Self { name: name.into(), tiers })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiers(&self) -> &[ApprovalTier] {
        &self.tiers
    }

    pub fn final_level(&self) -> u32 {
        self.tiers.last().map(|tier| tier.level).unwrap_or(0)
    }

    /// Fresh step list for a record entering this workflow: every tier
    /// Pending, no decisions recorded.
    pub fn instantiate(&self) -> Vec<WorkflowStep> {
        self.tiers.iter().map(WorkflowStep::pending).collect()
    }
}
