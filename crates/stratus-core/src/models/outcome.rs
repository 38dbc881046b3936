use serde::Serialize;

use crate::arn::ResourceArn;
use crate::models::change_set::Conflict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// No operation failed. An empty plan counts, as does a plan whose
    /// only findings are conflicts.
    Succeeded,
    /// Some operations applied, others failed or were left out.
    PartiallyFailed,
    /// Nothing applied and something went wrong.
    Failed,
}

/// First error of one failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub operation: String,
    pub message: String,
}

/// Result of reconciling one resource. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOutcome {
    pub resource: ResourceArn,
    pub status: OutcomeStatus,
    pub applied: Vec<String>,
    pub failures: Vec<OperationFailure>,
    /// Operations not attempted because an earlier one in their group failed.
    pub skipped: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

impl ResourceOutcome {
    pub fn new(
        resource: ResourceArn,
        applied: Vec<String>,
        failures: Vec<OperationFailure>,
        skipped: Vec<String>,
        conflicts: Vec<Conflict>,
    ) -> Self {
        let status = if failures.is_empty() {
            OutcomeStatus::Succeeded
        } else if applied.is_empty() {
            OutcomeStatus::Failed
        } else {
            OutcomeStatus::PartiallyFailed
        };
        Self {
            resource,
            status,
            applied,
            failures,
            skipped,
            conflicts,
        }
    }

    /// A resource that failed before any operation could be planned.
    pub fn failed(resource: ResourceArn, operation: &str, message: impl Into<String>) -> Self {
        Self::new(
            resource,
            Vec::new(),
            vec![OperationFailure {
                operation: operation.to_string(),
                message: message.into(),
            }],
            Vec::new(),
            Vec::new(),
        )
    }

    /// Counts towards a successful run.
    pub fn is_success(&self) -> bool {
        self.status != OutcomeStatus::Failed
    }
}

/// Every resource outcome of a run, in resolved order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<ResourceOutcome>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    /// Resources with at least one failed operation, partial ones included.
    pub fn with_failures(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| !o.failures.is_empty())
    }

    /// Resources where every planned operation applied and at least one did.
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Succeeded && !o.applied.is_empty())
            .count()
    }

    /// Resources where some operations applied and others failed.
    pub fn partially_updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::PartiallyFailed)
            .count()
    }

    /// Resources left with a conflict the tool would not override.
    pub fn with_conflicts(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| !o.conflicts.is_empty())
    }

    /// Zero when any resource succeeded, even if others failed.
    pub fn exit_code(&self) -> i32 {
        if self.outcomes.iter().any(ResourceOutcome::is_success) {
            0
        } else {
            1
        }
    }
}
