use stratus_core::{ResourceArn, ResourceKind};

use crate::error::ReconcileError;

/// The interactive gates of a run: picking resources from an account-wide
/// listing, and confirming changes before they are applied.
///
/// Only consulted when the run is interactive.
pub trait Interaction: Send + Sync {
    /// Pick a subset of `candidates`. An empty pick is a valid answer.
    fn select_resources(
        &self,
        kind: ResourceKind,
        candidates: &[ResourceArn],
    ) -> Result<Vec<ResourceArn>, ReconcileError>;

    /// Ask whether the previewed changes should be applied.
    fn confirm_changes(&self, prompt: &str) -> Result<bool, ReconcileError>;
}

/// Interaction for non-interactive runs: selects nothing, confirms nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unattended;

impl Interaction for Unattended {
    fn select_resources(
        &self,
        _kind: ResourceKind,
        _candidates: &[ResourceArn],
    ) -> Result<Vec<ResourceArn>, ReconcileError> {
        Ok(Vec::new())
    }

    fn confirm_changes(&self, _prompt: &str) -> Result<bool, ReconcileError> {
        Ok(false)
    }
}
