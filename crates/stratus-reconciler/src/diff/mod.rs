//! Diff Engine.
//!
//! Compares one remote snapshot with the desired direction and emits the
//! minimal ordered change set. Only fields in `ManagedFieldSet` are ever
//! touched; an empty change set means the resource is already reconciled.

mod function;
mod state_machine;

use stratus_core::ResourceArn;
use stratus_core::models::change_set::ChangeSet;
use stratus_core::models::outcome::ResourceOutcome;
use stratus_core::models::policy::Direction;
use stratus_core::models::remote_state::RemoteState;

use crate::error::{DiffError, FetchError};

pub use self::state_machine::FOREIGN_LOGGING_CONFLICT;

/// Change set for one resource.
pub fn compute(state: &RemoteState, direction: &Direction) -> Result<ChangeSet, DiffError> {
    match (state, direction) {
        (RemoteState::Function(s), Direction::Instrument(policy)) => {
            function::instrument(s, policy)
        }
        (RemoteState::Function(s), Direction::Uninstrument) => Ok(function::uninstrument(s)),
        (RemoteState::StateMachine(s), Direction::Instrument(policy)) => {
            Ok(state_machine::instrument(s, policy))
        }
        (RemoteState::StateMachine(s), Direction::Uninstrument) => {
            Ok(state_machine::uninstrument(s))
        }
    }
}

/// A resolved target after fetch and diff.
#[derive(Debug, Clone)]
pub enum Planned {
    Changes(ChangeSet),
    /// Fetch or diff failed; nothing will be attempted.
    Failed(ResourceOutcome),
}

impl Planned {
    pub fn resource(&self) -> &ResourceArn {
        match self {
            Self::Changes(changes) => &changes.resource,
            Self::Failed(outcome) => &outcome.resource,
        }
    }

    /// Planned operations, empty for failures.
    pub fn change_set(&self) -> Option<&ChangeSet> {
        match self {
            Self::Changes(changes) => Some(changes),
            Self::Failed(_) => None,
        }
    }
}

/// Diff every fetched snapshot, turning per-resource errors into outcomes.
pub fn plan_all(
    fetched: Vec<(ResourceArn, Result<RemoteState, FetchError>)>,
    direction: &Direction,
) -> Vec<Planned> {
    fetched
        .into_iter()
        .map(|(arn, state)| match state {
            Err(e) => {
                tracing::warn!(resource = %arn, error = %e, "fetch failed");
                Planned::Failed(ResourceOutcome::failed(arn, e.operation(), e.to_string()))
            }
            Ok(state) => match compute(&state, direction) {
                Ok(changes) => {
                    tracing::debug!(
                        resource = %arn,
                        operations = changes.operations.len(),
                        conflicts = changes.conflicts.len(),
                        "computed change set"
                    );
                    Planned::Changes(changes)
                }
                Err(e) => {
                    tracing::warn!(resource = %arn, error = %e, "cannot reconcile");
                    Planned::Failed(ResourceOutcome::failed(arn, "Diff", e.to_string()))
                }
            },
        })
        .collect()
}
