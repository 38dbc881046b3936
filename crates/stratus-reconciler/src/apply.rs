//! Change Applier.

use std::collections::HashSet;

use futures::StreamExt;
use stratus_core::models::change_set::{ChangeSet, Operation};
use stratus_core::models::outcome::{OperationFailure, ResourceOutcome};
use stratus_core::{Provider, ProviderError, ResourceArn};

use crate::diff::Planned;

/// Apply every planned change set, at most `limit` resources in flight.
///
/// Outcomes come back in plan order. Failed plans pass through untouched
/// and empty change sets succeed without a call.
pub async fn apply_all(
    provider: &dyn Provider,
    planned: Vec<Planned>,
    limit: usize,
) -> Vec<ResourceOutcome> {
    futures::stream::iter(planned)
        .map(|plan| async move {
            match plan {
                Planned::Failed(outcome) => outcome,
                Planned::Changes(changes) => apply(provider, &changes).await,
            }
        })
        .buffered(limit.max(1))
        .collect()
        .await
}

/// Apply one resource's change set in order.
///
/// Each operation is attempted once. A failure skips the rest of its group
/// and nothing already applied is rolled back.
pub async fn apply(provider: &dyn Provider, changes: &ChangeSet) -> ResourceOutcome {
    let resource = &changes.resource;
    let mut applied = Vec::new();
    let mut failures = Vec::new();
    let mut skipped = Vec::new();
    let mut failed_groups = HashSet::new();

    for operation in &changes.operations {
        let name = operation.name();
        if failed_groups.contains(&operation.group()) {
            tracing::debug!(resource = %resource, operation = name, "skipped after earlier failure");
            skipped.push(name.to_string());
            continue;
        }

        match execute(provider, resource, operation).await {
            Ok(()) => {
                tracing::info!(resource = %resource, operation = name, "applied");
                applied.push(name.to_string());
            }
            Err(e) => {
                tracing::warn!(resource = %resource, operation = name, error = %e, "operation failed");
                failures.push(OperationFailure {
                    operation: name.to_string(),
                    message: e.to_string(),
                });
                failed_groups.insert(operation.group());
            }
        }
    }

    ResourceOutcome::new(
        resource.clone(),
        applied,
        failures,
        skipped,
        changes.conflicts.clone(),
    )
}

/// The outcome a dry run reports: every planned operation would succeed.
pub fn would_apply(changes: &ChangeSet) -> ResourceOutcome {
    ResourceOutcome::new(
        changes.resource.clone(),
        changes
            .operations
            .iter()
            .map(|op| op.name().to_string())
            .collect(),
        Vec::new(),
        Vec::new(),
        changes.conflicts.clone(),
    )
}

async fn execute(
    provider: &dyn Provider,
    resource: &ResourceArn,
    operation: &Operation,
) -> Result<(), ProviderError> {
    match operation {
        Operation::UpdateFunctionConfiguration(update) => {
            provider
                .update_function_configuration(resource.region(), update)
                .await
        }
        Operation::CreateLogGroup(req) => {
            provider.create_log_group(&req.region, &req.log_group_name).await
        }
        Operation::DeleteLogGroup(req) => {
            provider.delete_log_group(&req.region, &req.log_group_name).await
        }
        Operation::PutSubscriptionFilter(req) => {
            provider.put_subscription_filter(&req.region, req).await
        }
        Operation::DeleteSubscriptionFilter(req) => {
            provider
                .delete_subscription_filter(&req.region, &req.log_group_name, &req.filter_name)
                .await
        }
        Operation::UpdateStateMachine(update) => {
            provider
                .update_state_machine_logging(resource, &update.logging)
                .await
        }
        Operation::TagResource(req) => provider.tag_resource(resource, &req.tags).await,
        Operation::UntagResource(req) => provider.untag_resource(resource, &req.tag_keys).await,
    }
}
