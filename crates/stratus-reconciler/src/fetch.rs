//! Remote State Fetcher.

use futures::StreamExt;
use stratus_core::log_names::{function_log_group, log_group_name_from_arn, state_machine_log_group};
use stratus_core::models::remote_state::{
    FunctionState, LogGroupState, RemoteState, StateMachineState,
};
use stratus_core::{Provider, ResourceArn, ResourceKind};

use crate::error::FetchError;

/// Snapshot every target, at most `limit` in flight, results in input order.
///
/// `log_env` is the environment suffix of tool-created state machine log
/// groups. One failed fetch never affects the others.
pub async fn fetch_all<'a>(
    provider: &'a dyn Provider,
    arns: impl IntoIterator<Item = &'a ResourceArn>,
    log_env: Option<&'a str>,
    limit: usize,
) -> Vec<(ResourceArn, Result<RemoteState, FetchError>)> {
    futures::stream::iter(arns)
        .map(|arn| async move { (arn.clone(), fetch_state(provider, arn, log_env).await) })
        .buffered(limit.max(1))
        .collect()
        .await
}

pub async fn fetch_state(
    provider: &dyn Provider,
    arn: &ResourceArn,
    log_env: Option<&str>,
) -> Result<RemoteState, FetchError> {
    let state = match arn.kind() {
        ResourceKind::Function => RemoteState::Function(fetch_function(provider, arn).await?),
        ResourceKind::StateMachine => {
            RemoteState::StateMachine(fetch_state_machine(provider, arn, log_env).await?)
        }
    };
    tracing::debug!(resource = %arn, "fetched remote state");
    Ok(state)
}

async fn fetch_function(
    provider: &dyn Provider,
    arn: &ResourceArn,
) -> Result<FunctionState, FetchError> {
    let function = provider
        .get_function(arn)
        .await
        .map_err(|e| FetchError::new("GetFunction", e))?;

    let group = function_log_group(&function.name);
    let log_group = log_group_state(provider, arn.region(), &group).await?;

    Ok(FunctionState {
        function,
        log_group,
    })
}

async fn fetch_state_machine(
    provider: &dyn Provider,
    arn: &ResourceArn,
    log_env: Option<&str>,
) -> Result<StateMachineState, FetchError> {
    let machine = provider
        .describe_state_machine(arn)
        .await
        .map_err(|e| FetchError::new("DescribeStateMachine", e))?;
    let tags = provider
        .list_tags(arn)
        .await
        .map_err(|e| FetchError::new("ListTagsForResource", e))?;

    let group = match machine
        .logging
        .log_group_arn
        .as_deref()
        .and_then(log_group_name_from_arn)
    {
        Some(destination) => destination.to_string(),
        None => state_machine_log_group(&machine.name, log_env),
    };
    let log_group = log_group_state(provider, arn.region(), &group).await?;

    Ok(StateMachineState {
        machine,
        tags,
        log_group,
    })
}

async fn log_group_state(
    provider: &dyn Provider,
    region: &str,
    name: &str,
) -> Result<Option<LogGroupState>, FetchError> {
    let filters = provider
        .describe_subscription_filters(region, name)
        .await
        .map_err(|e| FetchError::new("DescribeSubscriptionFilters", e))?;

    Ok(filters.map(|subscription_filters| LogGroupState {
        name: name.to_string(),
        subscription_filters,
    }))
}
