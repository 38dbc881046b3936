use aws_sdk_cloudwatchlogs::Client;
use stratus_core::ProviderError;
use stratus_core::models::change_set::PutSubscriptionFilterRequest;
use stratus_core::models::remote_state::SubscriptionFilter;

use crate::error::classify;

/// Subscription filters on `log_group`, or `None` if the group does not exist.
pub async fn describe_subscription_filters(
    client: &Client,
    log_group: &str,
) -> Result<Option<Vec<SubscriptionFilter>>, ProviderError> {
    let mut filters = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let resp = match client
            .describe_subscription_filters()
            .log_group_name(log_group)
            .set_next_token(token.take())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => match classify(e) {
                ProviderError::NotFound(_) => return Ok(None),
                other => return Err(other),
            },
        };

        for filter in resp.subscription_filters() {
            filters.push(SubscriptionFilter {
                filter_name: filter.filter_name().unwrap_or_default().to_string(),
                log_group_name: filter
                    .log_group_name()
                    .unwrap_or(log_group)
                    .to_string(),
                destination_arn: filter.destination_arn().unwrap_or_default().to_string(),
                filter_pattern: filter.filter_pattern().unwrap_or_default().to_string(),
            });
        }

        match resp.next_token() {
            Some(next) if !next.is_empty() => token = Some(next.to_string()),
            _ => break,
        }
    }

    Ok(Some(filters))
}

pub async fn create_log_group(client: &Client, name: &str) -> Result<(), ProviderError> {
    client
        .create_log_group()
        .log_group_name(name)
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}

pub async fn delete_log_group(client: &Client, name: &str) -> Result<(), ProviderError> {
    client
        .delete_log_group()
        .log_group_name(name)
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}

pub async fn put_subscription_filter(
    client: &Client,
    filter: &PutSubscriptionFilterRequest,
) -> Result<(), ProviderError> {
    client
        .put_subscription_filter()
        .log_group_name(&filter.log_group_name)
        .filter_name(&filter.filter_name)
        .filter_pattern(&filter.filter_pattern)
        .destination_arn(&filter.destination_arn)
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}

pub async fn delete_subscription_filter(
    client: &Client,
    log_group: &str,
    filter_name: &str,
) -> Result<(), ProviderError> {
    client
        .delete_subscription_filter()
        .log_group_name(log_group)
        .filter_name(filter_name)
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}
