use std::collections::BTreeMap;

use aws_sdk_sfn::Client;
use aws_sdk_sfn::types::{
    CloudWatchLogsLogGroup, LogDestination, LogLevel, LoggingConfiguration, Tag,
};
use stratus_core::models::remote_state::{LoggingConfig, StateMachineDescription};
use stratus_core::{ProviderError, ResourceArn, ResourceKind};

use crate::error::classify;

/// List every state machine ARN in the client's region, following `nextToken`.
pub async fn list_state_machines(client: &Client) -> Result<Vec<ResourceArn>, ProviderError> {
    let mut arns = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let resp = client
            .list_state_machines()
            .set_next_token(token.take())
            .send()
            .await
            .map_err(classify)?;

        for machine in resp.state_machines() {
            let arn = ResourceArn::parse(ResourceKind::StateMachine, machine.state_machine_arn())
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
            arns.push(arn);
        }

        match resp.next_token() {
            Some(next) if !next.is_empty() => token = Some(next.to_string()),
            _ => break,
        }
    }

    tracing::debug!(count = arns.len(), "listed state machines");
    Ok(arns)
}

pub async fn describe_state_machine(
    client: &Client,
    arn: &ResourceArn,
) -> Result<StateMachineDescription, ProviderError> {
    let resp = client
        .describe_state_machine()
        .state_machine_arn(arn.as_str())
        .send()
        .await
        .map_err(classify)?;

    let logging = match resp.logging_configuration() {
        Some(config) => LoggingConfig {
            level: config
                .level()
                .map(|l| l.as_str().to_string())
                .unwrap_or_else(|| "OFF".to_string()),
            include_execution_data: config.include_execution_data(),
            log_group_arn: config
                .destinations()
                .iter()
                .filter_map(|d| d.cloud_watch_logs_log_group())
                .filter_map(|g| g.log_group_arn())
                .map(str::to_string)
                .next(),
        },
        None => LoggingConfig::disabled(),
    };

    Ok(StateMachineDescription {
        arn: arn.clone(),
        name: resp.name().to_string(),
        logging,
    })
}

pub async fn update_logging(
    client: &Client,
    arn: &ResourceArn,
    logging: &LoggingConfig,
) -> Result<(), ProviderError> {
    let mut config = LoggingConfiguration::builder()
        .level(LogLevel::from(logging.level.as_str()))
        .include_execution_data(logging.include_execution_data);

    if let Some(group_arn) = &logging.log_group_arn {
        config = config.destinations(
            LogDestination::builder()
                .cloud_watch_logs_log_group(
                    CloudWatchLogsLogGroup::builder()
                        .log_group_arn(group_arn)
                        .build(),
                )
                .build(),
        );
    }

    client
        .update_state_machine()
        .state_machine_arn(arn.as_str())
        .logging_configuration(config.build())
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}

pub async fn list_tags(
    client: &Client,
    arn: &ResourceArn,
) -> Result<BTreeMap<String, String>, ProviderError> {
    let resp = client
        .list_tags_for_resource()
        .resource_arn(arn.as_str())
        .send()
        .await
        .map_err(classify)?;

    Ok(resp
        .tags()
        .iter()
        .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
        .collect())
}

pub async fn tag_resource(
    client: &Client,
    arn: &ResourceArn,
    tags: &BTreeMap<String, String>,
) -> Result<(), ProviderError> {
    let tags = tags
        .iter()
        .map(|(k, v)| Tag::builder().key(k).value(v).build())
        .collect();

    client
        .tag_resource()
        .resource_arn(arn.as_str())
        .set_tags(Some(tags))
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}

pub async fn untag_resource(
    client: &Client,
    arn: &ResourceArn,
    keys: &[String],
) -> Result<(), ProviderError> {
    client
        .untag_resource()
        .resource_arn(arn.as_str())
        .set_tag_keys(Some(keys.to_vec()))
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}
