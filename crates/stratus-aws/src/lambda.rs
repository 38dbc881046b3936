use std::collections::BTreeMap;

use aws_sdk_lambda::Client;
use aws_sdk_lambda::types::Environment;
use stratus_core::models::change_set::FunctionConfigurationUpdate;
use stratus_core::models::remote_state::FunctionDescription;
use stratus_core::{ProviderError, ResourceArn, ResourceKind};

use crate::error::{classify, invalid_response};

/// List every function ARN in the client's region, following `NextMarker`.
pub async fn list_functions(client: &Client) -> Result<Vec<ResourceArn>, ProviderError> {
    let mut arns = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let resp = client
            .list_functions()
            .set_marker(marker.take())
            .send()
            .await
            .map_err(classify)?;

        for function in resp.functions() {
            let arn = function
                .function_arn()
                .ok_or_else(|| invalid_response("function without FunctionArn"))?;
            let arn = ResourceArn::parse(ResourceKind::Function, arn)
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
            arns.push(arn);
        }

        match resp.next_marker() {
            Some(next) if !next.is_empty() => marker = Some(next.to_string()),
            _ => break,
        }
    }

    tracing::debug!(count = arns.len(), "listed lambda functions");
    Ok(arns)
}

/// Fetch a function's configuration and tags in one `GetFunction` call.
pub async fn get_function(
    client: &Client,
    arn: &ResourceArn,
) -> Result<FunctionDescription, ProviderError> {
    let resp = client
        .get_function()
        .function_name(arn.as_str())
        .send()
        .await
        .map_err(classify)?;

    let config = resp
        .configuration()
        .ok_or_else(|| invalid_response("GetFunction without Configuration"))?;

    let environment = config
        .environment()
        .and_then(|e| e.variables())
        .map(|vars| vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    let tags = resp
        .tags()
        .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    Ok(FunctionDescription {
        arn: arn.clone(),
        name: config
            .function_name()
            .unwrap_or_else(|| arn.name())
            .to_string(),
        runtime: config.runtime().map(|r| r.as_str().to_string()),
        handler: config.handler().map(str::to_string),
        architectures: config
            .architectures()
            .iter()
            .map(|a| a.as_str().to_string())
            .collect(),
        environment,
        layers: config
            .layers()
            .iter()
            .filter_map(|l| l.arn())
            .map(str::to_string)
            .collect(),
        tags,
    })
}

pub async fn list_tags(
    client: &Client,
    arn: &ResourceArn,
) -> Result<BTreeMap<String, String>, ProviderError> {
    let resp = client
        .list_tags()
        .resource(arn.as_str())
        .send()
        .await
        .map_err(classify)?;

    Ok(resp
        .tags()
        .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default())
}

/// Apply handler, environment and layer changes. Unset fields are not sent.
pub async fn update_function_configuration(
    client: &Client,
    update: &FunctionConfigurationUpdate,
) -> Result<(), ProviderError> {
    let mut req = client
        .update_function_configuration()
        .function_name(&update.function_name);

    if let Some(handler) = &update.handler {
        req = req.handler(handler);
    }
    if let Some(env) = &update.environment {
        req = req.environment(
            Environment::builder()
                .set_variables(Some(env.variables.clone().into_iter().collect()))
                .build(),
        );
    }
    if let Some(layers) = &update.layers {
        req = req.set_layers(Some(layers.clone()));
    }

    req.send().await.map_err(classify)?;
    Ok(())
}

pub async fn tag_resource(
    client: &Client,
    arn: &ResourceArn,
    tags: &BTreeMap<String, String>,
) -> Result<(), ProviderError> {
    client
        .tag_resource()
        .resource(arn.as_str())
        .set_tags(Some(tags.clone().into_iter().collect()))
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
        .resource(arn.as_str())
        .set_tag_keys(Some(keys.to_vec()))
        .send()
        .await
        .map_err(classify)?;
    Ok(())
}
