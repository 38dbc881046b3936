use std::collections::BTreeMap;

use stratus_core::ManagedFieldSet;
use stratus_core::arn::{layer_arn, layer_name};
use stratus_core::log_names::{function_filter_name, function_log_group};
use stratus_core::managed::LAMBDA_HANDLER_ENV_VAR;
use stratus_core::models::change_set::{
    ChangeSet, DeleteSubscriptionFilterRequest, EnvironmentUpdate, FunctionConfigurationSnapshot,
    FunctionConfigurationUpdate, LogGroupRequest, Operation, PutSubscriptionFilterRequest,
    TagRequest, UntagRequest,
};
use stratus_core::models::policy::{DEFAULT_LAYER_ACCOUNT, GOVCLOUD_LAYER_ACCOUNT, InstrumentPolicy};
use stratus_core::models::remote_state::{FunctionDescription, FunctionState};

use crate::error::DiffError;

const PYTHON_HANDLER: &str = "datadog_lambda.handler.handler";
const NODE_HANDLER: &str = "/opt/nodejs/node_modules/datadog-lambda-js/handler.handler";
const EXTENSION_LAYER: &str = "Datadog-Extension";

/// Runtimes the tracing library supports. Everything else can only take
/// the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Runtime<'a> {
    /// Version without the dot, e.g. `312` for `python3.12`.
    Python(&'a str),
    /// Major version, e.g. `20` for `nodejs20.x`.
    Node(&'a str),
    Other(&'a str),
}

impl<'a> Runtime<'a> {
    fn parse(runtime: &'a str) -> Self {
        if let Some(version) = runtime.strip_prefix("python") {
            return Self::Python(version);
        }
        if let Some(major) = runtime
            .strip_prefix("nodejs")
            .and_then(|v| v.strip_suffix(".x"))
        {
            return Self::Node(major);
        }
        Self::Other(runtime)
    }

    fn library_handler(&self) -> Option<&'static str> {
        match self {
            Self::Python(_) => Some(PYTHON_HANDLER),
            Self::Node(_) => Some(NODE_HANDLER),
            Self::Other(_) => None,
        }
    }

    /// `Datadog-Python312-ARM`, `Datadog-Node20-x`. Node layers are
    /// architecture-independent.
    fn layer_name(&self, arm: bool) -> Option<String> {
        match self {
            Self::Python(version) => {
                let version = version.replace('.', "");
                let suffix = if arm { "-ARM" } else { "" };
                Some(format!("Datadog-Python{version}{suffix}"))
            }
            Self::Node(major) => Some(format!("Datadog-Node{major}-x")),
            Self::Other(_) => None,
        }
    }
}

pub(crate) fn instrument(
    state: &FunctionState,
    policy: &InstrumentPolicy,
) -> Result<ChangeSet, DiffError> {
    let function = &state.function;
    let region = function.arn.region();
    let mut changes = ChangeSet::new(function.arn.clone());

    let mut environment = function.environment.clone();
    environment.extend(policy.managed_environment());

    let mut handler = None;
    let mut layers = function.layers.clone();

    if let Some(version) = policy.layer_version {
        let runtime = function
            .runtime
            .as_deref()
            .map(Runtime::parse)
            .ok_or(DiffError::MissingRuntime)?;
        let name = runtime
            .layer_name(function.is_arm())
            .ok_or_else(|| DiffError::UnsupportedRuntime {
                runtime: function.runtime.clone().unwrap_or_default(),
                layer: "tracing library",
            })?;
        put_layer(&mut layers, layer_arn(region, layer_account(policy, region), &name, version));

        // The library wraps the user's handler; remember the original once.
        if let Some(library_handler) = runtime.library_handler() {
            let current = function.handler.as_deref().unwrap_or_default();
            if current != library_handler {
                environment.insert(LAMBDA_HANDLER_ENV_VAR.to_string(), current.to_string());
                handler = Some(library_handler.to_string());
            }
        }
    }

    if let Some(version) = policy.extension_version {
        if function.runtime.is_none() {
            return Err(DiffError::MissingRuntime);
        }
        let name = if function.is_arm() {
            format!("{EXTENSION_LAYER}-ARM")
        } else {
            EXTENSION_LAYER.to_string()
        };
        put_layer(&mut layers, layer_arn(region, layer_account(policy, region), &name, version));
    }

    push_configuration_update(&mut changes, function, handler, environment, layers);

    if let Some(forwarder) = &policy.forwarder_arn {
        let log_group_name = function_log_group(&function.name);
        let filter_name = function_filter_name();
        let subscribed = state.log_group.as_ref().is_some_and(|group| {
            group
                .subscription_filters
                .iter()
                .any(|f| f.filter_name == filter_name && &f.destination_arn == forwarder)
        });

        if state.log_group.is_none() {
            changes.push(Operation::CreateLogGroup(LogGroupRequest {
                log_group_name: log_group_name.clone(),
                region: region.to_string(),
            }));
        }
        if !subscribed {
            changes.push(Operation::PutSubscriptionFilter(PutSubscriptionFilterRequest {
                destination_arn: forwarder.clone(),
                filter_name,
                filter_pattern: String::new(),
                log_group_name,
                region: region.to_string(),
            }));
        }
    }

    let owner = ManagedFieldSet::CURRENT.owner_tag_key;
    if function.tags.get(owner) != Some(&policy.owner_tag_value) {
        changes.push(Operation::TagResource(TagRequest {
            resource_arn: function.arn.to_string(),
            tags: BTreeMap::from([(owner.to_string(), policy.owner_tag_value.clone())]),
        }));
    }

    Ok(changes)
}

pub(crate) fn uninstrument(state: &FunctionState) -> ChangeSet {
    let managed = ManagedFieldSet::CURRENT;
    let function = &state.function;
    let region = function.arn.region();
    let mut changes = ChangeSet::new(function.arn.clone());

    let environment: BTreeMap<String, String> = function
        .environment
        .iter()
        .filter(|(key, _)| !managed.is_managed_env_key(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let handler = function
        .environment
        .get(LAMBDA_HANDLER_ENV_VAR)
        .filter(|original| function.handler.as_ref() != Some(*original))
        .cloned();

    let layers: Vec<String> = function
        .layers
        .iter()
        .filter(|layer| !managed.is_managed_layer(layer))
        .cloned()
        .collect();

    push_configuration_update(&mut changes, function, handler, environment, layers);

    // Lambda owns the log group; only our subscriptions go.
    if let Some(group) = &state.log_group {
        for filter in &group.subscription_filters {
            if managed.is_owned_filter(&filter.filter_name) {
                changes.push(Operation::DeleteSubscriptionFilter(
                    DeleteSubscriptionFilterRequest {
                        filter_name: filter.filter_name.clone(),
                        log_group_name: group.name.clone(),
                        region: region.to_string(),
                    },
                ));
            }
        }
    }

    if function.tags.contains_key(managed.owner_tag_key) {
        changes.push(Operation::UntagResource(UntagRequest {
            resource_arn: function.arn.to_string(),
            tag_keys: vec![managed.owner_tag_key.to_string()],
        }));
    }

    changes
}

/// Replace the managed layer with the same name, or append.
fn put_layer(layers: &mut Vec<String>, arn: String) {
    let name = layer_name(&arn);
    match layers.iter().position(|l| layer_name(l) == name) {
        Some(i) => layers[i] = arn,
        None => layers.push(arn),
    }
}

fn layer_account<'a>(policy: &'a InstrumentPolicy, region: &str) -> &'a str {
    if region.starts_with("us-gov-") && policy.layer_account == DEFAULT_LAYER_ACCOUNT {
        GOVCLOUD_LAYER_ACCOUNT
    } else {
        &policy.layer_account
    }
}

/// Emit one `UpdateFunctionConfiguration` carrying only what differs.
fn push_configuration_update(
    changes: &mut ChangeSet,
    function: &FunctionDescription,
    handler: Option<String>,
    environment: BTreeMap<String, String>,
    layers: Vec<String>,
) {
    let environment = (environment != function.environment)
        .then_some(EnvironmentUpdate { variables: environment });
    let layers = (layers != function.layers).then_some(layers);

    if handler.is_none() && environment.is_none() && layers.is_none() {
        return;
    }

    changes.push(Operation::UpdateFunctionConfiguration(
        FunctionConfigurationUpdate {
            function_name: function.arn.to_string(),
            handler,
            environment,
            layers,
            previous: FunctionConfigurationSnapshot {
                handler: function.handler.clone(),
                environment: function.environment.clone(),
                layers: function.layers.clone(),
            },
        },
    ));
}
