use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::arn::ResourceArn;
use crate::models::remote_state::LoggingConfig;

/// Operations in one group depend on each other; groups are independent.
///
/// When an operation fails, the rest of its group is skipped while other
/// groups of the same resource still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationGroup {
    Configuration,
    Logging,
    Tagging,
}

/// Values an `UpdateFunctionConfiguration` overwrites, kept for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionConfigurationSnapshot {
    pub handler: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentUpdate {
    pub variables: BTreeMap<String, String>,
}

/// Parameters of Lambda `UpdateFunctionConfiguration`.
///
/// Only fields that actually change are set; a `None` field is left as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfigurationUpdate {
    pub function_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,
    #[serde(skip)]
    pub previous: FunctionConfigurationSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroupRequest {
    pub log_group_name: String,
    #[serde(skip)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutSubscriptionFilterRequest {
    pub destination_arn: String,
    pub filter_name: String,
    pub filter_pattern: String,
    pub log_group_name: String,
    #[serde(skip)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubscriptionFilterRequest {
    pub filter_name: String,
    pub log_group_name: String,
    #[serde(skip)]
    pub region: String,
}

/// Parameters of Step Functions `UpdateStateMachine`, restricted to logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachineLoggingUpdate {
    pub state_machine_arn: String,
    pub logging: LoggingConfig,
    pub previous: LoggingConfig,
}

impl Serialize for StateMachineLoggingUpdate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let destinations: Vec<Value> = self
            .logging
            .log_group_arn
            .iter()
            .map(|arn| serde_json::json!({"cloudWatchLogsLogGroup": {"logGroupArn": arn}}))
            .collect();
        serde_json::json!({
            "stateMachineArn": self.state_machine_arn,
            "loggingConfiguration": {
                "destinations": destinations,
                "level": self.logging.level,
                "includeExecutionData": self.logging.include_execution_data,
            },
        })
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub resource_arn: String,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UntagRequest {
    pub resource_arn: String,
    pub tag_keys: Vec<String>,
}

/// One mutating provider call, with its exact request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    UpdateFunctionConfiguration(FunctionConfigurationUpdate),
    CreateLogGroup(LogGroupRequest),
    DeleteLogGroup(LogGroupRequest),
    PutSubscriptionFilter(PutSubscriptionFilterRequest),
    DeleteSubscriptionFilter(DeleteSubscriptionFilterRequest),
    UpdateStateMachine(StateMachineLoggingUpdate),
    TagResource(TagRequest),
    UntagResource(UntagRequest),
}

impl Operation {
    /// API action name, as shown in previews.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateFunctionConfiguration(_) => "UpdateFunctionConfiguration",
            Self::CreateLogGroup(_) => "CreateLogGroup",
            Self::DeleteLogGroup(_) => "DeleteLogGroup",
            Self::PutSubscriptionFilter(_) => "PutSubscriptionFilter",
            Self::DeleteSubscriptionFilter(_) => "DeleteSubscriptionFilter",
            Self::UpdateStateMachine(_) => "UpdateStateMachine",
            Self::TagResource(_) => "TagResource",
            Self::UntagResource(_) => "UntagResource",
        }
    }

    pub fn group(&self) -> OperationGroup {
        match self {
            Self::UpdateFunctionConfiguration(_) => OperationGroup::Configuration,
            Self::CreateLogGroup(_)
            | Self::DeleteLogGroup(_)
            | Self::PutSubscriptionFilter(_)
            | Self::DeleteSubscriptionFilter(_)
            | Self::UpdateStateMachine(_) => OperationGroup::Logging,
            Self::TagResource(_) | Self::UntagResource(_) => OperationGroup::Tagging,
        }
    }

    /// Request parameters as JSON.
    pub fn parameters(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::UpdateFunctionConfiguration(r) => serde_json::to_value(r),
            Self::CreateLogGroup(r) | Self::DeleteLogGroup(r) => serde_json::to_value(r),
            Self::PutSubscriptionFilter(r) => serde_json::to_value(r),
            Self::DeleteSubscriptionFilter(r) => serde_json::to_value(r),
            Self::UpdateStateMachine(r) => serde_json::to_value(r),
            Self::TagResource(r) => serde_json::to_value(r),
            Self::UntagResource(r) => serde_json::to_value(r),
        }
    }
}

/// A sub-operation deliberately left out of the plan because it would touch
/// configuration stratus does not own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub group: OperationGroup,
    pub message: String,
}

/// Ordered operations reconciling one resource with the desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub resource: ResourceArn,
    pub operations: Vec<Operation>,
    pub conflicts: Vec<Conflict>,
}

impl ChangeSet {
    pub fn new(resource: ResourceArn) -> Self {
        Self {
            resource,
            operations: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// No operations planned. Conflicts alone do not make a change.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn conflict(&mut self, group: OperationGroup, message: impl Into<String>) {
        self.conflicts.push(Conflict {
            group,
            message: message.into(),
        });
    }
}
