use std::collections::BTreeMap;

use serde::Serialize;

use crate::arn::ResourceArn;

/// A subscription filter on a CloudWatch Logs log group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionFilter {
    pub filter_name: String,
    pub log_group_name: String,
    pub destination_arn: String,
    pub filter_pattern: String,
}

/// A log group that exists remotely, with its current subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogGroupState {
    pub name: String,
    pub subscription_filters: Vec<SubscriptionFilter>,
}

/// Lambda function configuration as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescription {
    pub arn: ResourceArn,
    pub name: String,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub architectures: Vec<String>,
    pub environment: BTreeMap<String, String>,
    /// Layer version ARNs in attachment order.
    pub layers: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

impl FunctionDescription {
    pub fn is_arm(&self) -> bool {
        self.architectures.iter().any(|a| a == "arm64")
    }
}

/// Step Functions logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    /// `ALL`, `ERROR`, `FATAL` or `OFF`.
    pub level: String,
    pub include_execution_data: bool,
    pub log_group_arn: Option<String>,
}

impl LoggingConfig {
    pub fn disabled() -> Self {
        Self {
            level: "OFF".into(),
            include_execution_data: false,
            log_group_arn: None,
        }
    }

    pub fn all_to(log_group_arn: String) -> Self {
        Self {
            level: "ALL".into(),
            include_execution_data: true,
            log_group_arn: Some(log_group_arn),
        }
    }
}

/// State machine configuration as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMachineDescription {
    pub arn: ResourceArn,
    pub name: String,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionState {
    pub function: FunctionDescription,
    /// `None` when `/aws/lambda/<name>` does not exist yet.
    pub log_group: Option<LogGroupState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMachineState {
    pub machine: StateMachineDescription,
    pub tags: BTreeMap<String, String>,
    /// The logging destination's log group when logging names one;
    /// otherwise the group stratus would create for this machine. `None`
    /// when that group does not exist.
    pub log_group: Option<LogGroupState>,
}

/// Snapshot of one resource's remote configuration, taken once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteState {
    Function(FunctionState),
    StateMachine(StateMachineState),
}

impl RemoteState {
    pub fn arn(&self) -> &ResourceArn {
        match self {
            Self::Function(f) => &f.function.arn,
            Self::StateMachine(s) => &s.machine.arn,
        }
    }
}
