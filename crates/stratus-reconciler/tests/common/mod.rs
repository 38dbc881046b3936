#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use stratus_core::models::change_set::{FunctionConfigurationUpdate, PutSubscriptionFilterRequest};
use stratus_core::models::remote_state::{
    FunctionDescription, LoggingConfig, StateMachineDescription, SubscriptionFilter,
};
use stratus_core::{BoxFuture, Provider, ProviderError, ResourceArn, ResourceKind};
use stratus_reconciler::{Interaction, ReconcileError};

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "us-east-1";
pub const FORWARDER: &str = "arn:aws:lambda:us-east-1:123456789012:function:datadog-forwarder";

const MUTATING: &[&str] = &[
    "UpdateFunctionConfiguration",
    "UpdateStateMachine",
    "CreateLogGroup",
    "DeleteLogGroup",
    "PutSubscriptionFilter",
    "DeleteSubscriptionFilter",
    "TagResource",
    "UntagResource",
];

pub fn function_arn(name: &str) -> ResourceArn {
    ResourceArn::qualify(ResourceKind::Function, REGION, ACCOUNT, name)
}

pub fn state_machine_arn(name: &str) -> ResourceArn {
    ResourceArn::qualify(ResourceKind::StateMachine, REGION, ACCOUNT, name)
}

pub fn function(name: &str, runtime: &str) -> FunctionDescription {
    FunctionDescription {
        arn: function_arn(name),
        name: name.to_string(),
        runtime: Some(runtime.to_string()),
        handler: Some("index.handler".to_string()),
        architectures: vec!["x86_64".to_string()],
        environment: BTreeMap::new(),
        layers: Vec::new(),
        tags: BTreeMap::new(),
    }
}

pub fn state_machine(name: &str, logging: LoggingConfig) -> StateMachineDescription {
    StateMachineDescription {
        arn: state_machine_arn(name),
        name: name.to_string(),
        logging,
    }
}

pub fn filter(log_group: &str, name: &str, destination: &str) -> SubscriptionFilter {
    SubscriptionFilter {
        filter_name: name.to_string(),
        log_group_name: log_group.to_string(),
        destination_arn: destination.to_string(),
        filter_pattern: String::new(),
    }
}

pub fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// In-memory provider. Mutations change the stored state so a second run
/// sees the first run's effect. Every call is recorded as
/// `"<Operation> <target>"`.
#[derive(Default)]
pub struct FakeProvider {
    pub account: String,
    pub functions: Mutex<BTreeMap<String, FunctionDescription>>,
    pub state_machines: Mutex<BTreeMap<String, StateMachineDescription>>,
    pub state_machine_tags: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
    /// Log group name → subscription filters.
    pub log_groups: Mutex<BTreeMap<String, Vec<SubscriptionFilter>>>,
    /// Errors returned by listing calls before the listing succeeds.
    pub list_failures: Mutex<VecDeque<ProviderError>>,
    /// `(operation, target)` → error, returned every time.
    pub failures: Mutex<HashMap<(String, String), ProviderError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            account: ACCOUNT.to_string(),
            ..Default::default()
        }
    }

    pub fn with_function(self, function: FunctionDescription) -> Self {
        self.functions
            .lock()
            .unwrap()
            .insert(function.arn.to_string(), function);
        self
    }

    pub fn with_state_machine(
        self,
        machine: StateMachineDescription,
        tags: BTreeMap<String, String>,
    ) -> Self {
        let arn = machine.arn.to_string();
        self.state_machines
            .lock()
            .unwrap()
            .insert(arn.clone(), machine);
        self.state_machine_tags.lock().unwrap().insert(arn, tags);
        self
    }

    pub fn with_log_group(self, name: &str, filters: Vec<SubscriptionFilter>) -> Self {
        self.log_groups
            .lock()
            .unwrap()
            .insert(name.to_string(), filters);
        self
    }

    pub fn failing(self, operation: &str, target: &str, error: ProviderError) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((operation.to_string(), target.to_string()), error);
        self
    }

    pub fn failing_listing(self, errors: Vec<ProviderError>) -> Self {
        self.list_failures.lock().unwrap().extend(errors);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| MUTATING.iter().any(|m| c.split(' ').next() == Some(m)))
            .collect()
    }

    pub fn stored_function(&self, arn: &ResourceArn) -> FunctionDescription {
        self.functions.lock().unwrap()[arn.as_str()].clone()
    }

    fn record(&self, operation: &str, target: &str) -> Result<(), ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation} {target}"));
        match self
            .failures
            .lock()
            .unwrap()
            .get(&(operation.to_string(), target.to_string()))
        {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(what: &str) -> ProviderError {
        ProviderError::NotFound(format!("{what} not found"))
    }
}

impl Provider for FakeProvider {
    fn caller_account(&self) -> BoxFuture<'_, Result<String, ProviderError>> {
        Box::pin(async move {
            self.record("GetCallerIdentity", "")?;
            Ok(self.account.clone())
        })
    }

    fn list_resources<'a>(
        &'a self,
        kind: ResourceKind,
        region: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ResourceArn>, ProviderError>> {
        Box::pin(async move {
            self.record("List", region)?;
            if let Some(err) = self.list_failures.lock().unwrap().pop_front() {
                return Err(err);
            }
            let arns = match kind {
                ResourceKind::Function => self
                    .functions
                    .lock()
                    .unwrap()
                    .values()
                    .map(|f| f.arn.clone())
                    .collect(),
                ResourceKind::StateMachine => self
                    .state_machines
                    .lock()
                    .unwrap()
                    .values()
                    .map(|m| m.arn.clone())
                    .collect(),
            };
            Ok(arns)
        })
    }

    fn get_function<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<FunctionDescription, ProviderError>> {
        Box::pin(async move {
            self.record("GetFunction", arn.as_str())?;
            self.functions
                .lock()
                .unwrap()
                .get(arn.as_str())
                .cloned()
                .ok_or_else(|| Self::not_found("Function"))
        })
    }

    fn describe_state_machine<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<StateMachineDescription, ProviderError>> {
        Box::pin(async move {
            self.record("DescribeStateMachine", arn.as_str())?;
            self.state_machines
                .lock()
                .unwrap()
                .get(arn.as_str())
                .cloned()
                .ok_or_else(|| Self::not_found("State Machine"))
        })
    }

    fn list_tags<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<BTreeMap<String, String>, ProviderError>> {
        Box::pin(async move {
            self.record("ListTags", arn.as_str())?;
            let tags = match arn.kind() {
                ResourceKind::Function => self
                    .functions
                    .lock()
                    .unwrap()
                    .get(arn.as_str())
                    .map(|f| f.tags.clone()),
                ResourceKind::StateMachine => self
                    .state_machine_tags
                    .lock()
                    .unwrap()
                    .get(arn.as_str())
                    .cloned(),
            };
            tags.ok_or_else(|| Self::not_found("Resource"))
        })
    }

    fn describe_subscription_filters<'a>(
        &'a self,
        _region: &'a str,
        log_group: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<SubscriptionFilter>>, ProviderError>> {
        Box::pin(async move {
            self.record("DescribeSubscriptionFilters", log_group)?;
            Ok(self.log_groups.lock().unwrap().get(log_group).cloned())
        })
    }

    fn update_function_configuration<'a>(
        &'a self,
        _region: &'a str,
        update: &'a FunctionConfigurationUpdate,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("UpdateFunctionConfiguration", &update.function_name)?;
            let mut functions = self.functions.lock().unwrap();
            let function = functions
                .get_mut(&update.function_name)
                .ok_or_else(|| Self::not_found("Function"))?;
            if let Some(handler) = &update.handler {
                function.handler = Some(handler.clone());
            }
            if let Some(env) = &update.environment {
                function.environment = env.variables.clone();
            }
            if let Some(layers) = &update.layers {
                function.layers = layers.clone();
            }
            Ok(())
        })
    }

    fn update_state_machine_logging<'a>(
        &'a self,
        arn: &'a ResourceArn,
        logging: &'a LoggingConfig,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("UpdateStateMachine", arn.as_str())?;
            let mut machines = self.state_machines.lock().unwrap();
            let machine = machines
                .get_mut(arn.as_str())
                .ok_or_else(|| Self::not_found("State Machine"))?;
            machine.logging = logging.clone();
            Ok(())
        })
    }

    fn create_log_group<'a>(
        &'a self,
        _region: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("CreateLogGroup", name)?;
            self.log_groups
                .lock()
                .unwrap()
                .entry(name.to_string())
                .or_default();
            Ok(())
        })
    }

    fn delete_log_group<'a>(
        &'a self,
        _region: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("DeleteLogGroup", name)?;
            self.log_groups
                .lock()
                .unwrap()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| Self::not_found("Log group"))
        })
    }

    fn put_subscription_filter<'a>(
        &'a self,
        _region: &'a str,
        request: &'a PutSubscriptionFilterRequest,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("PutSubscriptionFilter", &request.log_group_name)?;
            let mut groups = self.log_groups.lock().unwrap();
            let filters = groups
                .get_mut(&request.log_group_name)
                .ok_or_else(|| Self::not_found("Log group"))?;
            filters.retain(|f| f.filter_name != request.filter_name);
            filters.push(filter(
                &request.log_group_name,
                &request.filter_name,
                &request.destination_arn,
            ));
            Ok(())
        })
    }

    fn delete_subscription_filter<'a>(
        &'a self,
        _region: &'a str,
        log_group: &'a str,
        filter_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("DeleteSubscriptionFilter", log_group)?;
            if let Some(filters) = self.log_groups.lock().unwrap().get_mut(log_group) {
                filters.retain(|f| f.filter_name != filter_name);
            }
            Ok(())
        })
    }

    fn tag_resource<'a>(
        &'a self,
        arn: &'a ResourceArn,
        tags: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("TagResource", arn.as_str())?;
            match arn.kind() {
                ResourceKind::Function => {
                    if let Some(f) = self.functions.lock().unwrap().get_mut(arn.as_str()) {
                        f.tags.extend(tags.clone());
                    }
                }
                ResourceKind::StateMachine => {
                    self.state_machine_tags
                        .lock()
                        .unwrap()
                        .entry(arn.to_string())
                        .or_default()
                        .extend(tags.clone());
                }
            }
            Ok(())
        })
    }

    fn untag_resource<'a>(
        &'a self,
        arn: &'a ResourceArn,
        keys: &'a [String],
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.record("UntagResource", arn.as_str())?;
            match arn.kind() {
                ResourceKind::Function => {
                    if let Some(f) = self.functions.lock().unwrap().get_mut(arn.as_str()) {
                        f.tags.retain(|k, _| !keys.contains(k));
                    }
                }
                ResourceKind::StateMachine => {
                    if let Some(tags) = self.state_machine_tags.lock().unwrap().get_mut(arn.as_str())
                    {
                        tags.retain(|k, _| !keys.contains(k));
                    }
                }
            }
            Ok(())
        })
    }
}

/// Scripted answers for interactive runs.
pub struct ScriptedInteraction {
    /// Indices into the candidate list to select.
    pub select: Vec<usize>,
    pub confirm: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    pub fn new(select: Vec<usize>, confirm: bool) -> Self {
        Self {
            select,
            confirm,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Interaction for ScriptedInteraction {
    fn select_resources(
        &self,
        _kind: ResourceKind,
        candidates: &[ResourceArn],
    ) -> Result<Vec<ResourceArn>, ReconcileError> {
        Ok(self
            .select
            .iter()
            .filter_map(|&i| candidates.get(i).cloned())
            .collect())
    }

    fn confirm_changes(&self, prompt: &str) -> Result<bool, ReconcileError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.confirm)
    }
}
