use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::arn::{ResourceArn, ResourceKind};
use crate::error::ProviderError;
use crate::models::change_set::{
    FunctionConfigurationUpdate, PutSubscriptionFilterRequest,
};
use crate::models::remote_state::{
    FunctionDescription, LoggingConfig, StateMachineDescription, SubscriptionFilter,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability interface over the cloud provider's resource APIs.
///
/// Every call is an independent network round trip that may fail or be
/// throttled. Methods return boxed futures for dyn compatibility.
pub trait Provider: Send + Sync {
    /// Account id of the caller, used to qualify bare resource names.
    fn caller_account(&self) -> BoxFuture<'_, Result<String, ProviderError>>;

    /// Every resource of `kind` in `region`, all pages.
    fn list_resources<'a>(
        &'a self,
        kind: ResourceKind,
        region: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ResourceArn>, ProviderError>>;

    /// Function configuration and tags.
    fn get_function<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<FunctionDescription, ProviderError>>;

    fn describe_state_machine<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<StateMachineDescription, ProviderError>>;

    fn list_tags<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<BTreeMap<String, String>, ProviderError>>;

    /// Subscriptions on a log group. `Ok(None)` if the group does not exist.
    fn describe_subscription_filters<'a>(
        &'a self,
        region: &'a str,
        log_group: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<SubscriptionFilter>>, ProviderError>>;

    /// Covers environment, handler and layer changes in one request.
    fn update_function_configuration<'a>(
        &'a self,
        region: &'a str,
        update: &'a FunctionConfigurationUpdate,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn update_state_machine_logging<'a>(
        &'a self,
        arn: &'a ResourceArn,
        logging: &'a LoggingConfig,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn create_log_group<'a>(
        &'a self,
        region: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn delete_log_group<'a>(
        &'a self,
        region: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn put_subscription_filter<'a>(
        &'a self,
        region: &'a str,
        filter: &'a PutSubscriptionFilterRequest,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn delete_subscription_filter<'a>(
        &'a self,
        region: &'a str,
        log_group: &'a str,
        filter_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn tag_resource<'a>(
        &'a self,
        arn: &'a ResourceArn,
        tags: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;

    fn untag_resource<'a>(
        &'a self,
        arn: &'a ResourceArn,
        keys: &'a [String],
    ) -> BoxFuture<'a, Result<(), ProviderError>>;
}
