use std::collections::BTreeMap;

use stratus_core::models::change_set::{FunctionConfigurationUpdate, PutSubscriptionFilterRequest};
use stratus_core::models::remote_state::{
    FunctionDescription, LoggingConfig, StateMachineDescription, SubscriptionFilter,
};
use stratus_core::{BoxFuture, Provider, ProviderError, ResourceArn, ResourceKind};

use crate::client::AwsProvider;
use crate::error::{classify, invalid_response};
use crate::{lambda, logs, states};

impl Provider for AwsProvider {
    fn caller_account(&self) -> BoxFuture<'_, Result<String, ProviderError>> {
        Box::pin(async move {
            let resp = self
                .sts()
                .get_caller_identity()
                .send()
                .await
                .map_err(classify)?;
            resp.account()
                .map(str::to_string)
                .ok_or_else(|| invalid_response("GetCallerIdentity without Account"))
        })
    }

    fn list_resources<'a>(
        &'a self,
        kind: ResourceKind,
        region: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ResourceArn>, ProviderError>> {
        Box::pin(async move {
            match kind {
                ResourceKind::Function => lambda::list_functions(&self.lambda(region)).await,
                ResourceKind::StateMachine => {
                    states::list_state_machines(&self.states(region)).await
                }
            }
        })
    }

    fn get_function<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<FunctionDescription, ProviderError>> {
        Box::pin(async move { lambda::get_function(&self.lambda(arn.region()), arn).await })
    }

    fn describe_state_machine<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<StateMachineDescription, ProviderError>> {
        Box::pin(
            async move { states::describe_state_machine(&self.states(arn.region()), arn).await },
        )
    }

    fn list_tags<'a>(
        &'a self,
        arn: &'a ResourceArn,
    ) -> BoxFuture<'a, Result<BTreeMap<String, String>, ProviderError>> {
        Box::pin(async move {
            match arn.kind() {
                ResourceKind::Function => lambda::list_tags(&self.lambda(arn.region()), arn).await,
                ResourceKind::StateMachine => {
                    states::list_tags(&self.states(arn.region()), arn).await
                }
            }
        })
    }

    fn describe_subscription_filters<'a>(
        &'a self,
        region: &'a str,
        log_group: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<SubscriptionFilter>>, ProviderError>> {
        Box::pin(
            async move { logs::describe_subscription_filters(&self.logs(region), log_group).await },
        )
    }

    fn update_function_configuration<'a>(
        &'a self,
        region: &'a str,
        update: &'a FunctionConfigurationUpdate,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            tracing::info!(function = %update.function_name, "updating function configuration");
            lambda::update_function_configuration(&self.lambda(region), update).await
        })
    }

    fn update_state_machine_logging<'a>(
        &'a self,
        arn: &'a ResourceArn,
        logging: &'a LoggingConfig,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            tracing::info!(state_machine = %arn, level = %logging.level, "updating state machine logging");
            states::update_logging(&self.states(arn.region()), arn, logging).await
        })
    }

    fn create_log_group<'a>(
        &'a self,
        region: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            tracing::info!(region, log_group = name, "creating log group");
            logs::create_log_group(&self.logs(region), name).await
        })
    }

    fn delete_log_group<'a>(
        &'a self,
        region: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            tracing::info!(region, log_group = name, "deleting log group");
            logs::delete_log_group(&self.logs(region), name).await
        })
    }

    fn put_subscription_filter<'a>(
        &'a self,
        region: &'a str,
        filter: &'a PutSubscriptionFilterRequest,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            tracing::info!(
                region,
                log_group = %filter.log_group_name,
                filter = %filter.filter_name,
                "putting subscription filter"
            );
            logs::put_subscription_filter(&self.logs(region), filter).await
        })
    }

    fn delete_subscription_filter<'a>(
        &'a self,
        region: &'a str,
        log_group: &'a str,
        filter_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            tracing::info!(region, log_group, filter = filter_name, "deleting subscription filter");
            logs::delete_subscription_filter(&self.logs(region), log_group, filter_name).await
        })
    }

    fn tag_resource<'a>(
        &'a self,
        arn: &'a ResourceArn,
        tags: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            match arn.kind() {
                ResourceKind::Function => {
                    lambda::tag_resource(&self.lambda(arn.region()), arn, tags).await
                }
                ResourceKind::StateMachine => {
                    states::tag_resource(&self.states(arn.region()), arn, tags).await
                }
            }
        })
    }

    fn untag_resource<'a>(
        &'a self,
        arn: &'a ResourceArn,
        keys: &'a [String],
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            match arn.kind() {
                ResourceKind::Function => {
                    lambda::untag_resource(&self.lambda(arn.region()), arn, keys).await
                }
                ResourceKind::StateMachine => {
                    states::untag_resource(&self.states(arn.region()), arn, keys).await
                }
            }
        })
    }
}
