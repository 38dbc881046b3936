use std::collections::BTreeMap;

use stratus_core::ManagedFieldSet;
use stratus_core::log_names::{
    is_tool_named_state_machine_log_group, log_group_arn, log_group_name_from_arn,
    state_machine_filter_name, state_machine_log_group,
};
use stratus_core::models::change_set::{
    ChangeSet, DeleteSubscriptionFilterRequest, LogGroupRequest, Operation, OperationGroup,
    PutSubscriptionFilterRequest, StateMachineLoggingUpdate, TagRequest, UntagRequest,
};
use stratus_core::models::policy::InstrumentPolicy;
use stratus_core::models::remote_state::{LoggingConfig, StateMachineState};

pub const FOREIGN_LOGGING_CONFLICT: &str = "cannot safely modify foreign logging configuration";

pub(crate) fn instrument(state: &StateMachineState, policy: &InstrumentPolicy) -> ChangeSet {
    let machine = &state.machine;
    let arn = &machine.arn;
    let region = arn.region();
    let mut changes = ChangeSet::new(arn.clone());

    if let Some(forwarder) = &policy.forwarder_arn {
        let destination = machine
            .logging
            .log_group_arn
            .as_deref()
            .and_then(log_group_name_from_arn);
        let logging_enabled = machine.logging.level != "OFF";

        let log_group_name = match destination {
            Some(name) => name.to_string(),
            None => state_machine_log_group(&machine.name, policy.environment.as_deref()),
        };

        if state.log_group.is_none() {
            changes.push(Operation::CreateLogGroup(LogGroupRequest {
                log_group_name: log_group_name.clone(),
                region: region.to_string(),
            }));
        }

        if destination.is_none() || !logging_enabled {
            let target = log_group_arn(region, arn.account(), &log_group_name);
            changes.push(Operation::UpdateStateMachine(StateMachineLoggingUpdate {
                state_machine_arn: arn.to_string(),
                logging: LoggingConfig::all_to(target),
                previous: machine.logging.clone(),
            }));
        }

        let managed = ManagedFieldSet::CURRENT;
        let subscribed = state.log_group.as_ref().is_some_and(|group| {
            group.subscription_filters.iter().any(|f| {
                managed.is_owned_filter(&f.filter_name) && &f.destination_arn == forwarder
            })
        });
        if !subscribed {
            changes.push(Operation::PutSubscriptionFilter(PutSubscriptionFilterRequest {
                destination_arn: forwarder.clone(),
                filter_name: state_machine_filter_name(&machine.name),
                filter_pattern: String::new(),
                log_group_name,
                region: region.to_string(),
            }));
        }
    }

    let owner = ManagedFieldSet::CURRENT.owner_tag_key;
    if state.tags.get(owner) != Some(&policy.owner_tag_value) {
        changes.push(Operation::TagResource(TagRequest {
            resource_arn: arn.to_string(),
            tags: BTreeMap::from([(owner.to_string(), policy.owner_tag_value.clone())]),
        }));
    }

    changes
}

/// Remove our subscription, and the logging setup itself when stratus
/// created it. Foreign logging is left alone and reported as a conflict.
pub(crate) fn uninstrument(state: &StateMachineState) -> ChangeSet {
    let managed = ManagedFieldSet::CURRENT;
    let machine = &state.machine;
    let arn = &machine.arn;
    let region = arn.region();
    let mut changes = ChangeSet::new(arn.clone());

    let destination = machine
        .logging
        .log_group_arn
        .as_deref()
        .and_then(log_group_name_from_arn);

    if let Some(group_name) = destination {
        let filters = state
            .log_group
            .as_ref()
            .map(|g| g.subscription_filters.as_slice())
            .unwrap_or_default();
        let (owned, foreign): (Vec<_>, Vec<_>) = filters
            .iter()
            .partition(|f| managed.is_owned_filter(&f.filter_name));

        if owned.is_empty() && !foreign.is_empty() {
            changes.conflict(OperationGroup::Logging, FOREIGN_LOGGING_CONFLICT);
        } else {
            for filter in &owned {
                changes.push(Operation::DeleteSubscriptionFilter(
                    DeleteSubscriptionFilterRequest {
                        filter_name: filter.filter_name.clone(),
                        log_group_name: group_name.to_string(),
                        region: region.to_string(),
                    },
                ));
            }

            // A group we created and nobody else subscribes to goes with us.
            if foreign.is_empty()
                && is_tool_named_state_machine_log_group(&machine.name, group_name)
            {
                changes.push(Operation::UpdateStateMachine(StateMachineLoggingUpdate {
                    state_machine_arn: arn.to_string(),
                    logging: LoggingConfig::disabled(),
                    previous: machine.logging.clone(),
                }));
                if state.log_group.is_some() {
                    changes.push(Operation::DeleteLogGroup(LogGroupRequest {
                        log_group_name: group_name.to_string(),
                        region: region.to_string(),
                    }));
                }
            }
        }
    }

    if state.tags.contains_key(managed.owner_tag_key) {
        changes.push(Operation::UntagResource(UntagRequest {
            resource_arn: arn.to_string(),
            tag_keys: vec![managed.owner_tag_key.to_string()],
        }));
    }

    changes
}
