//! CloudWatch Logs naming conventions.
//!
//! Pure string functions, no AWS SDK dependency. These define where
//! Lambda and Step Functions write their logs and how stratus names the
//! log groups and subscription filters it creates.

use crate::arn::partition_for_region;
use crate::managed::ManagedFieldSet;

const VENDED_STATES_PREFIX: &str = "/aws/vendedlogs/states/";

/// The log group Lambda writes a function's logs to.
pub fn function_log_group(function_name: &str) -> String {
    format!("/aws/lambda/{function_name}")
}

/// Subscription filter name stratus uses on function log groups.
pub fn function_filter_name() -> String {
    ManagedFieldSet::CURRENT.filter_marker.to_string()
}

/// Log group stratus creates for a state machine that has logging disabled.
pub fn state_machine_log_group(state_machine_name: &str, env: Option<&str>) -> String {
    match env {
        Some(env) => format!("{VENDED_STATES_PREFIX}{state_machine_name}-Logs-{env}"),
        None => format!("{VENDED_STATES_PREFIX}{state_machine_name}-Logs"),
    }
}

/// Whether `log_group` follows the naming stratus uses when it creates a
/// state machine's log group, with or without an environment suffix.
pub fn is_tool_named_state_machine_log_group(state_machine_name: &str, log_group: &str) -> bool {
    let base = state_machine_log_group(state_machine_name, None);
    log_group == base
        || log_group
            .strip_prefix(&base)
            .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}

/// Subscription filter name stratus uses on state machine log groups.
pub fn state_machine_filter_name(state_machine_name: &str) -> String {
    format!(
        "{state_machine_name}-{}",
        ManagedFieldSet::CURRENT.filter_marker
    )
}

pub fn log_group_arn(region: &str, account: &str, log_group: &str) -> String {
    let partition = partition_for_region(region);
    format!("arn:{partition}:logs:{region}:{account}:log-group:{log_group}:*")
}

/// Extract the log group name from a log group ARN, with or without the
/// trailing `:*` stream wildcard.
pub fn log_group_name_from_arn(arn: &str) -> Option<&str> {
    let (_, rest) = arn.split_once(":log-group:")?;
    let name = rest.strip_suffix(":*").unwrap_or(rest);
    if name.is_empty() { None } else { Some(name) }
}
