//! Merging flags, config file and environment into one `RunRequest`.
//!
//! Flags win over the config file; the config file wins over built-in
//! defaults. Nothing here touches the network.

use std::time::Duration;

use stratus_core::ResourceKind;
use stratus_core::managed::{API_KEY_ENV_VAR, API_KEY_SECRET_ARN_ENV_VAR, KMS_API_KEY_ENV_VAR};
use stratus_core::models::policy::{ApiKey, Direction, InstrumentPolicy};
use stratus_reconciler::{RetryPolicy, RunRequest, SelectorSource, Selectors};

use crate::cli::{
    Command, FunctionPolicyArgs, FunctionTargets, LambdaCommand, RunArgs, StateMachineTargets,
    StepFunctionsCommand,
};
use crate::config::StratusConfig;

const DEFAULT_SITE: &str = "datadoghq.com";
const LEGACY_API_KEY_ENV_VAR: &str = "DATADOG_API_KEY";

/// Value of the owner tag written on instrumented resources.
pub fn owner_tag_value() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

/// The run-wide flags of whichever subcommand was invoked.
pub fn run_args(command: &Command) -> &RunArgs {
    match command {
        Command::Lambda(LambdaCommand::Instrument { run, .. })
        | Command::Lambda(LambdaCommand::Uninstrument { run, .. })
        | Command::StepFunctions(StepFunctionsCommand::Instrument { run, .. })
        | Command::StepFunctions(StepFunctionsCommand::Uninstrument { run, .. }) => run,
    }
}

/// First API key source present in the environment, plain keys first.
pub fn api_key_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<ApiKey> {
    let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    present(API_KEY_ENV_VAR)
        .or_else(|| present(LEGACY_API_KEY_ENV_VAR))
        .map(ApiKey::Plain)
        .or_else(|| present(KMS_API_KEY_ENV_VAR).map(ApiKey::Kms))
        .or_else(|| present(API_KEY_SECRET_ARN_ENV_VAR).map(ApiKey::SecretArn))
}

/// Build the engine's request. `default_region` is the loaded session's.
pub fn build_request(
    command: &Command,
    config: &StratusConfig,
    default_region: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> RunRequest {
    let (kind, direction, selectors) = match command {
        Command::Lambda(LambdaCommand::Instrument {
            targets, policy, ..
        }) => (
            ResourceKind::Function,
            Direction::Instrument(function_policy(policy, config, api_key_from_env(lookup))),
            function_selectors(targets, config),
        ),
        Command::Lambda(LambdaCommand::Uninstrument { targets, .. }) => (
            ResourceKind::Function,
            Direction::Uninstrument,
            function_selectors(targets, config),
        ),
        Command::StepFunctions(StepFunctionsCommand::Instrument {
            targets,
            forwarder,
            environment,
            ..
        }) => {
            let section = &config.stepfunctions;
            let mut policy = InstrumentPolicy::new(DEFAULT_SITE, owner_tag_value());
            policy.forwarder_arn = forwarder.clone().or_else(|| section.forwarder.clone());
            policy.environment = environment.clone().or_else(|| section.env.clone());
            (
                ResourceKind::StateMachine,
                Direction::Instrument(policy),
                state_machine_selectors(targets, config),
            )
        }
        Command::StepFunctions(StepFunctionsCommand::Uninstrument { targets, .. }) => (
            ResourceKind::StateMachine,
            Direction::Uninstrument,
            state_machine_selectors(targets, config),
        ),
    };

    let run = run_args(command);
    let mut request = RunRequest::new(kind, direction, selectors);
    request.region = run.region.clone().or_else(|| config.region.clone());
    request.default_region = default_region;
    request.dry_run = run.dry_run;
    request.interactive = run.interactive;
    if let Some(concurrency) = run.concurrency {
        request.concurrency = concurrency.max(1);
    }
    if let Some(max_retries) = run.max_retries {
        request.retry = RetryPolicy {
            max_retries,
            delay: Duration::from_secs(1),
        };
    }
    request
}

fn function_selectors(targets: &FunctionTargets, config: &StratusConfig) -> Selectors {
    selectors(
        &targets.functions,
        targets.functions_regex.as_ref(),
        &config.lambda.functions,
    )
}

fn state_machine_selectors(targets: &StateMachineTargets, config: &StratusConfig) -> Selectors {
    selectors(
        &targets.step_functions,
        targets.pattern.as_ref(),
        &config.stepfunctions.step_functions,
    )
}

/// Identifiers from flags replace the config file's list entirely.
fn selectors(flags: &[String], pattern: Option<&String>, configured: &[String]) -> Selectors {
    let (identifiers, source) = if flags.is_empty() && !configured.is_empty() {
        (configured.to_vec(), SelectorSource::ConfigFile)
    } else {
        (flags.to_vec(), SelectorSource::Flag)
    };
    Selectors {
        identifiers,
        source,
        pattern: pattern.cloned(),
    }
}

fn function_policy(
    args: &FunctionPolicyArgs,
    config: &StratusConfig,
    api_key: Option<ApiKey>,
) -> InstrumentPolicy {
    let section = &config.lambda;
    let pick = |flag: &Option<String>, file: &Option<String>| flag.clone().or_else(|| file.clone());

    let site = pick(&args.site, &section.site).unwrap_or_else(|| DEFAULT_SITE.to_string());
    let mut policy = InstrumentPolicy::new(site, owner_tag_value());
    policy.api_key = api_key;
    policy.environment = pick(&args.environment, &section.env);
    policy.service = pick(&args.service, &section.service);
    policy.version = pick(&args.app_version, &section.version);
    policy.extra_tags = pick(&args.extra_tags, &section.extra_tags);
    policy.log_level = pick(&args.log_level, &section.log_level);
    policy.forwarder_arn = pick(&args.forwarder, &section.forwarder);
    policy.extension_version = args.extension_version.or(section.extension_version);
    policy.layer_version = args.layer_version.or(section.layer_version);
    if let Some(account) = pick(&args.layer_account, &section.layer_account) {
        policy.layer_account = account;
    }
    policy.tracing = args.tracing().or(section.tracing).unwrap_or(true);
    policy.merge_xray_traces =
        args.merge_xray_traces || section.merge_xray_traces.unwrap_or(false);
    policy.flush_metrics_to_logs = args
        .flush_metrics_to_logs
        .or(section.flush_metrics_to_logs)
        .unwrap_or(true);
    policy.capture_lambda_payload =
        args.capture_lambda_payload || section.capture_lambda_payload.unwrap_or(false);
    policy
}
