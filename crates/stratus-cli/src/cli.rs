use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stratus")]
#[command(version)]
#[command(about = "Instrument Lambda functions and Step Functions with the Datadog agent", long_about = None)]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to <config dir>/stratus/config.json)
    #[arg(long, global = true, env = "STRATUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage Lambda function instrumentation
    #[command(subcommand)]
    Lambda(LambdaCommand),

    /// Manage Step Functions instrumentation
    #[command(subcommand, name = "stepfunctions")]
    StepFunctions(StepFunctionsCommand),
}

#[derive(Debug, Subcommand)]
pub enum LambdaCommand {
    /// Install the agent on Lambda functions
    #[command(disable_version_flag = true)]
    Instrument {
        #[command(flatten)]
        targets: FunctionTargets,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        policy: FunctionPolicyArgs,
    },

    /// Remove the agent from Lambda functions
    Uninstrument {
        #[command(flatten)]
        targets: FunctionTargets,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum StepFunctionsCommand {
    /// Forward state machine logs to the Datadog forwarder
    Instrument {
        #[command(flatten)]
        targets: StateMachineTargets,
        #[command(flatten)]
        run: RunArgs,
        /// ARN of the Datadog forwarder function
        #[arg(long)]
        forwarder: Option<String>,
        /// Environment suffix for created log groups
        #[arg(long = "env")]
        environment: Option<String>,
    },

    /// Stop forwarding state machine logs
    Uninstrument {
        #[command(flatten)]
        targets: StateMachineTargets,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FunctionTargets {
    /// Function ARN or name (repeatable)
    #[arg(short, long = "function", value_name = "ARN_OR_NAME")]
    pub functions: Vec<String>,

    /// Regular expression matched against function names
    #[arg(long, value_name = "REGEX")]
    pub functions_regex: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct StateMachineTargets {
    /// State machine ARN or name (repeatable)
    #[arg(long = "step-function", value_name = "ARN_OR_NAME")]
    pub step_functions: Vec<String>,

    /// Regular expression matched against state machine names
    #[arg(long = "step-functions-regex", value_name = "REGEX")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Region for bare names and account-wide listings
    #[arg(short, long)]
    pub region: Option<String>,

    /// Preview changes without applying them
    #[arg(short, long)]
    pub dry_run: bool,

    /// Pick resources and confirm changes at prompts
    #[arg(short, long)]
    pub interactive: bool,

    /// AWS profile to load credentials from
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Resources fetched or updated at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Retries for throttled listing calls
    #[arg(long)]
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FunctionPolicyArgs {
    /// ARN of the Datadog forwarder function to subscribe log groups to
    #[arg(long)]
    pub forwarder: Option<String>,

    /// Datadog site
    #[arg(long, env = "DD_SITE")]
    pub site: Option<String>,

    /// Value of DD_ENV
    #[arg(long = "env")]
    pub environment: Option<String>,

    /// Value of DD_SERVICE
    #[arg(long)]
    pub service: Option<String>,

    /// Value of DD_VERSION
    #[arg(long = "version", value_name = "VERSION")]
    pub app_version: Option<String>,

    /// Value of DD_TAGS, comma-separated key:value pairs
    #[arg(long)]
    pub extra_tags: Option<String>,

    /// Version of the Datadog Lambda extension layer
    #[arg(long)]
    pub extension_version: Option<u32>,

    /// Version of the Datadog runtime library layer
    #[arg(long)]
    pub layer_version: Option<u32>,

    /// Account publishing the layers
    #[arg(long)]
    pub layer_account: Option<String>,

    /// Enable tracing
    #[arg(long, overrides_with = "no_tracing")]
    pub tracing: bool,

    /// Disable tracing
    #[arg(long, overrides_with = "tracing")]
    pub no_tracing: bool,

    /// Merge X-Ray traces with Datadog traces
    #[arg(long)]
    pub merge_xray_traces: bool,

    /// Send custom metrics through logs
    #[arg(long, value_name = "BOOL")]
    pub flush_metrics_to_logs: Option<bool>,

    /// Value of DD_LOG_LEVEL
    #[arg(long)]
    pub log_level: Option<String>,

    /// Capture request and response payloads
    #[arg(long)]
    pub capture_lambda_payload: bool,
}

impl FunctionPolicyArgs {
    /// `--tracing`/`--no-tracing`, whichever came last, if either was given.
    pub fn tracing(&self) -> Option<bool> {
        if self.no_tracing {
            Some(false)
        } else if self.tracing {
            Some(true)
        } else {
            None
        }
    }
}
