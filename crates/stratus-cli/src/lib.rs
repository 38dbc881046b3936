//! stratus-cli library root.
//!
//! Everything the `stratus` binary does besides process setup: merging
//! flags with the config file, building the AWS session and handing the
//! request to the engine. Exposed so integration tests can exercise the
//! merge rules without a terminal or credentials.

pub mod aws;
pub mod cli;
pub mod config;
pub mod prompt;
pub mod request;

use std::io::Write;

use stratus_aws::AwsProvider;
use stratus_reconciler::{Interaction, Unattended};

use crate::cli::Cli;
use crate::config::CredentialSource;
use crate::prompt::TerminalPrompt;

/// Run the parsed command and return the process exit code.
pub async fn execute(cli: Cli) -> eyre::Result<i32> {
    let config = config::load_config(cli.config.as_deref())?;
    let run = request::run_args(&cli.command);

    let creds = CredentialSource::resolve(run.profile.as_deref(), &config);
    let region = run.region.as_deref().or(config.region.as_deref());
    tracing::debug!(?creds, region = ?region, "loading aws config");
    let sdk_config = aws::build_aws_config(region, &creds).await;
    let provider = AwsProvider::new(sdk_config);

    let request = request::build_request(&cli.command, &config, provider.default_region(), |name| {
        std::env::var(name).ok()
    });

    let interaction: &dyn Interaction = if request.interactive {
        &TerminalPrompt
    } else {
        &Unattended
    };

    let mut stdout = std::io::stdout();
    let code = stratus_reconciler::run(&provider, interaction, &request, &mut stdout).await;
    stdout.flush()?;
    Ok(code)
}
