//! stratus-reconciler
//!
//! Reconciliation engine for Lambda and Step Functions instrumentation.
//! Provider-agnostic: every remote call goes through `stratus_core::Provider`.
//!
//! Public API:
//! - `run()`: resolve → fetch → diff → preview → (confirm) → apply → report
//! - `resolve::check()` / `resolve::resolve()`: target resolution
//! - `diff::compute()`: change set for one snapshot
//! - `apply::apply()`: apply one change set

pub mod apply;
pub mod diff;
pub mod error;
pub mod fetch;
pub mod interaction;
pub mod report;
pub mod resolve;
pub mod retry;

use std::io::Write;

use stratus_core::models::outcome::RunSummary;
use stratus_core::models::policy::Direction;
use stratus_core::{Provider, ResourceKind};

pub use crate::error::ReconcileError;
pub use crate::interaction::{Interaction, Unattended};
pub use crate::resolve::{ResolvedTargets, SelectorSource, Selectors};
pub use crate::retry::RetryPolicy;

use crate::diff::Planned;
use crate::resolve::ResolveContext;

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Everything one invocation needs, already read from flags, config file
/// and session at the edge.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub kind: ResourceKind,
    pub direction: Direction,
    pub selectors: Selectors,
    /// Explicit `-r/--region`.
    pub region: Option<String>,
    /// Region of the loaded session.
    pub default_region: Option<String>,
    pub dry_run: bool,
    pub interactive: bool,
    /// Resources fetched or applied at the same time.
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl RunRequest {
    pub fn new(kind: ResourceKind, direction: Direction, selectors: Selectors) -> Self {
        Self {
            kind,
            direction,
            selectors,
            region: None,
            default_region: None,
            dry_run: false,
            interactive: false,
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
        }
    }

    fn purpose(&self) -> &'static str {
        match self.direction {
            Direction::Instrument(_) => "instrument",
            Direction::Uninstrument => "remove instrumentation",
        }
    }
}

/// Run one reconciliation and return the process exit code.
///
/// The report goes to `out`. Fatal errors print a single `[Error]` line and
/// return 1 before any fetch or apply starts.
pub async fn run(
    provider: &dyn Provider,
    interaction: &dyn Interaction,
    request: &RunRequest,
    out: &mut dyn Write,
) -> i32 {
    match reconcile(provider, interaction, request, out).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            if let Err(write_err) = writeln!(out, "[Error] {e}") {
                tracing::error!(error = %write_err, "failed to write report");
            }
            1
        }
    }
}

async fn reconcile(
    provider: &dyn Provider,
    interaction: &dyn Interaction,
    request: &RunRequest,
    out: &mut dyn Write,
) -> Result<i32, ReconcileError> {
    check_direction(request)?;

    let ctx = ResolveContext {
        kind: request.kind,
        region: request.region.as_deref(),
        default_region: request.default_region.as_deref(),
        interactive: request.interactive,
        purpose: request.purpose(),
        retry: request.retry,
    };
    let checked = resolve::check(&request.selectors, &ctx)?;
    let targets = resolve::resolve(provider, interaction, checked, &ctx).await?;

    let log_env = match &request.direction {
        Direction::Instrument(policy) => policy.environment.as_deref(),
        Direction::Uninstrument => None,
    };
    let fetched = fetch::fetch_all(provider, targets.iter(), log_env, request.concurrency).await;
    let planned = diff::plan_all(fetched, &request.direction);

    report::write_preview(
        out,
        request.kind,
        &request.direction,
        request.dry_run,
        &planned,
    )?;

    let has_changes = planned
        .iter()
        .filter_map(Planned::change_set)
        .any(|c| !c.is_empty());

    let outcomes = if request.dry_run || !has_changes {
        planned
            .into_iter()
            .map(|plan| match plan {
                Planned::Changes(changes) => apply::would_apply(&changes),
                Planned::Failed(outcome) => outcome,
            })
            .collect()
    } else {
        if request.interactive
            && !interaction.confirm_changes("Do you want to apply the above changes?")?
        {
            writeln!(out, "No updates applied.")?;
            return Ok(0);
        }
        apply::apply_all(provider, planned, request.concurrency).await
    };

    let summary = RunSummary { outcomes };
    report::write_summary(out, request.kind, request.dry_run, &summary)?;

    let code = summary.exit_code();
    tracing::info!(
        attempted = summary.attempted(),
        succeeded = summary.succeeded().count(),
        exit_code = code,
        "run finished"
    );
    Ok(code)
}

/// Policy checks that need no network access.
fn check_direction(request: &RunRequest) -> Result<(), ReconcileError> {
    let Direction::Instrument(policy) = &request.direction else {
        return Ok(());
    };
    if request.kind == ResourceKind::StateMachine && policy.forwarder_arn.is_none() {
        return Err(ReconcileError::Configuration(
            "\"--forwarder\" is required to instrument Step Functions.".into(),
        ));
    }
    if request.kind == ResourceKind::Function {
        policy.validate()?;
    }
    Ok(())
}
