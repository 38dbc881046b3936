//! Outcome Aggregator & Reporter.
//!
//! Plain-text rendering of previews and run summaries. Everything here
//! writes to the caller's stream; nothing is logged.

use std::io::Write;

use serde_json::Value;
use stratus_core::ResourceKind;
use stratus_core::managed::{API_KEY_ENV_VAR, KMS_API_KEY_ENV_VAR};
use stratus_core::models::outcome::RunSummary;
use stratus_core::models::policy::Direction;

use crate::diff::Planned;
use crate::error::ReconcileError;

const DRY_RUN_PREFIX: &str = "[Dry Run] ";
const MASK: &str = "****";

fn prefix(dry_run: bool) -> &'static str {
    if dry_run { DRY_RUN_PREFIX } else { "" }
}

/// Header, resources to update, and every planned operation with the exact
/// parameters that will be sent (API keys masked).
pub fn write_preview(
    out: &mut dyn Write,
    kind: ResourceKind,
    direction: &Direction,
    dry_run: bool,
    planned: &[Planned],
) -> Result<(), ReconcileError> {
    let prefix = prefix(dry_run);
    writeln!(out, "{prefix}{} {}.", direction.verb(), kind.plural_label())?;

    let changing: Vec<_> = planned
        .iter()
        .filter_map(Planned::change_set)
        .filter(|c| !c.is_empty())
        .collect();

    for changes in planned.iter().filter_map(Planned::change_set) {
        for conflict in &changes.conflicts {
            writeln!(out, "[Warn] {}: {}", changes.resource, conflict.message)?;
        }
    }

    if changing.is_empty() {
        writeln!(out, "No updates will be applied.")?;
        return Ok(());
    }

    writeln!(out, "[!] {} to be updated:", capitalize(kind.plural_label()))?;
    for changes in &changing {
        writeln!(out, "\t- {}", changes.resource)?;
    }

    writeln!(out, "\n{prefix}Will apply the following updates:")?;
    for changes in &changing {
        for operation in &changes.operations {
            let mut parameters = operation.parameters()?;
            mask_secrets(&mut parameters);
            let rendered = serde_json::to_string_pretty(&parameters)?;
            writeln!(out, "{} -> {}", operation.name(), changes.resource)?;
            writeln!(out, "{rendered}")?;
        }
    }

    Ok(())
}

/// Counts of fully and partially updated resources, then every resource
/// with a failure or an unresolved conflict and the reason for each.
pub fn write_summary(
    out: &mut dyn Write,
    kind: ResourceKind,
    dry_run: bool,
    summary: &RunSummary,
) -> Result<(), ReconcileError> {
    let attempted = summary.attempted();
    let changed = summary.updated();
    let label = kind.plural_label();

    if dry_run {
        writeln!(
            out,
            "\n{DRY_RUN_PREFIX}{changed} of {attempted} {label} would be updated."
        )?;
    } else {
        writeln!(out, "\n[Info] Updated {changed} of {attempted} {label}.")?;
        let partial = summary.partially_updated();
        if partial > 0 {
            writeln!(
                out,
                "[Warn] Partially updated {partial} of {attempted} {label}."
            )?;
        }
    }

    let failed: Vec<_> = summary.with_failures().collect();
    if !failed.is_empty() {
        writeln!(
            out,
            "[Error] {} of {attempted} {label} failed:",
            failed.len()
        )?;
        for outcome in failed {
            for failure in &outcome.failures {
                writeln!(
                    out,
                    "\t- {}: {}: {}",
                    outcome.resource, failure.operation, failure.message
                )?;
            }
            if !outcome.skipped.is_empty() {
                writeln!(out, "\t  skipped: {}", outcome.skipped.join(", "))?;
            }
        }
    }

    let conflicted: Vec<_> = summary.with_conflicts().collect();
    if !conflicted.is_empty() {
        writeln!(
            out,
            "[Warn] {} of {attempted} {label} kept a conflicting configuration:",
            conflicted.len()
        )?;
        for outcome in conflicted {
            for conflict in &outcome.conflicts {
                writeln!(out, "\t- {}: {}", outcome.resource, conflict.message)?;
            }
        }
    }

    Ok(())
}

/// Replace API key values anywhere in a request body.
pub fn mask_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if (key == API_KEY_ENV_VAR || key == KMS_API_KEY_ENV_VAR) && inner.is_string() {
                    *inner = Value::String(MASK.to_string());
                } else {
                    mask_secrets(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
