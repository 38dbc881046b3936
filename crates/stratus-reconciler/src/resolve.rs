//! Resource Identifier Resolver.
//!
//! Turns selectors into an ordered, deduplicated set of fully-qualified
//! ARNs. Every configuration check runs in `check` before the first network
//! call; only `resolve` talks to the provider.

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use stratus_core::arn::looks_like_arn;
use stratus_core::{Provider, ResourceArn, ResourceKind};

use crate::error::ReconcileError;
use crate::interaction::Interaction;
use crate::retry::RetryPolicy;

/// Where explicit identifiers came from. Only affects error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorSource {
    #[default]
    Flag,
    ConfigFile,
}

/// Raw, user-supplied target selectors.
#[derive(Debug, Clone, Default)]
pub struct Selectors {
    /// ARNs or bare names, in the order given.
    pub identifiers: Vec<String>,
    pub source: SelectorSource,
    /// Regular expression matched against resource names.
    pub pattern: Option<String>,
}

/// Inputs to resolution besides the selectors.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub kind: ResourceKind,
    /// `-r/--region`.
    pub region: Option<&'a str>,
    /// Region of the loaded session, used when no region flag is given.
    pub default_region: Option<&'a str>,
    pub interactive: bool,
    /// What the run does, completing "No functions specified to ...".
    pub purpose: &'a str,
    pub retry: RetryPolicy,
}

impl ResolveContext<'_> {
    fn region(&self) -> Option<&str> {
        self.region.or(self.default_region)
    }
}

/// Ordered, duplicate-free resolution result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTargets {
    arns: IndexSet<ResourceArn>,
}

impl ResolvedTargets {
    pub fn from_arns(arns: impl IntoIterator<Item = ResourceArn>) -> Self {
        Self {
            arns: arns.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.arns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arns.is_empty()
    }

    /// Targets in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceArn> {
        self.arns.iter()
    }

    /// Targets grouped by region, regions in first-occurrence order.
    pub fn by_region(&self) -> IndexMap<&str, Vec<&ResourceArn>> {
        let mut groups: IndexMap<&str, Vec<&ResourceArn>> = IndexMap::new();
        for arn in &self.arns {
            groups.entry(arn.region()).or_default().push(arn);
        }
        groups
    }
}

/// Selectors after every offline check, ready for network resolution.
#[derive(Debug)]
pub enum CheckedSelectors {
    /// Explicit identifiers: already-parsed ARNs and bare names with the
    /// region they resolve in, interleaved in input order.
    Explicit(Vec<Identifier>),
    Pattern { regex: Regex, region: String },
    /// Interactive discovery of every resource in `region`.
    Discover { region: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Arn(ResourceArn),
    Bare { name: String, region: String },
}

/// Validate selectors without touching the network.
pub fn check(
    selectors: &Selectors,
    ctx: &ResolveContext<'_>,
) -> Result<CheckedSelectors, ReconcileError> {
    let kind = ctx.kind;

    if !selectors.identifiers.is_empty() && selectors.pattern.is_some() {
        return Err(ReconcileError::Configuration(match selectors.source {
            SelectorSource::Flag => format!(
                "\"{}\" and \"{}\" should not be used at the same time.",
                kind.selector_flag(),
                kind.pattern_flag()
            ),
            SelectorSource::ConfigFile => format!(
                "{} in config file and \"{}\" should not be used at the same time.",
                capitalized_noun(kind),
                kind.pattern_flag()
            ),
        }));
    }

    if let Some(pattern) = &selectors.pattern {
        if looks_like_arn(pattern) {
            return Err(ReconcileError::Configuration(format!(
                "\"{}\" isn't meant to be used with ARNs.",
                kind.pattern_flag()
            )));
        }
        let regex = Regex::new(pattern).map_err(|e| {
            ReconcileError::Configuration(format!(
                "invalid pattern for {}: {e}",
                kind.pattern_flag()
            ))
        })?;
        let region = ctx.region().ok_or_else(missing_region)?;
        return Ok(CheckedSelectors::Pattern {
            regex,
            region: region.to_string(),
        });
    }

    if selectors.identifiers.is_empty() {
        if !ctx.interactive {
            return Err(nothing_specified(ctx));
        }
        let region = ctx.region().ok_or_else(missing_region)?;
        return Ok(CheckedSelectors::Discover {
            region: region.to_string(),
        });
    }

    let mut identifiers = Vec::with_capacity(selectors.identifiers.len());
    let mut unresolved = Vec::new();
    for raw in &selectors.identifiers {
        let raw = raw.trim();
        if looks_like_arn(raw) {
            identifiers.push(Identifier::Arn(ResourceArn::parse(kind, raw)?));
            continue;
        }
        // Only Lambda resolves bare names.
        if kind != ResourceKind::Function {
            return Err(ReconcileError::Configuration(format!(
                "invalid arn format for {}: {raw}",
                kind.selector_flag()
            )));
        }
        match ctx.region() {
            Some(region) => identifiers.push(Identifier::Bare {
                name: raw.to_string(),
                region: region.to_string(),
            }),
            None => unresolved.push(raw),
        }
    }

    if !unresolved.is_empty() {
        return Err(ReconcileError::Configuration(format!(
            "No default region specified for {unresolved:?}. Use -r, --region, or use a full function ARN"
        )));
    }

    Ok(CheckedSelectors::Explicit(identifiers))
}

/// Resolve checked selectors into concrete targets.
///
/// Network calls: one STS identity call when bare names are present, one
/// listing (with retries) for patterns and interactive discovery.
pub async fn resolve(
    provider: &dyn Provider,
    interaction: &dyn Interaction,
    checked: CheckedSelectors,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedTargets, ReconcileError> {
    let kind = ctx.kind;

    let targets = match checked {
        CheckedSelectors::Explicit(identifiers) => {
            let needs_account = identifiers
                .iter()
                .any(|id| matches!(id, Identifier::Bare { .. }));
            let account = if needs_account {
                let account = provider.caller_account().await.map_err(|e| {
                    ReconcileError::Resolution(format!(
                        "Couldn't resolve the caller's account. Error: {e}"
                    ))
                })?;
                tracing::debug!(account = %account, "qualifying bare names");
                Some(account)
            } else {
                None
            };

            ResolvedTargets::from_arns(identifiers.into_iter().map(|id| match id {
                Identifier::Arn(arn) => arn,
                Identifier::Bare { name, region } => {
                    ResourceArn::qualify(kind, &region, account.as_deref().unwrap_or_default(), &name)
                }
            }))
        }

        CheckedSelectors::Pattern { regex, region } => {
            let all = list(provider, ctx, &region).await?;
            let matched =
                ResolvedTargets::from_arns(all.into_iter().filter(|arn| regex.is_match(arn.name())));
            if matched.is_empty() {
                return Err(ReconcileError::NoTargets(format!(
                    "Couldn't find any {} matching the pattern \"{}\".",
                    kind.plural_label(),
                    regex.as_str()
                )));
            }
            matched
        }

        CheckedSelectors::Discover { region } => {
            let all = list(provider, ctx, &region).await?;
            if all.is_empty() {
                return Err(ReconcileError::NoTargets(format!(
                    "Couldn't find any {} in the specified region.",
                    kind.plural_label()
                )));
            }
            let picked = interaction.select_resources(kind, &all)?;
            ResolvedTargets::from_arns(picked)
        }
    };

    if targets.is_empty() {
        return Err(nothing_specified(ctx));
    }

    tracing::info!(
        kind = %kind,
        count = targets.len(),
        regions = targets.by_region().len(),
        "resolved targets"
    );
    Ok(targets)
}

async fn list(
    provider: &dyn Provider,
    ctx: &ResolveContext<'_>,
    region: &str,
) -> Result<Vec<ResourceArn>, ReconcileError> {
    let kind = ctx.kind;
    ctx.retry
        .run("list resources", || provider.list_resources(kind, region))
        .await
        .map_err(|e| {
            ReconcileError::Resolution(format!(
                "Couldn't fetch {}. Error: {e}",
                kind.plural_label()
            ))
        })
}

fn missing_region() -> ReconcileError {
    ReconcileError::Configuration("No default region specified. Use `-r`, `--region`.".into())
}

fn nothing_specified(ctx: &ResolveContext<'_>) -> ReconcileError {
    ReconcileError::NoTargets(format!(
        "No {} specified to {}.",
        lowercase_noun(ctx.kind),
        ctx.purpose
    ))
}

fn lowercase_noun(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Function => "functions",
        ResourceKind::StateMachine => "step functions",
    }
}

fn capitalized_noun(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Function => "Functions",
        ResourceKind::StateMachine => "Step functions",
    }
}
