use stratus_core::models::change_set::{Conflict, OperationGroup};
use stratus_core::models::outcome::{OperationFailure, OutcomeStatus, ResourceOutcome, RunSummary};
use stratus_core::models::policy::{ApiKey, Direction, InstrumentPolicy};
use stratus_core::{CoreError, ResourceArn, ResourceKind};

fn arn(name: &str) -> ResourceArn {
    ResourceArn::qualify(ResourceKind::Function, "us-east-1", "123456789012", name)
}

fn extension_policy() -> InstrumentPolicy {
    let mut policy = InstrumentPolicy::new("datadoghq.eu", "v0.4.0");
    policy.api_key = Some(ApiKey::Kms("AQICAH...".into()));
    policy.extension_version = Some(60);
    policy
}

#[test]
fn valid_policy_passes() {
    extension_policy().validate().unwrap();
}

#[test]
fn unknown_site_is_rejected() {
    let mut policy = extension_policy();
    policy.site = "datadoghq.invalid".into();

    let err = policy.validate().unwrap_err();

    assert!(matches!(err, CoreError::InvalidPolicy(_)));
    assert!(err.to_string().starts_with("invalid policy: invalid site \"datadoghq.invalid\""));
}

#[test]
fn extension_needs_an_api_key() {
    let mut policy = extension_policy();
    policy.api_key = None;

    assert!(policy.validate().is_err());
}

#[test]
fn empty_policy_installs_nothing() {
    let policy = InstrumentPolicy::new("datadoghq.com", "v0.4.0");

    let err = policy.validate().unwrap_err();

    assert!(err.to_string().contains("nothing to install"));
}

#[test]
fn forwarder_alone_is_enough() {
    let mut policy = InstrumentPolicy::new("datadoghq.com", "v0.4.0");
    policy.forwarder_arn =
        Some("arn:aws:lambda:us-east-1:123456789012:function:datadog-forwarder".into());

    policy.validate().unwrap();
}

#[test]
fn managed_environment_uses_the_key_source_variable() {
    let mut policy = extension_policy();
    policy.environment = Some("prod".into());
    policy.capture_lambda_payload = true;

    let env = policy.managed_environment();

    assert_eq!(env["DD_KMS_API_KEY"], "AQICAH...");
    assert!(!env.contains_key("DD_API_KEY"));
    assert_eq!(env["DD_SITE"], "datadoghq.eu");
    assert_eq!(env["DD_ENV"], "prod");
    assert_eq!(env["DD_TRACE_ENABLED"], "true");
    assert_eq!(env["DD_MERGE_XRAY_TRACES"], "false");
    assert_eq!(env["DD_FLUSH_TO_LOG"], "true");
    assert_eq!(env["DD_CAPTURE_LAMBDA_PAYLOAD"], "true");
    assert!(!env.contains_key("DD_SERVICE"));
    assert!(!env.contains_key("DD_LAMBDA_HANDLER"));
}

#[test]
fn direction_verbs() {
    assert_eq!(Direction::Instrument(extension_policy()).verb(), "Instrumenting");
    assert_eq!(Direction::Uninstrument.verb(), "Uninstrumenting");
}

fn failure(operation: &str) -> OperationFailure {
    OperationFailure {
        operation: operation.into(),
        message: "boom".into(),
    }
}

#[test]
fn outcome_status() {
    let ok = ResourceOutcome::new(arn("a"), vec!["TagResource".into()], vec![], vec![], vec![]);
    let partial = ResourceOutcome::new(
        arn("b"),
        vec!["TagResource".into()],
        vec![failure("CreateLogGroup")],
        vec!["PutSubscriptionFilter".into()],
        vec![],
    );
    let failed = ResourceOutcome::failed(arn("c"), "Describe", "gone");
    let conflicted = ResourceOutcome::new(
        arn("d"),
        vec![],
        vec![],
        vec![],
        vec![Conflict {
            group: OperationGroup::Logging,
            message: "foreign".into(),
        }],
    );

    assert_eq!(ok.status, OutcomeStatus::Succeeded);
    assert_eq!(partial.status, OutcomeStatus::PartiallyFailed);
    assert_eq!(failed.status, OutcomeStatus::Failed);
    assert_eq!(conflicted.status, OutcomeStatus::Succeeded);
    assert_eq!(conflicted.conflicts.len(), 1);
    assert!(partial.is_success());
    assert!(!failed.is_success());
    assert!(conflicted.is_success());
}

#[test]
fn empty_plan_succeeds() {
    let outcome = ResourceOutcome::new(arn("a"), vec![], vec![], vec![], vec![]);

    assert_eq!(outcome.status, OutcomeStatus::Succeeded);
}

#[test]
fn exit_code_is_zero_when_anything_succeeded() {
    let summary = RunSummary {
        outcomes: vec![
            ResourceOutcome::failed(arn("a"), "UpdateFunctionConfiguration", "boom"),
            ResourceOutcome::new(arn("b"), vec!["TagResource".into()], vec![], vec![], vec![]),
        ],
    };

    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.succeeded().count(), 1);
    assert_eq!(summary.with_failures().count(), 1);
}

#[test]
fn exit_code_is_one_when_everything_failed() {
    let summary = RunSummary {
        outcomes: vec![ResourceOutcome::failed(arn("a"), "Describe", "gone")],
    };

    assert_eq!(summary.exit_code(), 1);
    assert_eq!(RunSummary::default().exit_code(), 1);
}

#[test]
fn summary_counts_split_full_and_partial_updates() {
    let foreign = Conflict {
        group: OperationGroup::Logging,
        message: "foreign".into(),
    };
    let summary = RunSummary {
        outcomes: vec![
            ResourceOutcome::new(arn("a"), vec!["TagResource".into()], vec![], vec![], vec![]),
            ResourceOutcome::new(
                arn("b"),
                vec!["UntagResource".into()],
                vec![failure("DeleteSubscriptionFilter")],
                vec![],
                vec![],
            ),
            ResourceOutcome::new(arn("c"), vec![], vec![], vec![], vec![foreign]),
            ResourceOutcome::new(arn("d"), vec![], vec![], vec![], vec![]),
        ],
    };

    assert_eq!(summary.updated(), 1);
    assert_eq!(summary.partially_updated(), 1);
    assert_eq!(summary.with_conflicts().count(), 1);
    assert_eq!(summary.with_failures().count(), 1);
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn conflict_only_run_exits_zero() {
    let summary = RunSummary {
        outcomes: vec![ResourceOutcome::new(
            arn("a"),
            vec![],
            vec![],
            vec![],
            vec![Conflict {
                group: OperationGroup::Logging,
                message: "foreign".into(),
            }],
        )],
    };

    assert_eq!(summary.exit_code(), 0);
}
