use stratus_core::arn::{layer_arn, layer_name, looks_like_arn, partition_for_region};
use stratus_core::{CoreError, ResourceArn, ResourceKind};

#[test]
fn parses_function_arn_segments() {
    let arn = ResourceArn::parse(
        ResourceKind::Function,
        "arn:aws:lambda:eu-west-1:123456789012:function:orders",
    )
    .unwrap();

    assert_eq!(arn.partition(), "aws");
    assert_eq!(arn.region(), "eu-west-1");
    assert_eq!(arn.account(), "123456789012");
    assert_eq!(arn.name(), "orders");
    assert_eq!(arn.kind(), ResourceKind::Function);
}

#[test]
fn function_arn_may_carry_a_qualifier() {
    let raw = "arn:aws:lambda:eu-west-1:123456789012:function:orders:live";
    let arn = ResourceArn::parse(ResourceKind::Function, raw).unwrap();

    assert_eq!(arn.name(), "orders");
    assert_eq!(arn.as_str(), raw);
}

#[test]
fn state_machine_arn_rejects_a_qualifier() {
    let err = ResourceArn::parse(
        ResourceKind::StateMachine,
        "arn:aws:states:us-east-1:123456789012:stateMachine:Orders:extra",
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CoreError::InvalidArn {
            flag: "--step-function",
            ..
        }
    ));
}

#[test]
fn rejects_arn_of_the_wrong_service() {
    let err = ResourceArn::parse(
        ResourceKind::Function,
        "arn:aws:states:us-east-1:123456789012:stateMachine:Orders",
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid arn format for --function: arn:aws:states:us-east-1:123456789012:stateMachine:Orders"
    );
}

#[test]
fn rejects_malformed_arns() {
    for value in [
        "orders",
        "arn:aws:lambda:us-east-1:123456789012:function",
        "arn:aws:lambda::123456789012:function:orders",
        "arn:aws:lambda:us-east-1:acct:function:orders",
        "arn:aws:lambda:us-east-1:123456789012:layer:orders",
        "arn:aws:lambda:us-east-1:123456789012:function:",
    ] {
        assert!(
            ResourceArn::parse(ResourceKind::Function, value).is_err(),
            "{value} should not parse"
        );
    }
}

#[test]
fn qualify_uses_the_region_partition() {
    let arn = ResourceArn::qualify(ResourceKind::StateMachine, "us-gov-west-1", "123456789012", "Orders");

    assert_eq!(
        arn.as_str(),
        "arn:aws-us-gov:states:us-gov-west-1:123456789012:stateMachine:Orders"
    );
    assert_eq!(
        ResourceArn::parse(ResourceKind::StateMachine, arn.as_str()).unwrap(),
        arn
    );
}

#[test]
fn equality_is_case_sensitive() {
    let lower = ResourceArn::qualify(ResourceKind::Function, "us-east-1", "123456789012", "orders");
    let upper = ResourceArn::qualify(ResourceKind::Function, "us-east-1", "123456789012", "Orders");

    assert_ne!(lower, upper);
}

#[test]
fn partitions() {
    assert_eq!(partition_for_region("us-east-1"), "aws");
    assert_eq!(partition_for_region("cn-north-1"), "aws-cn");
    assert_eq!(partition_for_region("us-gov-east-1"), "aws-us-gov");
}

#[test]
fn layer_name_ignores_the_version() {
    assert_eq!(
        layer_name("arn:aws:lambda:sa-east-1:464622532012:layer:Datadog-Extension:11"),
        Some("Datadog-Extension")
    );
    assert_eq!(layer_name("arn:aws:lambda:sa-east-1:464622532012:function:x"), None);
    assert_eq!(layer_name("Datadog-Extension"), None);
}

#[test]
fn layer_arn_round_trips_through_layer_name() {
    let arn = layer_arn("cn-north-1", "464622532012", "Datadog-Node20-x", 112);

    assert_eq!(
        arn,
        "arn:aws-cn:lambda:cn-north-1:464622532012:layer:Datadog-Node20-x:112"
    );
    assert_eq!(layer_name(&arn), Some("Datadog-Node20-x"));
}

#[test]
fn arn_detection_is_structural() {
    assert!(looks_like_arn("arn:aws:lambda:us-east-1:1:function:x"));
    assert!(!looks_like_arn("orders-.*"));
}

#[test]
fn each_kind_names_its_own_flags() {
    assert_eq!(ResourceKind::Function.selector_flag(), "--function");
    assert_eq!(ResourceKind::Function.pattern_flag(), "--functions-regex");
    assert_eq!(ResourceKind::StateMachine.selector_flag(), "--step-function");
    assert_eq!(ResourceKind::StateMachine.pattern_flag(), "--step-functions-regex");
}

#[test]
fn arns_deduplicate_by_exact_string() {
    let raw = "arn:aws:states:us-east-1:123456789012:stateMachine:Orders";
    let set: std::collections::HashSet<ResourceArn> = [
        ResourceArn::parse(ResourceKind::StateMachine, raw).unwrap(),
        ResourceArn::parse(ResourceKind::StateMachine, raw).unwrap(),
    ]
    .into_iter()
    .collect();

    assert_eq!(set.len(), 1);
}
