use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kinds of compute resource stratus knows how to instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Function,
    StateMachine,
}

impl ResourceKind {
    /// ARN service segment, e.g. `lambda` in `arn:aws:lambda:...`.
    pub fn service(&self) -> &'static str {
        match self {
            Self::Function => "lambda",
            Self::StateMachine => "states",
        }
    }

    /// ARN resource-type segment.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::StateMachine => "stateMachine",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Function => "Lambda function",
            Self::StateMachine => "Step Function",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            Self::Function => "Lambda functions",
            Self::StateMachine => "Step Functions",
        }
    }

    /// The CLI flag explicit identifiers of this kind are passed with.
    pub fn selector_flag(&self) -> &'static str {
        match self {
            Self::Function => "--function",
            Self::StateMachine => "--step-function",
        }
    }

    /// The CLI flag a name pattern of this kind is passed with.
    pub fn pattern_flag(&self) -> &'static str {
        match self {
            Self::Function => "--functions-regex",
            Self::StateMachine => "--step-functions-regex",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully-qualified ARN naming one Lambda function or state machine.
///
/// Equality is exact, case-sensitive comparison of the ARN string; the
/// parsed segments are derived from it and never diverge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceArn {
    raw: String,
    partition: String,
    region: String,
    account: String,
    kind: ResourceKind,
    name: String,
}

impl ResourceArn {
    /// Parse `arn:<partition>:<service>:<region>:<account>:<type>:<name>[:<qualifier>]`.
    pub fn parse(kind: ResourceKind, value: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidArn {
            flag: kind.selector_flag(),
            value: value.to_string(),
        };

        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() < 7 || parts.len() > 8 || parts[0] != "arn" {
            return Err(invalid());
        }
        // Only Lambda ARNs carry a version/alias qualifier.
        if parts.len() == 8 && kind != ResourceKind::Function {
            return Err(invalid());
        }

        let (partition, service, region, account, resource_type, name) =
            (parts[1], parts[2], parts[3], parts[4], parts[5], parts[6]);

        if partition.is_empty()
            || service != kind.service()
            || region.is_empty()
            || account.is_empty()
            || !account.chars().all(|c| c.is_ascii_digit())
            || resource_type != kind.resource_type()
            || name.is_empty()
        {
            return Err(invalid());
        }

        Ok(Self {
            raw: value.to_string(),
            partition: partition.to_string(),
            region: region.to_string(),
            account: account.to_string(),
            kind,
            name: name.to_string(),
        })
    }

    /// Build the ARN for a bare resource name in a known region and account.
    pub fn qualify(kind: ResourceKind, region: &str, account: &str, name: &str) -> Self {
        let partition = partition_for_region(region);
        Self {
            raw: format!(
                "arn:{partition}:{}:{region}:{account}:{}:{name}",
                kind.service(),
                kind.resource_type()
            ),
            partition: partition.to_string(),
            region: region.to_string(),
            account: account.to_string(),
            kind,
            name: name.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceArn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ResourceArn {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Structural check used to keep ARNs out of name patterns.
pub fn looks_like_arn(value: &str) -> bool {
    value.starts_with("arn:")
}

/// The AWS partition a region belongs to.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else {
        "aws"
    }
}

/// Layer name of a Lambda layer version ARN, ignoring the trailing version.
///
/// `arn:aws:lambda:sa-east-1:000000000000:layer:Datadog-Extension:11` → `Datadog-Extension`.
pub fn layer_name(layer_arn: &str) -> Option<&str> {
    let parts: Vec<&str> = layer_arn.split(':').collect();
    match parts.as_slice() {
        ["arn", _, "lambda", _, _, "layer", name, ..] if !name.is_empty() => Some(name),
        _ => None,
    }
}

/// Build a Lambda layer version ARN.
pub fn layer_arn(region: &str, account: &str, name: &str, version: u32) -> String {
    let partition = partition_for_region(region);
    format!("arn:{partition}:lambda:{region}:{account}:layer:{name}:{version}")
}
