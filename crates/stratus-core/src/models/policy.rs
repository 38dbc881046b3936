use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::managed::{
    API_KEY_ENV_VAR, API_KEY_SECRET_ARN_ENV_VAR, CAPTURE_LAMBDA_PAYLOAD_ENV_VAR,
    ENVIRONMENT_ENV_VAR, EXTRA_TAGS_ENV_VAR, FLUSH_TO_LOG_ENV_VAR, KMS_API_KEY_ENV_VAR,
    LOG_LEVEL_ENV_VAR, MERGE_XRAY_TRACES_ENV_VAR, SERVICE_ENV_VAR, SITE_ENV_VAR,
    TRACE_ENABLED_ENV_VAR, VERSION_ENV_VAR,
};

/// Sites the agent can ship to.
pub const SITES: &[&str] = &[
    "datadoghq.com",
    "datadoghq.eu",
    "us3.datadoghq.com",
    "us5.datadoghq.com",
    "ap1.datadoghq.com",
    "ddog-gov.com",
];

/// Account that publishes the runtime and extension layers.
pub const DEFAULT_LAYER_ACCOUNT: &str = "464622532012";
pub const GOVCLOUD_LAYER_ACCOUNT: &str = "002406178527";

/// Where the function reads its agent API key from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ApiKey {
    Plain(String),
    Kms(String),
    SecretArn(String),
}

impl ApiKey {
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Plain(_) => API_KEY_ENV_VAR,
            Self::Kms(_) => KMS_API_KEY_ENV_VAR,
            Self::SecretArn(_) => API_KEY_SECRET_ARN_ENV_VAR,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Plain(v) | Self::Kms(v) | Self::SecretArn(v) => v,
        }
    }
}

/// Desired instrumentation state for every targeted resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentPolicy {
    pub site: String,
    pub api_key: Option<ApiKey>,
    pub environment: Option<String>,
    pub service: Option<String>,
    pub version: Option<String>,
    pub extra_tags: Option<String>,
    pub tracing: bool,
    pub merge_xray_traces: bool,
    pub flush_metrics_to_logs: bool,
    pub log_level: Option<String>,
    pub capture_lambda_payload: bool,
    pub extension_version: Option<u32>,
    pub layer_version: Option<u32>,
    pub layer_account: String,
    pub forwarder_arn: Option<String>,
    /// Value written under the owner tag, e.g. `v0.4.0`.
    pub owner_tag_value: String,
}

impl InstrumentPolicy {
    pub fn new(site: impl Into<String>, owner_tag_value: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            api_key: None,
            environment: None,
            service: None,
            version: None,
            extra_tags: None,
            tracing: true,
            merge_xray_traces: false,
            flush_metrics_to_logs: true,
            log_level: None,
            capture_lambda_payload: false,
            extension_version: None,
            layer_version: None,
            layer_account: DEFAULT_LAYER_ACCOUNT.into(),
            forwarder_arn: None,
            owner_tag_value: owner_tag_value.into(),
        }
    }

    /// Reject policies that could never produce a working agent setup.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !SITES.contains(&self.site.as_str()) {
            return Err(CoreError::InvalidPolicy(format!(
                "invalid site {:?}, must be one of: {}",
                self.site,
                SITES.join(", ")
            )));
        }
        if self.extension_version.is_some() && self.api_key.is_none() {
            return Err(CoreError::InvalidPolicy(
                "an API key is required when the extension is installed \
                 (set DD_API_KEY, DD_KMS_API_KEY or DD_API_KEY_SECRET_ARN)"
                    .into(),
            ));
        }
        if self.extension_version.is_none()
            && self.layer_version.is_none()
            && self.forwarder_arn.is_none()
        {
            return Err(CoreError::InvalidPolicy(
                "nothing to install: pass an extension version, a layer version or a forwarder"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Managed environment entries this policy sets on a function.
    ///
    /// `DD_LAMBDA_HANDLER` is absent: it depends on the function's current
    /// handler and is derived by the diff.
    pub fn managed_environment(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert(SITE_ENV_VAR.to_string(), self.site.clone());
        if let Some(key) = &self.api_key {
            env.insert(key.env_var().to_string(), key.value().to_string());
        }
        let optional = [
            (ENVIRONMENT_ENV_VAR, &self.environment),
            (SERVICE_ENV_VAR, &self.service),
            (VERSION_ENV_VAR, &self.version),
            (EXTRA_TAGS_ENV_VAR, &self.extra_tags),
            (LOG_LEVEL_ENV_VAR, &self.log_level),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                env.insert(key.to_string(), value.clone());
            }
        }
        env.insert(TRACE_ENABLED_ENV_VAR.to_string(), self.tracing.to_string());
        env.insert(
            MERGE_XRAY_TRACES_ENV_VAR.to_string(),
            self.merge_xray_traces.to_string(),
        );
        env.insert(
            FLUSH_TO_LOG_ENV_VAR.to_string(),
            self.flush_metrics_to_logs.to_string(),
        );
        if self.capture_lambda_payload {
            env.insert(CAPTURE_LAMBDA_PAYLOAD_ENV_VAR.to_string(), "true".into());
        }
        env
    }
}

/// Which way a run reconciles: towards the policy, or back to the user's
/// own configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Instrument(InstrumentPolicy),
    Uninstrument,
}

impl Direction {
    /// Progressive verb for report headers.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Instrument(_) => "Instrumenting",
            Self::Uninstrument => "Uninstrumenting",
        }
    }
}
