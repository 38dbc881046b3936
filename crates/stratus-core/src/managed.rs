use crate::arn::layer_name;

pub const API_KEY_ENV_VAR: &str = "DD_API_KEY";
pub const API_KEY_SECRET_ARN_ENV_VAR: &str = "DD_API_KEY_SECRET_ARN";
pub const KMS_API_KEY_ENV_VAR: &str = "DD_KMS_API_KEY";
pub const SITE_ENV_VAR: &str = "DD_SITE";
pub const ENVIRONMENT_ENV_VAR: &str = "DD_ENV";
pub const SERVICE_ENV_VAR: &str = "DD_SERVICE";
pub const VERSION_ENV_VAR: &str = "DD_VERSION";
pub const EXTRA_TAGS_ENV_VAR: &str = "DD_TAGS";
pub const TRACE_ENABLED_ENV_VAR: &str = "DD_TRACE_ENABLED";
pub const MERGE_XRAY_TRACES_ENV_VAR: &str = "DD_MERGE_XRAY_TRACES";
pub const FLUSH_TO_LOG_ENV_VAR: &str = "DD_FLUSH_TO_LOG";
pub const LOG_LEVEL_ENV_VAR: &str = "DD_LOG_LEVEL";
pub const LAMBDA_HANDLER_ENV_VAR: &str = "DD_LAMBDA_HANDLER";
pub const CAPTURE_LAMBDA_PAYLOAD_ENV_VAR: &str = "DD_CAPTURE_LAMBDA_PAYLOAD";

/// Everything stratus considers its own on a remote resource.
///
/// Any environment key, layer, subscription filter or tag outside this set
/// belongs to the user and is never read, written or removed by a diff.
#[derive(Debug, Clone, Copy)]
pub struct ManagedFieldSet {
    pub version: u32,
    pub env_keys: &'static [&'static str],
    /// Layer names (the segment before the version) starting with this are ours.
    pub layer_prefix: &'static str,
    /// Subscription filters whose name contains this are ours.
    pub filter_marker: &'static str,
    pub owner_tag_key: &'static str,
}

impl ManagedFieldSet {
    /// Bump when adding or removing managed keys.
    pub const CURRENT: ManagedFieldSet = ManagedFieldSet {
        version: 1,
        env_keys: &[
            API_KEY_ENV_VAR,
            API_KEY_SECRET_ARN_ENV_VAR,
            KMS_API_KEY_ENV_VAR,
            SITE_ENV_VAR,
            ENVIRONMENT_ENV_VAR,
            SERVICE_ENV_VAR,
            VERSION_ENV_VAR,
            EXTRA_TAGS_ENV_VAR,
            TRACE_ENABLED_ENV_VAR,
            MERGE_XRAY_TRACES_ENV_VAR,
            FLUSH_TO_LOG_ENV_VAR,
            LOG_LEVEL_ENV_VAR,
            LAMBDA_HANDLER_ENV_VAR,
            CAPTURE_LAMBDA_PAYLOAD_ENV_VAR,
        ],
        layer_prefix: "Datadog-",
        filter_marker: "datadog-ci-filter",
        owner_tag_key: "dd_sls_ci",
    };

    pub fn is_managed_env_key(&self, key: &str) -> bool {
        self.env_keys.contains(&key)
    }

    /// Version-agnostic: `...:layer:Datadog-Python38:49` and `:50` both match.
    pub fn is_managed_layer(&self, layer_arn: &str) -> bool {
        layer_name(layer_arn).is_some_and(|name| name.starts_with(self.layer_prefix))
    }

    pub fn is_owned_filter(&self, filter_name: &str) -> bool {
        filter_name.contains(self.filter_marker)
    }
}
