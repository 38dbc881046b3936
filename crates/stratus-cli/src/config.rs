use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when changing the shape of the file.
const CURRENT_VERSION: u32 = 1;

/// Optional on-disk defaults. Every value can be overridden by a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratusConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub lambda: LambdaSection,
    pub stepfunctions: StepFunctionsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LambdaSection {
    /// Function ARNs or names.
    pub functions: Vec<String>,
    pub forwarder: Option<String>,
    pub site: Option<String>,
    pub env: Option<String>,
    pub service: Option<String>,
    pub version: Option<String>,
    pub extra_tags: Option<String>,
    pub extension_version: Option<u32>,
    pub layer_version: Option<u32>,
    pub layer_account: Option<String>,
    pub tracing: Option<bool>,
    pub merge_xray_traces: Option<bool>,
    pub flush_metrics_to_logs: Option<bool>,
    pub log_level: Option<String>,
    pub capture_lambda_payload: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepFunctionsSection {
    /// State machine ARNs or names.
    pub step_functions: Vec<String>,
    pub forwarder: Option<String>,
    pub env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Profile { profile_name: String },
    DefaultChain,
}

impl CredentialSource {
    /// `--profile` wins over the config file; neither means the default chain.
    pub fn resolve(flag: Option<&str>, config: &StratusConfig) -> Self {
        match flag.or(config.profile.as_deref()) {
            Some(profile_name) => Self::Profile {
                profile_name: profile_name.to_string(),
            },
            None => Self::DefaultChain,
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("stratus"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config file.
///
/// An explicit path must exist. Without one, a missing default file is the
/// same as an empty config.
pub fn load_config(explicit: Option<&Path>) -> eyre::Result<StratusConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(StratusConfig::default());
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse_config(&contents)
        .map_err(|e| eyre::eyre!("invalid config at {}: {e}", path.display()))?;

    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn parse_config(contents: &str) -> eyre::Result<StratusConfig> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    if !value.is_object() {
        return Err(eyre::eyre!("expected a JSON object at the top level"));
    }
    let config: StratusConfig = serde_json::from_value(value)?;
    if config.config_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {} is newer than this build supports ({CURRENT_VERSION}). \
             Please update stratus.",
            config.config_version
        ));
    }
    Ok(config)
}
