use aws_config::{Region, SdkConfig};

/// `Provider` backed by the AWS SDKs.
///
/// Holds the caller's shared SDK config (credentials, retry settings, HTTP
/// client) and derives a regional client per call, so one provider serves
/// resources spread across regions.
#[derive(Clone)]
pub struct AwsProvider {
    config: SdkConfig,
}

impl AwsProvider {
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    /// Region the loaded config resolved to, if any (profile or environment).
    pub fn default_region(&self) -> Option<String> {
        self.config.region().map(|r| r.to_string())
    }

    pub(crate) fn sts(&self) -> aws_sdk_sts::Client {
        aws_sdk_sts::Client::new(&self.config)
    }

    pub(crate) fn lambda(&self, region: &str) -> aws_sdk_lambda::Client {
        let conf = aws_sdk_lambda::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_lambda::Client::from_conf(conf)
    }

    pub(crate) fn states(&self, region: &str) -> aws_sdk_sfn::Client {
        let conf = aws_sdk_sfn::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_sfn::Client::from_conf(conf)
    }

    pub(crate) fn logs(&self, region: &str) -> aws_sdk_cloudwatchlogs::Client {
        let conf = aws_sdk_cloudwatchlogs::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_cloudwatchlogs::Client::from_conf(conf)
    }
}
