use crate::config::CredentialSource;

/// Build an `SdkConfig` from an optional region and a credential source.
///
/// Without a region the SDK falls back to the profile or environment; the
/// result may still have none, which only matters for bare names and
/// account-wide listings.
pub async fn build_aws_config(
    region: Option<&str>,
    creds: &CredentialSource,
) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = region {
        builder = builder.region(aws_config::Region::new(region.to_string()));
    }

    match creds {
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    builder.load().await
}
