use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use stratus_core::ProviderError;

const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
];

const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException", "StateMachineDoesNotExist"];

/// Classify an SDK error for retry decisions and reporting.
///
/// Timeouts, dispatch failures and 5xx responses are transient; throttling
/// codes are throttled; missing-resource codes are not-found; everything
/// else is a permanent service error. The message is the service's own
/// text when it sent one.
pub fn classify<E>(err: SdkError<E, HttpResponse>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)
    ) {
        return ProviderError::Transient(format_err_chain(&err));
    }

    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| format_err_chain(&err));

    match err.code() {
        Some(code) if THROTTLING_CODES.contains(&code) => ProviderError::Throttled(message),
        Some(code) if NOT_FOUND_CODES.contains(&code) => ProviderError::NotFound(message),
        _ if err
            .raw_response()
            .is_some_and(|r| r.status().is_server_error()) =>
        {
            ProviderError::Transient(message)
        }
        _ => ProviderError::Service(message),
    }
}

/// Walk the full error chain and join all causes into one string.
///
/// AWS SDK errors often have terse `Display` impls (e.g. "service error")
/// but useful detail in the source chain.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

pub(crate) fn invalid_response(what: &str) -> ProviderError {
    ProviderError::InvalidResponse(what.to_string())
}
