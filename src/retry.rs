use crate::{CallMode, ErrorKind};

/// An extension trait to help determine if a failed call is worth
/// sending again.
pub(crate) trait RetryExt {
    fn should_retry(&self) -> bool;
}

impl RetryExt for ErrorKind {
    #[allow(clippy::match_same_arms)]
    fn should_retry(&self) -> bool {
        match self {
            ErrorKind::TransportFailure(_) => true,
            ErrorKind::DecodeFailure(_) => true,
            ErrorKind::EmptyResponse => true,
            ErrorKind::RemoteError(_) => true,
            ErrorKind::NotFound => false,
            ErrorKind::NodeDisabled => false,
            ErrorKind::RateLimited => false,
            ErrorKind::RetriesExhausted { .. } => false,
            ErrorKind::InvalidArgument(_) => false,
            ErrorKind::InvalidHost(_) => false,
            ErrorKind::BuildClient(_) => false,
        }
    }
}

/// Retry decision for a failed attempt.
///
/// Returns `true` if the call should back off and be sent again, given the
/// call mode, the number of attempts made so far and the optional retry
/// budget (`None` means unbounded).
pub(crate) fn should_retry_call(
    err: &ErrorKind,
    mode: CallMode,
    attempts: usize,
    max_retries: Option<usize>,
) -> bool {
    if !mode.retries_failures() || !err.should_retry() {
        return false;
    }
    match max_retries {
        Some(max) => attempts <= max,
        None => true,
    }
}
