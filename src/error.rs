use thiserror::Error;

/// Possible errors when talking to the OpenDota API
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The request never produced a response body (connection, TLS, timeout)
    #[error("Transport failure: {0}")]
    TransportFailure(String),
    /// The response body was not valid JSON
    #[error("Cannot decode response body: {0}")]
    DecodeFailure(String),
    /// The response body decoded to nothing useful (`null`, `[]`, `{}`, ...)
    #[error("Empty response body")]
    EmptyResponse,
    /// The API reported that the requested resource does not exist
    #[error("Not Found")]
    NotFound,
    /// The API node answered with a maintenance or login page
    #[error("Node disabled")]
    NodeDisabled,
    /// Any other error message reported by the API
    #[error("Remote error: {0}")]
    RemoteError(String),
    /// A `Fast` call was dropped because the API was still cooling down
    #[error("API cooldown, request dropped")]
    RateLimited,
    /// The configured retry budget ran out
    #[error("Giving up after {attempts} attempts, last error: {last}")]
    RetriesExhausted {
        attempts: usize,
        last: Box<ErrorKind>,
    },
    /// An endpoint was called with arguments it cannot send
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The configured host is not a valid base URL
    #[error("Invalid API host: {0}")]
    InvalidHost(#[from] url::ParseError),
    /// The underlying HTTP client could not be constructed
    #[error("Cannot build HTTP client: {0}")]
    BuildClient(#[from] reqwest::Error),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TransportFailure(e1), Self::TransportFailure(e2))
            | (Self::DecodeFailure(e1), Self::DecodeFailure(e2))
            | (Self::RemoteError(e1), Self::RemoteError(e2))
            | (Self::InvalidArgument(e1), Self::InvalidArgument(e2)) => e1 == e2,
            (
                Self::RetriesExhausted {
                    attempts: a1,
                    last: l1,
                },
                Self::RetriesExhausted {
                    attempts: a2,
                    last: l2,
                },
            ) => a1 == a2 && l1 == l2,
            (Self::InvalidHost(e1), Self::InvalidHost(e2)) => e1 == e2,
            (Self::BuildClient(e1), Self::BuildClient(e2)) => e1.to_string() == e2.to_string(),
            (Self::EmptyResponse, Self::EmptyResponse)
            | (Self::NotFound, Self::NotFound)
            | (Self::NodeDisabled, Self::NodeDisabled)
            | (Self::RateLimited, Self::RateLimited) => true,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}

impl ErrorKind {
    /// Short, stable name of the failure kind, used for statistics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::TransportFailure(_) => "transport",
            Self::DecodeFailure(_) | Self::EmptyResponse => "decode",
            Self::NotFound => "not_found",
            Self::NodeDisabled => "node_disabled",
            Self::RemoteError(_) => "remote",
            Self::RateLimited => "rate_limited",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidHost(_) | Self::BuildClient(_) => "config",
        }
    }
}

/// The result type used throughout the crate
pub type Result<T> = std::result::Result<T, ErrorKind>;
