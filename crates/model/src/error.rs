use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The provider could not be reached.
    Network,
    /// The credential was missing, invalid or not allowed.
    Authentication,
    /// The model provider is rate limited or the quota is exhausted.
    RateLimitExceeded,
    /// The content is moderated.
    Moderated,
    /// The provider answered with something that is not a completion.
    MalformedResponse,
    /// The request did not finish in time.
    Timeout,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "Network error"),
            ErrorKind::Authentication => write!(f, "Authentication failed"),
            ErrorKind::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            ErrorKind::Moderated => write!(f, "Content moderated"),
            ErrorKind::MalformedResponse => write!(f, "Malformed response"),
            ErrorKind::Timeout => write!(f, "Request timed out"),
            ErrorKind::Other => write!(f, "Model error"),
        }
    }
}
