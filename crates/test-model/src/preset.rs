use sales_agent_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// The preset answer for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetResponse {
    /// The request succeeds with this assistant text.
    #[serde(rename = "reply")]
    Reply(String),
    /// The request fails with an error of this kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

impl PresetResponse {
    /// Creates a successful reply.
    #[inline]
    pub fn reply<S: Into<String>>(text: S) -> Self {
        Self::Reply(text.into())
    }

    /// Creates a failure of the given kind.
    #[inline]
    pub fn failure(kind: ErrorKind) -> Self {
        Self::Failure(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let script = vec![
            PresetResponse::reply("The Corolla starts at $22k."),
            PresetResponse::failure(ErrorKind::RateLimitExceeded),
        ];

        let serialized = serde_json::to_string(&script).unwrap();
        assert!(serialized.contains(r#""type":"failure""#));
        assert!(serialized.contains(r#""data":"rate_limit_exceeded""#));

        let deserialized: Vec<PresetResponse> =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(script, deserialized);
    }
}
