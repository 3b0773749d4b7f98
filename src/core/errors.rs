use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerumError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Remote error: {code} - {message}")]
    Remote {
        code: i64,
        message: String,
        details: Option<Value>,
    },

    #[error("Private key not found: a signing key is required for this operation")]
    PrivateKeyNotFound,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Batch stopped after {} submitted transaction(s): {source}", completed.len())]
    PartialBatch {
        completed: Vec<String>,
        source: Box<SerumError>,
    },

    #[error("Streaming is not supported by the {0} transport")]
    StreamingUnsupported(&'static str),

    #[error("Stream closed: {0}")]
    StreamClosed(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

/// Fieldless discriminant of [`SerumError`] for programmatic branching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Timeout,
    Decode,
    Remote,
    PrivateKeyNotFound,
    Signing,
    PartialBatch,
    StreamingUnsupported,
    StreamClosed,
    InvalidParameters,
    Serialization,
    Config,
}

impl SerumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::PrivateKeyNotFound => ErrorKind::PrivateKeyNotFound,
            Self::Signing(_) => ErrorKind::Signing,
            Self::PartialBatch { .. } => ErrorKind::PartialBatch,
            Self::StreamingUnsupported(_) => ErrorKind::StreamingUnsupported,
            Self::StreamClosed(_) => ErrorKind::StreamClosed,
            Self::InvalidParameters(_) => ErrorKind::InvalidParameters,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Structured details attached by the server, if any
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Remote { details, .. } => details.as_ref(),
            Self::PartialBatch { source, .. } => source.details(),
            _ => None,
        }
    }

    /// True when the server understood the request and rejected it
    pub fn is_remote(&self) -> bool {
        matches!(self.kind(), ErrorKind::Remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_error_keeps_details() {
        let err = SerumError::Remote {
            code: 3,
            message: "invalid payer specified".to_string(),
            details: Some(json!([{"field": "payerAddress"}])),
        };

        assert_eq!(err.kind(), ErrorKind::Remote);
        assert!(err.is_remote());
        assert_eq!(err.details(), Some(&json!([{"field": "payerAddress"}])));
        assert_eq!(err.to_string(), "Remote error: 3 - invalid payer specified");
    }

    #[test]
    fn test_partial_batch_message_counts_completed() {
        let err = SerumError::PartialBatch {
            completed: vec!["sig1".to_string()],
            source: Box::new(SerumError::Signing("bad transaction".to_string())),
        };

        assert_eq!(err.kind(), ErrorKind::PartialBatch);
        assert!(err.to_string().starts_with("Batch stopped after 1 submitted"));
        assert!(err.details().is_none());
    }
}
