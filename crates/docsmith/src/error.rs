use std::fmt;

use thiserror::Error;

/// Failures reported by the review queue collaborator or the review state machine.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review service responded with {code}: {message}")]
    Status { code: u16, message: String },
    #[error("review service unreachable: {0}")]
    Transport(String),
    #[error("review service is not configured")]
    NotConfigured,
    #[error("invalid review transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ReviewError>,
    },
}

impl ReviewError {
    /// Network-level failures the operator may simply retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ReviewError::Status { .. } | ReviewError::Transport(_) => true,
            ReviewError::NotConfigured | ReviewError::InvalidTransition { .. } => false,
            ReviewError::Context { source, .. } => source.is_transient(),
        }
    }
}

/// High-level error type shared across Docsmith components.
#[derive(Debug, Error)]
pub enum DocsmithError {
    #[error("workspace error: {0}")]
    Workspace(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DocsmithError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for DocsmithError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl DocsmithError {
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            DocsmithError::Workspace(msg) => DocsmithError::Workspace(format!("{ctx}: {msg}")),
            DocsmithError::Config(msg) => DocsmithError::Config(format!("{ctx}: {msg}")),
            DocsmithError::Serialization(msg) => {
                DocsmithError::Serialization(format!("{ctx}: {msg}"))
            }
            DocsmithError::Review(err) => DocsmithError::Review(ReviewError::Context {
                context: ctx.to_string(),
                source: Box::new(err),
            }),
            DocsmithError::Io(err) => DocsmithError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_message() {
        let err = DocsmithError::Config("bad key".into()).context("config.yaml");
        assert_eq!(err.to_string(), "config error: config.yaml: bad key");
    }

    #[test]
    fn review_context_keeps_transient_classification() {
        let err = DocsmithError::from(ReviewError::Transport("refused".into())).context("submit");
        match err {
            DocsmithError::Review(review) => {
                assert!(review.is_transient());
                assert!(review.to_string().starts_with("submit: "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
