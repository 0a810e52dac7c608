use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Publication state of a submitted subtree.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Draft,
    Pending,
    Published,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewEvent {
    Submit,
    Approve,
    Reject { reason: String },
}

impl ReviewEvent {
    fn name(&self) -> &'static str {
        match self {
            ReviewEvent::Submit => "submit",
            ReviewEvent::Approve => "approve",
            ReviewEvent::Reject { .. } => "reject",
        }
    }
}

impl ReviewState {
    /// Draft -> Pending on submit; Pending -> Published on approve; Pending -> Draft on
    /// reject. Every other pairing is rejected.
    pub fn apply(self, event: &ReviewEvent) -> Result<ReviewState, ReviewError> {
        match (self, event) {
            (ReviewState::Draft, ReviewEvent::Submit) => Ok(ReviewState::Pending),
            (ReviewState::Pending, ReviewEvent::Approve) => Ok(ReviewState::Published),
            (ReviewState::Pending, ReviewEvent::Reject { .. }) => Ok(ReviewState::Draft),
            (from, event) => Err(ReviewError::InvalidTransition {
                from: from.to_string(),
                event: event.name().to_string(),
            }),
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewState::Draft => "draft",
            ReviewState::Pending => "pending",
            ReviewState::Published => "published",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_paths() {
        let pending = ReviewState::Draft.apply(&ReviewEvent::Submit).unwrap();
        assert_eq!(pending, ReviewState::Pending);
        assert_eq!(
            pending.apply(&ReviewEvent::Approve).unwrap(),
            ReviewState::Published
        );
        assert_eq!(
            pending
                .apply(&ReviewEvent::Reject {
                    reason: "typo".into()
                })
                .unwrap(),
            ReviewState::Draft
        );
    }

    #[test]
    fn other_transitions_are_rejected() {
        let err = ReviewState::Published
            .apply(&ReviewEvent::Approve)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid review transition from published on approve"
        );
        assert!(ReviewState::Draft.apply(&ReviewEvent::Approve).is_err());
        assert!(ReviewState::Pending.apply(&ReviewEvent::Submit).is_err());
        assert!(!err.is_transient());
    }
}
