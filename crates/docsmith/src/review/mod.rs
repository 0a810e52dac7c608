//! Review staging: subtrees are submitted to an external queue and later approved or
//! rejected there. The local tree is never modified by any of these calls.

pub mod client;
pub mod state;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client::{HttpReviewQueue, InMemoryReviewQueue, ReviewQueue};
pub use state::{ReviewEvent, ReviewState};

use crate::error::DocsmithError;
use crate::model::{DocumentTree, Module, Submodule};
use crate::selection::Selection;

/// Kind of subtree carried by a review item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReviewKind {
    Module,
    Submodule,
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewKind::Module => "module",
            ReviewKind::Submodule => "submodule",
        })
    }
}

/// Entry in the remote review queue.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: String,
    #[serde(default)]
    pub submitter: String,
    /// ISO-8601 timestamp as reported by the service.
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReviewKind>,
    pub data: Value,
}

/// Decoded review payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewPayload {
    Module(Module),
    Submodule(Submodule),
}

impl ReviewItem {
    /// Display name of the submitted subtree, if it carries one.
    pub fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }

    /// Decodes `data` as the declared kind; untyped items decode as a module.
    pub fn payload(&self) -> Result<ReviewPayload, DocsmithError> {
        let payload = match self.kind {
            Some(ReviewKind::Submodule) => {
                ReviewPayload::Submodule(serde_json::from_value(self.data.clone())?)
            }
            Some(ReviewKind::Module) | None => {
                ReviewPayload::Module(serde_json::from_value(self.data.clone())?)
            }
        };
        Ok(payload)
    }
}

/// Result of a successful submission.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Submission {
    pub kind: ReviewKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub state: ReviewState,
}

/// Result of an approve or reject decision.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub id: String,
    pub state: ReviewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Drives submissions and decisions against a [`ReviewQueue`], tracking the review state
/// of every item it has seen.
pub struct ReviewWorkflow<Q: ReviewQueue> {
    queue: Q,
    states: BTreeMap<String, ReviewState>,
}

impl<Q: ReviewQueue> ReviewWorkflow<Q> {
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            states: BTreeMap::new(),
        }
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Last known state of a queue item.
    pub fn state(&self, id: &str) -> Option<ReviewState> {
        self.states.get(id).copied()
    }

    /// Sends the addressed module (by index in the selected framework) or submodule (by
    /// index under the selected module). Returns `Ok(None)` when the address does not
    /// resolve.
    pub fn submit(
        &mut self,
        tree: &DocumentTree,
        selection: &Selection,
        kind: ReviewKind,
        index: usize,
    ) -> Result<Option<Submission>, DocsmithError> {
        let data = match kind {
            ReviewKind::Module => tree
                .module(&selection.framework, index)
                .map(serde_json::to_value),
            ReviewKind::Submodule => selection
                .selected_module()
                .and_then(|module| tree.module(&selection.framework, module))
                .and_then(|module| module.submodules.get(index))
                .map(serde_json::to_value),
        };
        let Some(data) = data.transpose()? else {
            tracing::debug!(%kind, index, "submission addressed no node; ignored");
            return Ok(None);
        };

        let state = ReviewState::Draft.apply(&ReviewEvent::Submit)?;
        let name = data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let id = self
            .queue
            .submit(&data)
            .map_err(|err| DocsmithError::from(err).context("submit for review"))?;
        if let Some(id) = &id {
            self.states.insert(id.clone(), state);
        }
        tracing::info!(%kind, name = %name, id = ?id, "submitted for review");

        Ok(Some(Submission {
            kind,
            name,
            id,
            state,
        }))
    }

    pub fn pending(&mut self) -> Result<Vec<ReviewItem>, DocsmithError> {
        let items = self
            .queue
            .pending()
            .map_err(|err| DocsmithError::from(err).context("list review queue"))?;
        for item in &items {
            self.states.insert(item.id.clone(), ReviewState::Pending);
        }
        Ok(items)
    }

    pub fn approve(&mut self, id: &str) -> Result<ReviewOutcome, DocsmithError> {
        let state = self.transition(id, &ReviewEvent::Approve)?;
        self.queue
            .approve(id)
            .map_err(|err| DocsmithError::from(err).context(format!("approve {id}")))?;
        self.states.insert(id.to_string(), state);
        tracing::info!(id, "approved review item");
        Ok(ReviewOutcome {
            id: id.to_string(),
            state,
            reason: None,
        })
    }

    /// Rejects an item. The reason is surfaced in the outcome when non-blank.
    pub fn reject(&mut self, id: &str, reason: &str) -> Result<ReviewOutcome, DocsmithError> {
        let event = ReviewEvent::Reject {
            reason: reason.to_string(),
        };
        let state = self.transition(id, &event)?;
        self.queue
            .reject(id, reason)
            .map_err(|err| DocsmithError::from(err).context(format!("reject {id}")))?;
        self.states.insert(id.to_string(), state);
        tracing::info!(id, reason, "rejected review item");
        Ok(ReviewOutcome {
            id: id.to_string(),
            state,
            reason: Some(reason.trim())
                .filter(|reason| !reason.is_empty())
                .map(str::to_string),
        })
    }

    /// Items never seen locally are assumed pending, as the queue only lists those.
    fn transition(&self, id: &str, event: &ReviewEvent) -> Result<ReviewState, DocsmithError> {
        let current = self.state(id).unwrap_or(ReviewState::Pending);
        Ok(current.apply(event)?)
    }
}
