use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use url::Url;

use crate::config::ReviewConfig;
use crate::error::ReviewError;
use crate::review::ReviewItem;

/// Remote review queue. Implementations report failures as [`ReviewError`] and never
/// touch local documents.
pub trait ReviewQueue: Send + Sync {
    /// Submits a module or submodule payload. Returns the queue's id for it when the
    /// service reports one.
    fn submit(&self, data: &Value) -> Result<Option<String>, ReviewError>;
    fn pending(&self) -> Result<Vec<ReviewItem>, ReviewError>;
    fn approve(&self, id: &str) -> Result<(), ReviewError>;
    fn reject(&self, id: &str, reason: &str) -> Result<(), ReviewError>;
}

impl<Q: ReviewQueue + ?Sized> ReviewQueue for Arc<Q> {
    fn submit(&self, data: &Value) -> Result<Option<String>, ReviewError> {
        (**self).submit(data)
    }

    fn pending(&self) -> Result<Vec<ReviewItem>, ReviewError> {
        (**self).pending()
    }

    fn approve(&self, id: &str) -> Result<(), ReviewError> {
        (**self).approve(id)
    }

    fn reject(&self, id: &str, reason: &str) -> Result<(), ReviewError> {
        (**self).reject(id, reason)
    }
}

/// Review service reached over HTTP with a bearer credential.
pub struct HttpReviewQueue {
    agent: ureq::Agent,
    base: Url,
    token: Option<String>,
}

impl HttpReviewQueue {
    pub fn new(base: Url, token: Option<String>, config: &ReviewConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_read(config.timeout())
            .timeout_write(config.timeout())
            .build();
        Self { agent, base, token }
    }

    /// Builds a queue from workspace config. Fails when no base URL is configured.
    pub fn from_config(config: &ReviewConfig) -> Result<Self, ReviewError> {
        let base = config.base_url.clone().ok_or(ReviewError::NotConfigured)?;
        if config.token().is_none() {
            tracing::debug!(env = %config.token_env, "no review token set; sending unauthenticated requests");
        }
        Ok(Self::new(base, config.token(), config))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ReviewError> {
        self.base
            .join(path)
            .map_err(|err| ReviewError::Transport(format!("invalid endpoint {path}: {err}")))
    }

    fn request(&self, method: &str, path: &str) -> Result<ureq::Request, ReviewError> {
        let url = self.endpoint(path)?;
        let mut request = self.agent.request(method, url.as_str());
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        Ok(request)
    }

    fn post(&self, path: &str, body: &Value, failure: &str) -> Result<String, ReviewError> {
        let request = self
            .request("POST", path)?
            .set("Content-Type", "application/json");
        let response = request
            .send_string(&body.to_string())
            .map_err(|err| map_error(err, failure))?;
        read_body(response)
    }
}

impl ReviewQueue for HttpReviewQueue {
    fn submit(&self, data: &Value) -> Result<Option<String>, ReviewError> {
        let body = self.post(
            "/api/submit-for-review",
            &json!({ "data": data }),
            "Failed to submit for review",
        )?;
        let id = serde_json::from_str::<Value>(&body).ok().and_then(|value| {
            value.get("id").and_then(|id| match id {
                Value::String(id) => Some(id.clone()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
        });
        Ok(id)
    }

    fn pending(&self) -> Result<Vec<ReviewItem>, ReviewError> {
        let response = self
            .request("GET", "/api/review-queue")?
            .call()
            .map_err(|err| map_error(err, "Failed to fetch review queue"))?;
        let body = read_body(response)?;
        serde_json::from_str(&body).map_err(|err| {
            ReviewError::Transport(format!("review queue returned an unreadable list: {err}"))
        })
    }

    fn approve(&self, id: &str) -> Result<(), ReviewError> {
        self.post("/api/approve-change", &json!({ "id": id }), "Failed to approve")?;
        Ok(())
    }

    fn reject(&self, id: &str, reason: &str) -> Result<(), ReviewError> {
        self.post(
            "/api/reject-change",
            &json!({ "id": id, "reason": reason }),
            "Failed to reject",
        )?;
        Ok(())
    }
}

fn read_body(response: ureq::Response) -> Result<String, ReviewError> {
    response
        .into_string()
        .map_err(|err| ReviewError::Transport(format!("failed reading response body: {err}")))
}

/// Non-2xx responses carry the response text; an empty body falls back to `failure`.
fn map_error(err: ureq::Error, failure: &str) -> ReviewError {
    match err {
        ureq::Error::Status(code, response) => {
            let text = response.into_string().unwrap_or_default();
            let message = if text.trim().is_empty() {
                failure.to_string()
            } else {
                text.trim().to_string()
            };
            ReviewError::Status { code, message }
        }
        other => ReviewError::Transport(other.to_string()),
    }
}

/// Review queue held in memory. Approving or rejecting removes the item.
#[derive(Default)]
pub struct InMemoryReviewQueue {
    submitter: String,
    items: Mutex<Vec<ReviewItem>>,
    decisions: Mutex<Vec<(String, Option<String>)>>,
    next_id: Mutex<u64>,
}

impl InMemoryReviewQueue {
    pub fn new(submitter: impl Into<String>) -> Self {
        Self {
            submitter: submitter.into(),
            ..Default::default()
        }
    }

    /// Ids decided so far, paired with the rejection reason (`None` for approvals).
    pub fn decisions(&self) -> Vec<(String, Option<String>)> {
        self.decisions.lock().clone()
    }

    fn take(&self, id: &str) -> Result<ReviewItem, ReviewError> {
        let mut items = self.items.lock();
        let position = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| ReviewError::Status {
                code: 404,
                message: format!("review item {id} not found"),
            })?;
        Ok(items.remove(position))
    }
}

impl ReviewQueue for InMemoryReviewQueue {
    fn submit(&self, data: &Value) -> Result<Option<String>, ReviewError> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            next.to_string()
        };
        self.items.lock().push(ReviewItem {
            id: id.clone(),
            submitter: self.submitter.clone(),
            submitted_at: String::new(),
            kind: None,
            data: data.clone(),
        });
        Ok(Some(id))
    }

    fn pending(&self) -> Result<Vec<ReviewItem>, ReviewError> {
        Ok(self.items.lock().clone())
    }

    fn approve(&self, id: &str) -> Result<(), ReviewError> {
        self.take(id)?;
        self.decisions.lock().push((id.to_string(), None));
        Ok(())
    }

    fn reject(&self, id: &str, reason: &str) -> Result<(), ReviewError> {
        self.take(id)?;
        self.decisions
            .lock()
            .push((id.to_string(), Some(reason.to_string())));
        Ok(())
    }
}
