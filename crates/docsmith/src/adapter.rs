use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DocsmithError;

/// Key-value storage for snapshot blobs.
pub trait SnapshotAdapter: Send + Sync {
    fn load_snapshot(&self, key: &str) -> Result<Option<String>, DocsmithError>;
    fn save_snapshot(&self, key: &str, blob: &str) -> Result<(), DocsmithError>;
}

impl<A: SnapshotAdapter + ?Sized> SnapshotAdapter for Arc<A> {
    fn load_snapshot(&self, key: &str) -> Result<Option<String>, DocsmithError> {
        (**self).load_snapshot(key)
    }

    fn save_snapshot(&self, key: &str, blob: &str) -> Result<(), DocsmithError> {
        (**self).save_snapshot(key, blob)
    }
}

#[derive(Default)]
pub struct InMemoryAdapter {
    snapshots: Mutex<BTreeMap<String, String>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let adapter = Self::new();
        adapter.snapshots.lock().insert(key.into(), blob.into());
        adapter
    }
}

impl SnapshotAdapter for InMemoryAdapter {
    fn load_snapshot(&self, key: &str) -> Result<Option<String>, DocsmithError> {
        Ok(self.snapshots.lock().get(key).cloned())
    }

    fn save_snapshot(&self, key: &str, blob: &str) -> Result<(), DocsmithError> {
        self.snapshots
            .lock()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
