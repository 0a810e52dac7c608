use serde::{Deserialize, Serialize};

use crate::adapter::SnapshotAdapter;
use crate::config::EditorConfig;
use crate::error::DocsmithError;
use crate::model::{DocumentTree, StepId};
use crate::ops::{
    Mutation, Reorder, ReorderScope, apply_mutation, apply_reorder, clamp_cursor,
    index_after_removal, remap_index,
};
use crate::resolve::{NavEntry, Neighbors, ResolvedPath, neighbors, resolve, visible_step_list};
use crate::review::{ReviewKind, ReviewOutcome, ReviewQueue, ReviewWorkflow, Submission};
use crate::selection::Selection;
use crate::snapshot::{self, ExportArtifact};

/// Selection and step cursor persisted between CLI invocations.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub selection: Selection,
    #[serde(default)]
    pub step_cursor: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// Transient status message; each review call overwrites the previous one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Result of applying a mutation through the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub mutated: bool,
    pub created_step: Option<StepId>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub index: usize,
    pub id: StepId,
    pub title: String,
    pub blocks: usize,
}

/// Read-only projection of the session for display.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submodule: Option<String>,
    pub steps: Vec<StepSummary>,
    pub step_cursor: usize,
    pub neighbors: Neighbors,
    pub dirty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Single owner of the document tree and everything derived from the operator's
/// position in it. All structural edits go through the pure engines.
#[derive(Clone, Debug)]
pub struct EditorSession {
    tree: DocumentTree,
    selection: Selection,
    step_cursor: usize,
    notice: Option<Notice>,
    storage_key: String,
    saved_digest: Option<String>,
}

impl EditorSession {
    /// Loads the configured snapshot. Storage failures degrade to an empty tree.
    pub fn open<A: SnapshotAdapter>(
        adapter: &A,
        config: &EditorConfig,
    ) -> Result<Self, DocsmithError> {
        let blob = match adapter.load_snapshot(&config.storage_key) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(key = %config.storage_key, error = %err, "snapshot unavailable; starting from an empty tree");
                None
            }
        };
        let tree = snapshot::load(blob.as_deref(), &config.frameworks);
        let mut session = Self::from_tree(tree, config);
        session.saved_digest = Some(snapshot::digest(&session.tree)?);
        Ok(session)
    }

    /// Wraps an in-memory tree. The session starts on the first configured framework
    /// and counts as unsaved.
    pub fn from_tree(tree: DocumentTree, config: &EditorConfig) -> Self {
        let framework = config
            .frameworks
            .first()
            .cloned()
            .or_else(|| tree.frameworks().next().map(str::to_string))
            .unwrap_or_default();
        Self {
            tree,
            selection: Selection::framework(framework),
            step_cursor: 0,
            notice: None,
            storage_key: config.storage_key.clone(),
            saved_digest: None,
        }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn step_cursor(&self) -> usize {
        self.step_cursor
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn resolved(&self) -> ResolvedPath<'_> {
        resolve(&self.tree, &self.selection)
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            selection: self.selection.clone(),
            step_cursor: self.step_cursor,
        }
    }

    /// Restores a persisted selection and cursor, dropping whatever no longer resolves.
    pub fn restore(&mut self, state: SessionState) {
        self.selection = state.selection.sanitized(&self.tree);
        self.step_cursor = state.step_cursor;
        self.clamp_step_cursor();
    }

    /// Moves the selection. Indices that do not resolve are dropped; any change resets
    /// the step cursor to the first step.
    pub fn select(&mut self, selection: Selection) -> bool {
        let next = selection.sanitized(&self.tree);
        if next == self.selection {
            return false;
        }
        self.selection = next;
        self.step_cursor = 0;
        true
    }

    /// Steps to the previous or next module/submodule in navigation order.
    pub fn navigate(&mut self, direction: Direction) -> Option<NavEntry> {
        let Neighbors { previous, next } = neighbors(&self.tree, &self.selection);
        let target = match direction {
            Direction::Previous => previous,
            Direction::Next => next,
        }?;
        let selection = target.selection(&self.selection.framework);
        self.select(selection);
        Some(target)
    }

    /// Points the step cursor at `step` in the visible list.
    pub fn focus_step(&mut self, step: usize) -> bool {
        if step >= self.resolved().steps.len() {
            return false;
        }
        self.step_cursor = step;
        true
    }

    /// Applies an edit. The step cursor stays on the focused step while that step is
    /// still visible, even when sibling deletions shift it or the selection indices.
    pub fn apply(&mut self, mutation: &Mutation) -> Applied {
        let result = apply_mutation(&self.tree, &self.selection, mutation);
        if !result.mutated {
            return Applied::default();
        }
        let focused = self.focused_step_id();
        let selection_changed = result.selection != self.selection;
        self.tree = result.tree;
        self.selection = result.selection;

        let steps = self.resolved().steps;
        let refocused = focused.and_then(|id| steps.iter().position(|step| step.id == id));
        match (refocused, mutation) {
            (Some(position), _) => self.step_cursor = position,
            _ if selection_changed => self.step_cursor = 0,
            (None, Mutation::DeleteStep { step }) => {
                self.step_cursor =
                    index_after_removal(self.step_cursor, *step).unwrap_or(self.step_cursor);
                self.clamp_step_cursor();
            }
            (None, _) => self.clamp_step_cursor(),
        }
        Applied {
            mutated: true,
            created_step: result.created_step,
        }
    }

    /// Reorders siblings. The step cursor follows the focused step when the visible
    /// step list is the one reordered.
    pub fn reorder(&mut self, reorder: &Reorder) -> bool {
        let visible = visible_step_list(&self.tree, &self.selection);
        let result = apply_reorder(&self.tree, &self.selection, reorder);
        if !result.moved {
            return false;
        }

        if let (ReorderScope::Steps { list }, Some(to)) = (&reorder.scope, reorder.to) {
            if visible == Some(*list) {
                self.step_cursor = remap_index(self.step_cursor, reorder.from, to);
            }
        }
        self.tree = result.tree;
        self.selection = result.selection;
        self.clamp_step_cursor();
        true
    }

    /// Replaces the whole tree, as when a snapshot is loaded over the current one.
    pub fn replace_tree(&mut self, tree: DocumentTree) {
        self.tree = tree;
        self.selection = self.selection.sanitized(&self.tree);
        self.clamp_step_cursor();
    }

    pub fn save<A: SnapshotAdapter>(&mut self, adapter: &A) -> Result<(), DocsmithError> {
        let blob = snapshot::save(&self.tree)?;
        adapter
            .save_snapshot(&self.storage_key, &blob)
            .map_err(|err| err.context(format!("save snapshot {}", self.storage_key)))?;
        self.saved_digest = Some(snapshot::digest(&self.tree)?);
        Ok(())
    }

    /// True when the tree differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        match (&self.saved_digest, snapshot::digest(&self.tree)) {
            (Some(saved), Ok(current)) => *saved != current,
            _ => true,
        }
    }

    /// Export artifact for the selected framework.
    pub fn export(&self) -> Result<ExportArtifact, DocsmithError> {
        snapshot::export(&self.tree, &self.selection.framework)
    }

    pub fn submit_for_review<Q: ReviewQueue>(
        &mut self,
        workflow: &mut ReviewWorkflow<Q>,
        kind: ReviewKind,
        index: usize,
    ) -> Result<Option<Submission>, DocsmithError> {
        let result = workflow.submit(&self.tree, &self.selection, kind, index);
        self.record(&result, |submission| {
            submission.as_ref().map(|_| "Submitted for review!")
        });
        result
    }

    pub fn approve<Q: ReviewQueue>(
        &mut self,
        workflow: &mut ReviewWorkflow<Q>,
        id: &str,
    ) -> Result<ReviewOutcome, DocsmithError> {
        let result = workflow.approve(id);
        self.record(&result, |_| Some("Approved!"));
        result
    }

    pub fn reject<Q: ReviewQueue>(
        &mut self,
        workflow: &mut ReviewWorkflow<Q>,
        id: &str,
        reason: &str,
    ) -> Result<ReviewOutcome, DocsmithError> {
        let result = workflow.reject(id, reason);
        self.record(&result, |_| Some("Rejected!"));
        result
    }

    pub fn view(&self) -> SessionView {
        let resolved = self.resolved();
        SessionView {
            selection: self.selection.clone(),
            module: resolved.module.map(|module| module.name.clone()),
            submodule: resolved.submodule.map(|sub| sub.name.clone()),
            steps: resolved
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| StepSummary {
                    index,
                    id: step.id.clone(),
                    title: step.title.clone(),
                    blocks: step.blocks.len(),
                })
                .collect(),
            step_cursor: self.step_cursor,
            neighbors: neighbors(&self.tree, &self.selection),
            dirty: self.is_dirty(),
            notice: self.notice.clone(),
        }
    }

    fn record<T>(
        &mut self,
        result: &Result<T, DocsmithError>,
        success: impl FnOnce(&T) -> Option<&'static str>,
    ) {
        match result {
            Ok(value) => {
                if let Some(message) = success(value) {
                    self.notice = Some(Notice::success(message));
                }
            }
            Err(err) => self.notice = Some(Notice::error(err.to_string())),
        }
    }

    fn focused_step_id(&self) -> Option<StepId> {
        self.resolved()
            .steps
            .get(self.step_cursor)
            .map(|step| step.id.clone())
    }

    fn clamp_step_cursor(&mut self) {
        let len = self.resolved().steps.len();
        self.step_cursor = clamp_cursor(self.step_cursor, len);
    }
}
