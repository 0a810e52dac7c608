use serde::{Deserialize, Serialize};

use crate::model::{Block, BlockContent, BlockKind, DocumentTree, StepId};
use crate::resolve::StepListAddress;
use crate::selection::Selection;

/// Structural edit addressed relative to the current selection.
///
/// Module operations target the selected framework, submodule operations the selected
/// module, and step/block operations the visible step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddModule {
        name: String,
    },
    EditModule {
        module: usize,
        name: String,
    },
    DeleteModule {
        module: usize,
    },
    AddSubmodule {
        name: String,
    },
    EditSubmodule {
        submodule: usize,
        name: String,
    },
    DeleteSubmodule {
        submodule: usize,
    },
    AddStep {
        title: String,
        #[serde(default)]
        blocks: Vec<Block>,
    },
    EditStep {
        step: usize,
        title: String,
    },
    DeleteStep {
        step: usize,
    },
    AddBlock {
        step: usize,
        content: BlockContent,
    },
    /// Replaces the block's full payload.
    EditBlock {
        step: usize,
        block: usize,
        content: BlockContent,
    },
    /// Changes the block type, restoring any payload stashed for that type.
    SwitchBlockKind {
        step: usize,
        block: usize,
        kind: BlockKind,
    },
    DeleteBlock {
        step: usize,
        block: usize,
    },
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddModule { .. } => "add_module",
            Mutation::EditModule { .. } => "edit_module",
            Mutation::DeleteModule { .. } => "delete_module",
            Mutation::AddSubmodule { .. } => "add_submodule",
            Mutation::EditSubmodule { .. } => "edit_submodule",
            Mutation::DeleteSubmodule { .. } => "delete_submodule",
            Mutation::AddStep { .. } => "add_step",
            Mutation::EditStep { .. } => "edit_step",
            Mutation::DeleteStep { .. } => "delete_step",
            Mutation::AddBlock { .. } => "add_block",
            Mutation::EditBlock { .. } => "edit_block",
            Mutation::SwitchBlockKind { .. } => "switch_block_kind",
            Mutation::DeleteBlock { .. } => "delete_block",
        }
    }
}

/// Outcome of `apply_mutation`. When `mutated` is false the tree and selection are
/// returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    pub tree: DocumentTree,
    pub selection: Selection,
    pub mutated: bool,
    pub created_step: Option<StepId>,
}

/// Sibling sequence a reorder applies to, within the selection's framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ReorderScope {
    Modules,
    Submodules { module: usize },
    Steps { list: StepListAddress },
    Blocks { list: StepListAddress, step: usize },
}

/// Drag-and-drop style relocation. `to == None` is a cancelled drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reorder {
    pub scope: ReorderScope,
    pub from: usize,
    pub to: Option<usize>,
}

impl Reorder {
    pub fn new(scope: ReorderScope, from: usize, to: usize) -> Self {
        Self {
            scope,
            from,
            to: Some(to),
        }
    }

    pub fn cancelled(scope: ReorderScope, from: usize) -> Self {
        Self {
            scope,
            from,
            to: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderResult {
    pub tree: DocumentTree,
    pub selection: Selection,
    pub moved: bool,
}
