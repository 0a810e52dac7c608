use std::cmp::Ordering;

use crate::model::DocumentTree;
use crate::resolve::{step_list_mut, visible_step_list};
use crate::selection::Selection;

/// Where a pointer at `selected` lands after the sibling at `removed` is deleted.
/// `None` means the pointed-at entity itself was removed.
pub fn index_after_removal(selected: usize, removed: usize) -> Option<usize> {
    match selected.cmp(&removed) {
        Ordering::Less => Some(selected),
        Ordering::Equal => None,
        Ordering::Greater => Some(selected - 1),
    }
}

/// Removes a module. Deleting the selected module clears the module and submodule
/// indices; deleting an earlier sibling keeps the same module selected.
pub(super) fn delete_module(
    tree: &mut DocumentTree,
    selection: &mut Selection,
    module: usize,
) -> bool {
    let framework = selection.framework.clone();
    if module >= tree.modules(&framework).len() {
        return false;
    }
    tree.framework_mut(&framework).modules.remove(module);

    if let Some(selected) = selection.module_idx {
        match index_after_removal(selected, module) {
            Some(next) => selection.module_idx = Some(next),
            None => selection.clear_module(),
        }
    }
    true
}

/// Removes a submodule of the selected module. Deleting the selected submodule clears
/// only the submodule index.
pub(super) fn delete_submodule(
    tree: &mut DocumentTree,
    selection: &mut Selection,
    submodule: usize,
) -> bool {
    let Some(module) = selection
        .selected_module()
        .and_then(|idx| tree.module_mut(&selection.framework, idx))
    else {
        return false;
    };
    if submodule >= module.submodules.len() {
        return false;
    }
    module.submodules.remove(submodule);

    if let Some(selected) = selection.submodule_idx {
        match index_after_removal(selected, submodule) {
            Some(next) => selection.submodule_idx = Some(next),
            None => selection.clear_submodule(),
        }
    }
    true
}

pub(super) fn delete_step(tree: &mut DocumentTree, selection: &Selection, step: usize) -> bool {
    let Some(address) = visible_step_list(tree, selection) else {
        return false;
    };
    match step_list_mut(tree, &selection.framework, address) {
        Some(steps) if step < steps.len() => {
            steps.remove(step);
            true
        }
        _ => false,
    }
}

pub(super) fn delete_block(
    tree: &mut DocumentTree,
    selection: &Selection,
    step: usize,
    block: usize,
) -> bool {
    let Some(address) = visible_step_list(tree, selection) else {
        return false;
    };
    let blocks = step_list_mut(tree, &selection.framework, address)
        .and_then(|steps| steps.get_mut(step))
        .map(|target| &mut target.blocks);
    match blocks {
        Some(blocks) if block < blocks.len() => {
            blocks.remove(block);
            true
        }
        _ => false,
    }
}

/// Clamps a "current step" cursor into `0..len` (0 for an empty list).
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}
