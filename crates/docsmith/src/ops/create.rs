use crate::model::{Block, BlockContent, DocumentTree, Module, Step, StepId, Submodule};
use crate::resolve::{step_list_mut, visible_step_list};
use crate::selection::Selection;

/// Appends a module to the selected framework and selects it.
pub(super) fn add_module(tree: &mut DocumentTree, selection: &mut Selection, name: &str) -> bool {
    let modules = &mut tree.framework_mut(&selection.framework).modules;
    modules.push(Module::new(name));
    let created = modules.len() - 1;
    *selection = Selection::module(selection.framework.clone(), created);
    true
}

/// Appends a submodule to the selected module and selects it.
pub(super) fn add_submodule(
    tree: &mut DocumentTree,
    selection: &mut Selection,
    name: &str,
) -> bool {
    let Some(module_idx) = selection.selected_module() else {
        return false;
    };
    let Some(module) = tree.module_mut(&selection.framework, module_idx) else {
        return false;
    };
    module.submodules.push(Submodule::new(name));
    let created = module.submodules.len() - 1;
    *selection = Selection::submodule(selection.framework.clone(), module_idx, created);
    true
}

/// Appends a step with a fresh id to the visible step list.
pub(super) fn add_step(
    tree: &mut DocumentTree,
    selection: &Selection,
    title: &str,
    blocks: &[Block],
) -> Option<StepId> {
    let address = visible_step_list(tree, selection)?;
    let steps = step_list_mut(tree, &selection.framework, address)?;
    let step = Step::new(title).with_blocks(blocks.to_vec());
    let id = step.id.clone();
    steps.push(step);
    Some(id)
}

pub(super) fn add_block(
    tree: &mut DocumentTree,
    selection: &Selection,
    step: usize,
    content: &BlockContent,
) -> bool {
    let Some(address) = visible_step_list(tree, selection) else {
        return false;
    };
    let Some(target) =
        step_list_mut(tree, &selection.framework, address).and_then(|steps| steps.get_mut(step))
    else {
        return false;
    };
    target.blocks.push(Block::new(content.clone()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_module_materializes_unloaded_framework() {
        let mut tree = DocumentTree::new();
        let mut selection = Selection::framework("flutter");
        assert!(add_module(&mut tree, &mut selection, "Setup"));
        assert_eq!(tree.modules("flutter").len(), 1);
        assert_eq!(selection, Selection::module("flutter", 0));
    }

    #[test]
    fn add_submodule_requires_selected_module() {
        let mut tree = DocumentTree::new();
        let mut selection = Selection::framework("ios");
        assert!(!add_submodule(&mut tree, &mut selection, "Inbox"));
        assert_eq!(selection, Selection::framework("ios"));
    }

    #[test]
    fn add_step_without_visible_list_is_noop() {
        let mut tree = DocumentTree::new();
        let selection = Selection::module("ios", 0);
        assert!(add_step(&mut tree, &selection, "Add SDK", &[]).is_none());
        assert!(tree.modules("ios").is_empty());
    }
}
