use crate::model::{Block, BlockContent, BlockKind, DocumentTree};
use crate::resolve::{step_list_mut, visible_step_list};
use crate::selection::Selection;

pub(super) fn edit_module(
    tree: &mut DocumentTree,
    selection: &Selection,
    module: usize,
    name: &str,
) -> bool {
    match tree.module_mut(&selection.framework, module) {
        Some(target) => rename(&mut target.name, name),
        None => false,
    }
}

pub(super) fn edit_submodule(
    tree: &mut DocumentTree,
    selection: &Selection,
    submodule: usize,
    name: &str,
) -> bool {
    let target = selection
        .selected_module()
        .and_then(|idx| tree.module_mut(&selection.framework, idx))
        .and_then(|module| module.submodules.get_mut(submodule));
    match target {
        Some(sub) => rename(&mut sub.name, name),
        None => false,
    }
}

pub(super) fn edit_step(
    tree: &mut DocumentTree,
    selection: &Selection,
    step: usize,
    title: &str,
) -> bool {
    let Some(address) = visible_step_list(tree, selection) else {
        return false;
    };
    match step_list_mut(tree, &selection.framework, address).and_then(|steps| steps.get_mut(step))
    {
        Some(target) => rename(&mut target.title, title),
        None => false,
    }
}

pub(super) fn edit_block(
    tree: &mut DocumentTree,
    selection: &Selection,
    step: usize,
    block: usize,
    content: &BlockContent,
) -> bool {
    match block_mut(tree, selection, step, block) {
        Some(target) if target.content() != content => {
            target.set_content(content.clone());
            true
        }
        _ => false,
    }
}

pub(super) fn switch_block_kind(
    tree: &mut DocumentTree,
    selection: &Selection,
    step: usize,
    block: usize,
    kind: BlockKind,
) -> bool {
    match block_mut(tree, selection, step, block) {
        Some(target) if target.kind() != kind => {
            target.switch_kind(kind);
            true
        }
        _ => false,
    }
}

fn block_mut<'a>(
    tree: &'a mut DocumentTree,
    selection: &Selection,
    step: usize,
    block: usize,
) -> Option<&'a mut Block> {
    let address = visible_step_list(tree, selection)?;
    step_list_mut(tree, &selection.framework, address)?
        .get_mut(step)?
        .blocks
        .get_mut(block)
}

fn rename(field: &mut String, value: &str) -> bool {
    if field == value {
        return false;
    }
    *field = value.to_string();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameworkDocs, Module, Step};

    fn tree() -> DocumentTree {
        let mut module = Module::new("Base Integration");
        module.steps.push(
            Step::new("Add SDK").with_blocks(vec![Block::new(BlockContent::text("<p>hi</p>"))]),
        );
        let mut tree = DocumentTree::new();
        tree.insert_framework(
            "ios",
            FrameworkDocs {
                modules: vec![module],
            },
        );
        tree
    }

    #[test]
    fn rename_to_same_value_reports_no_change() {
        let mut tree = tree();
        let selection = Selection::module("ios", 0);
        assert!(!edit_module(&mut tree, &selection, 0, "Base Integration"));
        assert!(edit_module(&mut tree, &selection, 0, "Core"));
        assert_eq!(tree.modules("ios")[0].name, "Core");
    }

    #[test]
    fn edit_step_keeps_id() {
        let mut tree = tree();
        let selection = Selection::module("ios", 0);
        let id = tree.modules("ios")[0].steps[0].id.clone();
        assert!(edit_step(&mut tree, &selection, 0, "Install"));
        let step = &tree.modules("ios")[0].steps[0];
        assert_eq!(step.title, "Install");
        assert_eq!(step.id, id);
    }

    #[test]
    fn edit_block_with_new_type_stashes_previous_payload() {
        let mut tree = tree();
        let selection = Selection::module("ios", 0);
        assert!(edit_block(
            &mut tree,
            &selection,
            0,
            0,
            &BlockContent::code("ruby", "pod 'SDK'")
        ));
        assert!(switch_block_kind(&mut tree, &selection, 0, 0, BlockKind::Text));
        let block = &tree.modules("ios")[0].steps[0].blocks[0];
        assert_eq!(block.content(), &BlockContent::text("<p>hi</p>"));
    }

    #[test]
    fn edit_submodule_without_submodules_is_noop() {
        let mut tree = tree();
        let selection = Selection::module("ios", 0);
        assert!(!edit_submodule(&mut tree, &selection, 0, "Inbox"));
    }
}
