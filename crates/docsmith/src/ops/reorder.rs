use crate::model::DocumentTree;
use crate::ops::request::{Reorder, ReorderResult, ReorderScope};
use crate::resolve::step_list_mut;
use crate::selection::Selection;

/// Moves the element at `from` to `to` (remove, then insert). Every other element keeps
/// its relative order. Out-of-range positions leave `items` untouched.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Copying form of [`move_item`].
pub fn moved<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = items.to_vec();
    move_item(&mut next, from, to);
    next
}

/// New position of the element that sat at `old` after moving `from` to `to`.
pub fn remap_index(old: usize, from: usize, to: usize) -> usize {
    if old == from {
        to
    } else if from < old && old <= to {
        old - 1
    } else if to <= old && old < from {
        old + 1
    } else {
        old
    }
}

/// Applies `reorder` and remaps the selection when the reordered scope is the one it
/// points into.
pub fn apply_reorder(
    tree: &DocumentTree,
    selection: &Selection,
    reorder: &Reorder,
) -> ReorderResult {
    let unchanged = || ReorderResult {
        tree: tree.clone(),
        selection: selection.clone(),
        moved: false,
    };

    let Some(to) = reorder.to else {
        return unchanged();
    };
    let from = reorder.from;

    let mut next_tree = tree.clone();
    let mut next_selection = selection.clone();
    let framework = selection.framework.as_str();

    let moved = match reorder.scope {
        ReorderScope::Modules => {
            let moved = next_tree
                .framework(framework)
                .is_some_and(|docs| from < docs.modules.len() && to < docs.modules.len())
                && move_item(&mut next_tree.framework_mut(framework).modules, from, to);
            if moved {
                next_selection.module_idx = selection
                    .module_idx
                    .map(|idx| remap_index(idx, from, to));
            }
            moved
        }
        ReorderScope::Submodules { module } => {
            let moved = next_tree
                .module_mut(framework, module)
                .is_some_and(|target| move_item(&mut target.submodules, from, to));
            if moved && selection.selected_module() == Some(module) {
                next_selection.submodule_idx = selection
                    .submodule_idx
                    .map(|idx| remap_index(idx, from, to));
            }
            moved
        }
        ReorderScope::Steps { list } => step_list_mut(&mut next_tree, framework, list)
            .is_some_and(|steps| move_item(steps, from, to)),
        ReorderScope::Blocks { list, step } => step_list_mut(&mut next_tree, framework, list)
            .and_then(|steps| steps.get_mut(step))
            .is_some_and(|target| move_item(&mut target.blocks, from, to)),
    };

    if !moved {
        return unchanged();
    }

    tracing::debug!(
        scope = ?reorder.scope,
        from,
        to,
        framework,
        "reordered siblings"
    );

    ReorderResult {
        tree: next_tree,
        selection: next_selection,
        moved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameworkDocs, Module, Step, Submodule};
    use crate::resolve::StepListAddress;

    fn tree_with_modules(names: &[&str]) -> DocumentTree {
        let mut tree = DocumentTree::new();
        tree.insert_framework(
            "android",
            FrameworkDocs {
                modules: names.iter().map(|name| Module::new(*name)).collect(),
            },
        );
        tree
    }

    fn names(tree: &DocumentTree) -> Vec<&str> {
        tree.modules("android")
            .iter()
            .map(|module| module.name.as_str())
            .collect()
    }

    #[test]
    fn move_item_relocates_single_element() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 3, 1));
        assert_eq!(items, vec!['a', 'd', 'b', 'c']);
    }

    #[test]
    fn move_item_rejects_out_of_range() {
        let mut items = vec![1, 2];
        assert!(!move_item(&mut items, 2, 0));
        assert!(!move_item(&mut items, 0, 2));
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn selected_module_follows_dragged_neighbor() {
        let tree = tree_with_modules(&["A", "B", "C"]);
        let selection = Selection::module("android", 2);
        let result = apply_reorder(
            &tree,
            &selection,
            &Reorder::new(ReorderScope::Modules, 0, 2),
        );
        assert!(result.moved);
        assert_eq!(names(&result.tree), vec!["B", "C", "A"]);
        assert_eq!(result.selection, Selection::module("android", 1));
    }

    #[test]
    fn selected_module_follows_itself() {
        let tree = tree_with_modules(&["A", "B", "C"]);
        let selection = Selection::submodule("android", 0, 0);
        let result = apply_reorder(
            &tree,
            &selection,
            &Reorder::new(ReorderScope::Modules, 0, 2),
        );
        assert_eq!(result.selection, Selection::submodule("android", 2, 0));
    }

    #[test]
    fn cancelled_drag_is_noop() {
        let tree = tree_with_modules(&["A", "B"]);
        let selection = Selection::module("android", 0);
        let result = apply_reorder(
            &tree,
            &selection,
            &Reorder::cancelled(ReorderScope::Modules, 0),
        );
        assert!(!result.moved);
        assert_eq!(result.tree, tree);
        assert_eq!(result.selection, selection);
    }

    #[test]
    fn submodule_reorder_only_remaps_when_parent_is_selected() {
        let mut tree = tree_with_modules(&["A", "B"]);
        for idx in 0..2 {
            let module = tree.module_mut("android", idx).unwrap();
            module.submodules = vec![Submodule::new("x"), Submodule::new("y")];
        }

        let on_parent = Selection::submodule("android", 1, 0);
        let result = apply_reorder(
            &tree,
            &on_parent,
            &Reorder::new(ReorderScope::Submodules { module: 1 }, 0, 1),
        );
        assert_eq!(result.selection, Selection::submodule("android", 1, 1));

        let elsewhere = Selection::submodule("android", 0, 0);
        let result = apply_reorder(
            &tree,
            &elsewhere,
            &Reorder::new(ReorderScope::Submodules { module: 1 }, 0, 1),
        );
        assert!(result.moved);
        assert_eq!(result.selection, elsewhere);
    }

    #[test]
    fn block_reorder_inside_step() {
        use crate::model::{Block, BlockContent};

        let mut tree = tree_with_modules(&["A"]);
        tree.module_mut("android", 0).unwrap().steps.push(
            Step::new("s").with_blocks(vec![
                Block::new(BlockContent::text("one")),
                Block::new(BlockContent::text("two")),
            ]),
        );
        let selection = Selection::module("android", 0);
        let list = StepListAddress {
            module: 0,
            submodule: None,
        };
        let result = apply_reorder(
            &tree,
            &selection,
            &Reorder::new(ReorderScope::Blocks { list, step: 0 }, 1, 0),
        );
        let blocks = &result.tree.modules("android")[0].steps[0].blocks;
        assert_eq!(blocks[0].content().summary(), "two");
        assert_eq!(result.selection, selection);
    }
}
