pub mod create;
pub mod delete;
pub mod reorder;
pub mod request;
pub mod update;

pub use delete::{clamp_cursor, index_after_removal};
pub use reorder::{apply_reorder, move_item, moved, remap_index};
pub use request::{Mutation, MutationResult, Reorder, ReorderResult, ReorderScope};

use crate::model::DocumentTree;
use crate::selection::Selection;

/// Applies a structural edit and returns the new tree and selection.
///
/// Addresses that no longer exist (stale indices, nothing selected) produce an unchanged
/// result with `mutated == false` instead of an error.
pub fn apply_mutation(
    tree: &DocumentTree,
    selection: &Selection,
    mutation: &Mutation,
) -> MutationResult {
    let mut next_tree = tree.clone();
    let mut next_selection = selection.clone();
    let mut created_step = None;

    let mutated = match mutation {
        Mutation::AddModule { name } => {
            create::add_module(&mut next_tree, &mut next_selection, name)
        }
        Mutation::EditModule { module, name } => {
            update::edit_module(&mut next_tree, selection, *module, name)
        }
        Mutation::DeleteModule { module } => {
            delete::delete_module(&mut next_tree, &mut next_selection, *module)
        }
        Mutation::AddSubmodule { name } => {
            create::add_submodule(&mut next_tree, &mut next_selection, name)
        }
        Mutation::EditSubmodule { submodule, name } => {
            update::edit_submodule(&mut next_tree, selection, *submodule, name)
        }
        Mutation::DeleteSubmodule { submodule } => {
            delete::delete_submodule(&mut next_tree, &mut next_selection, *submodule)
        }
        Mutation::AddStep { title, blocks } => {
            created_step = create::add_step(&mut next_tree, selection, title, blocks);
            created_step.is_some()
        }
        Mutation::EditStep { step, title } => {
            update::edit_step(&mut next_tree, selection, *step, title)
        }
        Mutation::DeleteStep { step } => delete::delete_step(&mut next_tree, selection, *step),
        Mutation::AddBlock { step, content } => {
            create::add_block(&mut next_tree, selection, *step, content)
        }
        Mutation::EditBlock {
            step,
            block,
            content,
        } => update::edit_block(&mut next_tree, selection, *step, *block, content),
        Mutation::SwitchBlockKind { step, block, kind } => {
            update::switch_block_kind(&mut next_tree, selection, *step, *block, *kind)
        }
        Mutation::DeleteBlock { step, block } => {
            delete::delete_block(&mut next_tree, selection, *step, *block)
        }
    };

    if !mutated {
        tracing::debug!(op = mutation.label(), "mutation addressed no node; ignored");
        return MutationResult {
            tree: tree.clone(),
            selection: selection.clone(),
            mutated: false,
            created_step: None,
        };
    }

    tracing::debug!(
        op = mutation.label(),
        framework = %next_selection.framework,
        "applied mutation"
    );
    MutationResult {
        tree: next_tree,
        selection: next_selection,
        mutated,
        created_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameworkDocs, Module, Step, Submodule};

    fn tree() -> DocumentTree {
        let mut a = Module::new("A");
        a.steps = vec![Step::new("S1"), Step::new("S2")];
        let mut b = Module::new("B");
        b.submodules = vec![Submodule::new("x"), Submodule::new("y"), Submodule::new("z")];
        let mut tree = DocumentTree::new();
        tree.insert_framework(
            "android",
            FrameworkDocs {
                modules: vec![a, b, Module::new("C")],
            },
        );
        tree
    }

    #[test]
    fn add_module_selects_new_entry() {
        let result = apply_mutation(
            &tree(),
            &Selection::submodule("android", 1, 2),
            &Mutation::AddModule { name: "D".into() },
        );
        assert!(result.mutated);
        assert_eq!(result.selection, Selection::module("android", 3));
    }

    #[test]
    fn add_submodule_selects_new_entry() {
        let result = apply_mutation(
            &tree(),
            &Selection::module("android", 1),
            &Mutation::AddSubmodule { name: "w".into() },
        );
        assert_eq!(result.selection, Selection::submodule("android", 1, 3));
        assert_eq!(result.tree.modules("android")[1].submodules[3].name, "w");
    }

    #[test]
    fn deleting_selected_module_clears_path() {
        let result = apply_mutation(
            &tree(),
            &Selection::submodule("android", 1, 0),
            &Mutation::DeleteModule { module: 1 },
        );
        assert_eq!(result.selection, Selection::framework("android"));
        assert_eq!(result.tree.modules("android").len(), 2);
    }

    #[test]
    fn deleting_selected_submodule_clears_only_submodule() {
        let result = apply_mutation(
            &tree(),
            &Selection::submodule("android", 1, 1),
            &Mutation::DeleteSubmodule { submodule: 1 },
        );
        assert_eq!(result.selection, Selection::module("android", 1));
    }

    #[test]
    fn deleting_other_entities_keeps_selected_node() {
        let selection = Selection::submodule("android", 1, 2);

        let later = apply_mutation(&tree(), &selection, &Mutation::DeleteModule { module: 2 });
        assert_eq!(later.selection, selection);

        let earlier = apply_mutation(&tree(), &selection, &Mutation::DeleteModule { module: 0 });
        assert_eq!(earlier.selection, Selection::submodule("android", 0, 2));
        assert_eq!(
            crate::resolve::resolve(&earlier.tree, &earlier.selection)
                .submodule
                .unwrap()
                .name,
            "z"
        );

        let sibling = apply_mutation(
            &tree(),
            &selection,
            &Mutation::DeleteSubmodule { submodule: 0 },
        );
        assert_eq!(sibling.selection, Selection::submodule("android", 1, 1));
    }

    #[test]
    fn deleting_step_keeps_other_ids() {
        let tree = tree();
        let s2 = tree.modules("android")[0].steps[1].id.clone();
        let selection = Selection::module("android", 0);
        let result = apply_mutation(&tree, &selection, &Mutation::DeleteStep { step: 0 });
        let steps = &result.tree.modules("android")[0].steps;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id, s2);
        assert_eq!(result.selection, selection);
    }

    #[test]
    fn stale_index_is_noop() {
        let tree = tree();
        let selection = Selection::module("android", 0);
        for mutation in [
            Mutation::DeleteModule { module: 9 },
            Mutation::EditModule {
                module: 9,
                name: "x".into(),
            },
            Mutation::DeleteStep { step: 5 },
            Mutation::DeleteBlock { step: 0, block: 0 },
        ] {
            let result = apply_mutation(&tree, &selection, &mutation);
            assert!(!result.mutated, "{mutation:?}");
            assert_eq!(result.tree, tree);
            assert_eq!(result.selection, selection);
        }
    }

    #[test]
    fn add_step_assigns_fresh_id() {
        let tree = tree();
        let selection = Selection::module("android", 0);
        let result = apply_mutation(
            &tree,
            &selection,
            &Mutation::AddStep {
                title: "S3".into(),
                blocks: Vec::new(),
            },
        );
        let id = result.created_step.expect("step created");
        let steps = &result.tree.modules("android")[0].steps;
        assert_eq!(steps.last().unwrap().id, id);
        assert!(steps[..2].iter().all(|step| step.id != id));
    }
}
