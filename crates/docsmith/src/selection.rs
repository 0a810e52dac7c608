use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::DocumentTree;

/// Path into the tree identifying what the operator is currently viewing.
///
/// `submodule_idx` only means something while `module_idx` is set. Indices are positional
/// and may be stale; resolution treats out-of-range values as "nothing selected".
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub framework: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_idx: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submodule_idx: Option<usize>,
}

impl Selection {
    pub fn framework(framework: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
            module_idx: None,
            submodule_idx: None,
        }
    }

    pub fn module(framework: impl Into<String>, module: usize) -> Self {
        Self {
            module_idx: Some(module),
            ..Self::framework(framework)
        }
    }

    pub fn submodule(framework: impl Into<String>, module: usize, submodule: usize) -> Self {
        Self {
            submodule_idx: Some(submodule),
            ..Self::module(framework, module)
        }
    }

    /// Selected module index, ignoring any dangling submodule index.
    pub fn selected_module(&self) -> Option<usize> {
        self.module_idx
    }

    /// Selected submodule index; `None` unless a module is selected too.
    pub fn selected_submodule(&self) -> Option<usize> {
        self.module_idx.and(self.submodule_idx)
    }

    pub fn clear_module(&mut self) {
        self.module_idx = None;
        self.submodule_idx = None;
    }

    pub fn clear_submodule(&mut self) {
        self.submodule_idx = None;
    }

    /// Drops indices that no longer address a node in `tree`.
    pub fn sanitized(&self, tree: &DocumentTree) -> Selection {
        let mut next = Selection::framework(self.framework.clone());
        let Some(module_idx) = self.module_idx else {
            return next;
        };
        let Some(module) = tree.module(&self.framework, module_idx) else {
            return next;
        };
        next.module_idx = Some(module_idx);
        if let Some(sub) = self.submodule_idx {
            if sub < module.submodules.len() {
                next.submodule_idx = Some(sub);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameworkDocs, Module, Submodule};

    fn tree() -> DocumentTree {
        let mut tree = DocumentTree::new();
        let mut push = Module::new("Push Integration");
        push.submodules.push(Submodule::new("AppInbox"));
        tree.insert_framework(
            "android",
            FrameworkDocs {
                modules: vec![Module::new("Base Integration"), push],
            },
        );
        tree
    }

    #[test]
    fn sanitized_keeps_valid_path() {
        let selection = Selection::submodule("android", 1, 0);
        assert_eq!(selection.sanitized(&tree()), selection);
    }

    #[test]
    fn sanitized_drops_out_of_range_indices() {
        assert_eq!(
            Selection::submodule("android", 0, 0).sanitized(&tree()),
            Selection::module("android", 0)
        );
        assert_eq!(
            Selection::submodule("android", 7, 0).sanitized(&tree()),
            Selection::framework("android")
        );
    }

    #[test]
    fn dangling_submodule_is_ignored_without_module() {
        let selection = Selection {
            framework: "ios".into(),
            module_idx: None,
            submodule_idx: Some(2),
        };
        assert_eq!(selection.selected_submodule(), None);
    }

    #[test]
    fn serializes_with_camel_case_indices() {
        let value = serde_json::to_value(Selection::submodule("ios", 1, 2)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"framework": "ios", "moduleIdx": 1, "submoduleIdx": 2})
        );
    }
}
