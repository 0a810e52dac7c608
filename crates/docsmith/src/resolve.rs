use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{DocumentTree, Module, Step, Submodule};
use crate::selection::Selection;

/// Nodes addressed by a selection. Absent or stale indices resolve to `None` / empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolvedPath<'a> {
    pub module: Option<&'a Module>,
    pub submodule: Option<&'a Submodule>,
    pub steps: &'a [Step],
}

impl ResolvedPath<'_> {
    pub fn is_empty(&self) -> bool {
        self.module.is_none()
    }
}

/// Resolves `selection` against `tree`. Never fails.
pub fn resolve<'a>(tree: &'a DocumentTree, selection: &Selection) -> ResolvedPath<'a> {
    let Some(module) = selection
        .selected_module()
        .and_then(|idx| tree.module(&selection.framework, idx))
    else {
        return ResolvedPath::default();
    };

    let submodule = selection
        .selected_submodule()
        .and_then(|idx| module.submodules.get(idx));
    let steps = match submodule {
        Some(sub) => sub.steps.as_slice(),
        None => module.steps.as_slice(),
    };

    ResolvedPath {
        module: Some(module),
        submodule,
        steps,
    }
}

/// Address of a concrete step list: a module's base steps or one of its submodules'.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct StepListAddress {
    pub module: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submodule: Option<usize>,
}

/// The step list `resolve` would show for `selection`, if any.
pub fn visible_step_list(tree: &DocumentTree, selection: &Selection) -> Option<StepListAddress> {
    let module_idx = selection.selected_module()?;
    let module = tree.module(&selection.framework, module_idx)?;
    let submodule = selection
        .selected_submodule()
        .filter(|idx| *idx < module.submodules.len());
    Some(StepListAddress {
        module: module_idx,
        submodule,
    })
}

pub(crate) fn step_list_mut<'a>(
    tree: &'a mut DocumentTree,
    framework: &str,
    address: StepListAddress,
) -> Option<&'a mut Vec<Step>> {
    let module = tree.module_mut(framework, address.module)?;
    match address.submodule {
        Some(idx) => module.submodules.get_mut(idx).map(|sub| &mut sub.steps),
        None => Some(&mut module.steps),
    }
}

/// Entry in the flattened module/submodule navigation order.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEntry {
    Module {
        module_idx: usize,
        name: String,
    },
    Submodule {
        module_idx: usize,
        submodule_idx: usize,
        name: String,
        label: String,
    },
}

impl NavEntry {
    pub fn label(&self) -> &str {
        match self {
            NavEntry::Module { name, .. } => name,
            NavEntry::Submodule { label, .. } => label,
        }
    }

    pub fn selection(&self, framework: &str) -> Selection {
        match self {
            NavEntry::Module { module_idx, .. } => Selection::module(framework, *module_idx),
            NavEntry::Submodule {
                module_idx,
                submodule_idx,
                ..
            } => Selection::submodule(framework, *module_idx, *submodule_idx),
        }
    }

    fn matches(&self, module: usize, submodule: Option<usize>) -> bool {
        match self {
            NavEntry::Module { module_idx, .. } => submodule.is_none() && *module_idx == module,
            NavEntry::Submodule {
                module_idx,
                submodule_idx,
                ..
            } => *module_idx == module && submodule == Some(*submodule_idx),
        }
    }
}

/// Modules in order, each immediately followed by its submodules.
pub fn navigation(tree: &DocumentTree, framework: &str) -> Vec<NavEntry> {
    let mut entries = Vec::new();
    for (module_idx, module) in tree.modules(framework).iter().enumerate() {
        entries.push(NavEntry::Module {
            module_idx,
            name: module.name.clone(),
        });
        for (submodule_idx, sub) in module.submodules.iter().enumerate() {
            entries.push(NavEntry::Submodule {
                module_idx,
                submodule_idx,
                name: sub.name.clone(),
                label: format!("{} / {}", module.name, sub.name),
            });
        }
    }
    entries
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Neighbors {
    pub previous: Option<NavEntry>,
    pub next: Option<NavEntry>,
}

/// Previous/next navigation entries around the current selection. With nothing
/// selected, `next` is the first entry.
pub fn neighbors(tree: &DocumentTree, selection: &Selection) -> Neighbors {
    let entries = navigation(tree, &selection.framework);
    let current = visible_step_list(tree, selection).and_then(|address| {
        entries
            .iter()
            .position(|entry| entry.matches(address.module, address.submodule))
    });

    match current {
        Some(pos) => Neighbors {
            previous: pos.checked_sub(1).and_then(|p| entries.get(p).cloned()),
            next: entries.get(pos + 1).cloned(),
        },
        None => Neighbors {
            previous: None,
            next: entries.first().cloned(),
        },
    }
}
