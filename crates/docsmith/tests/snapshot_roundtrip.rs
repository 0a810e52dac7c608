use docsmith::snapshot;
use docsmith::{
    Block, BlockContent, BlockKind, CodeBody, CodeTab, DocumentTree, FrameworkDocs, Module,
    Step, Submodule,
};
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;

const KINDS: [BlockKind; 6] = [
    BlockKind::Text,
    BlockKind::Note,
    BlockKind::Image,
    BlockKind::Gif,
    BlockKind::Video,
    BlockKind::Code,
];

fn words() -> impl Strategy<Value = String> {
    "[ -~]{0,16}"
}

fn code_body() -> impl Strategy<Value = CodeBody> {
    let tab = (words(), option::of(words()), words()).prop_map(|(language, label, content)| {
        CodeTab {
            language,
            label,
            content,
        }
    });
    prop_oneof![
        (words(), words()).prop_map(|(language, content)| CodeBody::Single { language, content }),
        vec(tab, 0..3).prop_map(|languages| CodeBody::Tabs { languages }),
    ]
}

fn block_content() -> impl Strategy<Value = BlockContent> {
    prop_oneof![
        words().prop_map(BlockContent::text),
        words().prop_map(BlockContent::note),
        (words(), option::of(words())).prop_map(|(url, alt)| BlockContent::Image { url, alt }),
        (words(), option::of(words())).prop_map(|(url, alt)| BlockContent::Gif { url, alt }),
        words().prop_map(|url| BlockContent::Video { url }),
        code_body().prop_map(BlockContent::Code),
    ]
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    let step = (words(), vec(block_content(), 0..4)).prop_map(|(title, blocks)| {
        Step::new(title).with_blocks(blocks.into_iter().map(Block::new).collect())
    });
    vec(step, 0..3)
}

fn module() -> impl Strategy<Value = Module> {
    let submodule = (words(), steps()).prop_map(|(name, steps)| Submodule { name, steps });
    (words(), steps(), vec(submodule, 0..3)).prop_map(|(name, steps, submodules)| Module {
        name,
        steps,
        submodules,
    })
}

fn document_tree() -> impl Strategy<Value = DocumentTree> {
    btree_map("[a-z]{1,6}", vec(module(), 0..3), 0..4).prop_map(|frameworks| {
        let mut tree = DocumentTree::new();
        for (key, modules) in frameworks {
            tree.insert_framework(key, FrameworkDocs { modules });
        }
        tree
    })
}

proptest! {
    #[test]
    fn saved_tree_loads_back_unchanged(tree in document_tree()) {
        let keys: Vec<&str> = tree.frameworks().collect();
        let blob = snapshot::save(&tree).unwrap();
        let restored = snapshot::load(Some(blob.as_str()), &keys);
        prop_assert_eq!(&restored, &tree);
        prop_assert_eq!(snapshot::digest(&restored).unwrap(), snapshot::digest(&tree).unwrap());
    }

    #[test]
    fn stashed_payload_survives_a_reload(content in block_content(), pick in 0usize..6) {
        let original = content.kind();
        let other = KINDS[pick];
        prop_assume!(other != original);

        let mut block = Block::new(content.clone());
        block.switch_kind(other);
        let mut tree = DocumentTree::new();
        let mut module = Module::new("Base Integration");
        module.steps.push(Step::new("Add SDK").with_blocks(vec![block]));
        tree.insert_framework("android", FrameworkDocs { modules: vec![module] });

        let blob = snapshot::save(&tree).unwrap();
        let mut restored = snapshot::load(Some(blob.as_str()), &["android"]);
        let block = &mut restored.framework_mut("android").modules[0].steps[0].blocks[0];
        prop_assert_eq!(block.kind(), other);
        block.switch_kind(original);
        prop_assert_eq!(block.content(), &content);
    }
}
