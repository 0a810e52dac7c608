use crate::config::DEFAULT_FRAMEWORKS;
use crate::error::DocsmithError;
use crate::model::{DocumentTree, FrameworkDocs};

const ANDROID_SEED: &str = include_str!("../seed/android.json");
const IOS_SEED: &str = include_str!("../seed/ios.json");

/// Sample documentation for new workspaces. Frameworks without bundled content start
/// empty. Step ids are generated fresh on every call.
pub fn seed_tree() -> Result<DocumentTree, DocsmithError> {
    let mut tree = DocumentTree::new();
    for framework in DEFAULT_FRAMEWORKS {
        let docs = match framework {
            "android" => parse(framework, ANDROID_SEED)?,
            "ios" => parse(framework, IOS_SEED)?,
            _ => FrameworkDocs::default(),
        };
        tree.insert_framework(framework, docs);
    }
    Ok(tree)
}

fn parse(framework: &str, raw: &str) -> Result<FrameworkDocs, DocsmithError> {
    serde_json::from_str(raw)
        .map_err(|err| DocsmithError::from(err).context(format!("{framework} seed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockContent, BlockKind, CodeBody};

    #[test]
    fn seed_covers_default_frameworks() {
        let tree = seed_tree().unwrap();
        assert_eq!(
            tree.frameworks().collect::<Vec<_>>(),
            vec!["android", "flutter", "ios", "reactnative"]
        );
        assert!(tree.modules("flutter").is_empty());
        assert_eq!(tree.modules("ios")[0].steps[0].title, "Add SDK");
    }

    #[test]
    fn android_seed_has_push_inbox_submodule() {
        let tree = seed_tree().unwrap();
        let push = tree.module("android", 1).unwrap();
        assert_eq!(push.name, "Push Integration");
        assert_eq!(push.submodules[0].name, "AppInbox");
        assert_eq!(
            push.submodules[0].steps[0].blocks[1].content(),
            &BlockContent::code("java", "AppInbox.init(this);")
        );

        let add_sdk = &tree.modules("android")[0].steps[0];
        let kinds: Vec<_> = add_sdk.blocks.iter().map(|block| block.kind()).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Text, BlockKind::Code, BlockKind::Note, BlockKind::Image]
        );
        assert!(matches!(
            add_sdk.blocks[1].content(),
            BlockContent::Code(CodeBody::Tabs { languages }) if languages.len() == 2
        ));
    }

    #[test]
    fn seed_steps_receive_distinct_ids() {
        let first = seed_tree().unwrap();
        let second = seed_tree().unwrap();
        assert_ne!(
            first.modules("ios")[0].steps[0].id,
            second.modules("ios")[0].steps[0].id
        );
    }
}
