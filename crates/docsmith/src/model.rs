use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::ids::generate_uuid_v4;

/// Durable identity of a step. Assigned once at creation and never reused.
#[derive(
    Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn generate() -> Self {
        Self(generate_uuid_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every framework's documentation, keyed by framework identifier.
///
/// Frameworks that were never loaded read as empty rather than missing.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct DocumentTree {
    frameworks: BTreeMap<String, FrameworkDocs>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Framework identifiers in stable (sorted) order.
    pub fn frameworks(&self) -> impl Iterator<Item = &str> {
        self.frameworks.keys().map(String::as_str)
    }

    pub fn contains_framework(&self, framework: &str) -> bool {
        self.frameworks.contains_key(framework)
    }

    pub fn framework(&self, framework: &str) -> Option<&FrameworkDocs> {
        self.frameworks.get(framework)
    }

    /// Mutable access that materializes an empty framework on first touch.
    pub fn framework_mut(&mut self, framework: &str) -> &mut FrameworkDocs {
        self.frameworks.entry(framework.to_string()).or_default()
    }

    pub fn ensure_framework(&mut self, framework: &str) {
        self.framework_mut(framework);
    }

    pub fn insert_framework(&mut self, framework: impl Into<String>, docs: FrameworkDocs) {
        self.frameworks.insert(framework.into(), docs);
    }

    pub fn modules(&self, framework: &str) -> &[Module] {
        self.frameworks
            .get(framework)
            .map(|docs| docs.modules.as_slice())
            .unwrap_or_default()
    }

    pub fn module(&self, framework: &str, module: usize) -> Option<&Module> {
        self.modules(framework).get(module)
    }

    pub fn module_mut(&mut self, framework: &str, module: usize) -> Option<&mut Module> {
        self.frameworks
            .get_mut(framework)
            .and_then(|docs| docs.modules.get_mut(module))
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.values().all(|docs| docs.modules.is_empty())
    }
}

/// One framework's ordered module list.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FrameworkDocs {
    #[serde(default)]
    pub modules: Vec<Module>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Base steps shown when no submodule is selected.
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodules: Vec<Submodule>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_submodules(&self) -> bool {
        !self.submodules.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Submodule {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Submodule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Step {
    /// Legacy documents without ids receive a fresh one when loaded.
    #[serde(default = "StepId::generate")]
    pub id: StepId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Step {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: StepId::generate(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

/// Discriminant of a block's active content variant.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Note,
    Image,
    Gif,
    Video,
    Code,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Text,
        BlockKind::Note,
        BlockKind::Image,
        BlockKind::Gif,
        BlockKind::Video,
        BlockKind::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Note => "note",
            BlockKind::Image => "image",
            BlockKind::Gif => "gif",
            BlockKind::Video => "video",
            BlockKind::Code => "code",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a block; each variant carries only the fields relevant to it.
/// Content is stored verbatim and never validated.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockContent {
    Text {
        #[serde(default)]
        content: String,
    },
    Note {
        #[serde(default)]
        content: String,
    },
    Image {
        #[serde(default)]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Gif {
        #[serde(default)]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Video {
        #[serde(default)]
        url: String,
    },
    Code(CodeBody),
}

impl BlockContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn note(content: impl Into<String>) -> Self {
        Self::Note {
            content: content.into(),
        }
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Code(CodeBody::Single {
            language: language.into(),
            content: content.into(),
        })
    }

    /// Blank payload for a freshly switched block type.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self::text(""),
            BlockKind::Note => Self::note(""),
            BlockKind::Image => Self::Image {
                url: String::new(),
                alt: None,
            },
            BlockKind::Gif => Self::Gif {
                url: String::new(),
                alt: None,
            },
            BlockKind::Video => Self::Video { url: String::new() },
            BlockKind::Code => Self::code("", ""),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Text { .. } => BlockKind::Text,
            BlockContent::Note { .. } => BlockKind::Note,
            BlockContent::Image { .. } => BlockKind::Image,
            BlockContent::Gif { .. } => BlockKind::Gif,
            BlockContent::Video { .. } => BlockKind::Video,
            BlockContent::Code(_) => BlockKind::Code,
        }
    }

    /// One-line preview: the text content, the URL, or the first code snippet.
    pub fn summary(&self) -> &str {
        match self {
            BlockContent::Text { content } | BlockContent::Note { content } => content,
            BlockContent::Image { url, .. }
            | BlockContent::Gif { url, .. }
            | BlockContent::Video { url } => url,
            BlockContent::Code(CodeBody::Single { content, .. }) => content,
            BlockContent::Code(CodeBody::Tabs { languages }) => languages
                .first()
                .map(|tab| tab.content.as_str())
                .unwrap_or_default(),
        }
    }
}

/// Code payload: either one snippet or a set of language tabs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged, from = "RawCodeBody")]
pub enum CodeBody {
    Tabs {
        languages: Vec<CodeTab>,
    },
    Single {
        language: String,
        content: String,
    },
}

/// Wire shape accepted for code blocks. A `languages` key makes a tabbed body, except
/// for legacy records that pair an empty list with single-snippet fields.
#[derive(Deserialize)]
struct RawCodeBody {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    languages: Option<Vec<CodeTab>>,
}

impl From<RawCodeBody> for CodeBody {
    fn from(raw: RawCodeBody) -> Self {
        let single = raw.language.is_some() || raw.content.is_some();
        match raw.languages {
            Some(languages) if !languages.is_empty() || !single => CodeBody::Tabs { languages },
            _ => CodeBody::Single {
                language: raw.language.unwrap_or_default(),
                content: raw.content.unwrap_or_default(),
            },
        }
    }
}

impl JsonSchema for CodeBody {
    fn schema_name() -> Cow<'static, str> {
        "CodeBody".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let tabs = generator.subschema_for::<Vec<CodeTab>>();
        json_schema!({
            "type": "object",
            "properties": {
                "language": { "type": "string" },
                "content": { "type": "string" },
                "languages": tabs,
            }
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CodeTab {
    #[serde(rename = "lang", default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Smallest content unit.
///
/// Switching the block's type parks the previous payload in a stash, so switching back
/// restores it. The stash is saved under `stashed` next to the active payload and does not
/// participate in equality.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "BlockRecord", into = "BlockRecord")]
pub struct Block {
    content: BlockContent,
    stash: BTreeMap<BlockKind, BlockContent>,
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Self {
            content,
            stash: BTreeMap::new(),
        }
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Replaces the full payload. A payload of a different type stashes the current one.
    pub fn set_content(&mut self, content: BlockContent) {
        let kind = content.kind();
        if kind != self.kind() {
            let previous = std::mem::replace(&mut self.content, content);
            self.stash.insert(previous.kind(), previous);
        } else {
            self.content = content;
        }
        self.stash.remove(&kind);
    }

    /// Changes the block type, restoring the stashed payload for `kind` when present.
    pub fn switch_kind(&mut self, kind: BlockKind) {
        if kind == self.kind() {
            return;
        }
        let restored = self
            .stash
            .remove(&kind)
            .unwrap_or_else(|| BlockContent::empty(kind));
        self.set_content(restored);
    }

    pub fn stashed(&self, kind: BlockKind) -> Option<&BlockContent> {
        self.stash.get(&kind)
    }
}

impl From<BlockContent> for Block {
    fn from(content: BlockContent) -> Self {
        Block::new(content)
    }
}

impl From<Block> for BlockContent {
    fn from(block: Block) -> Self {
        block.content
    }
}

/// Wire form of a block: the active payload's tagged record plus any stashed payloads.
#[derive(Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "Block")]
struct BlockRecord {
    #[serde(flatten)]
    content: BlockContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    stashed: Vec<BlockContent>,
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        let active = record.content.kind();
        let stash = record
            .stashed
            .into_iter()
            .filter(|parked| parked.kind() != active)
            .map(|parked| (parked.kind(), parked))
            .collect();
        Self {
            content: record.content,
            stash,
        }
    }
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        Self {
            content: block.content,
            stashed: block.stash.into_values().collect(),
        }
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for Block {}

impl JsonSchema for Block {
    fn schema_name() -> Cow<'static, str> {
        BlockRecord::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        BlockRecord::json_schema(generator)
    }
}
