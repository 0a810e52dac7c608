use clap::{Arg, ArgAction, ArgMatches, Command};
use docsmith::{BlockContent, BlockKind, CodeBody, CodeTab, Mutation, Reorder, ReorderScope};

use crate::commands::module::index;
use crate::commands::{CommandResult, apply_and_commit, index_arg, reorder_and_commit};
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("block")
        .about("Manage content blocks of a step")
        .subcommand_required(true)
        .subcommand(
            field_args(
                Command::new("add")
                    .about("Append a block to a step")
                    .arg(index("step"))
                    .arg(type_arg().required(true)),
            ),
        )
        .subcommand(
            field_args(
                Command::new("edit")
                    .about("Change a block's fields or type")
                    .arg(index("step"))
                    .arg(index("index"))
                    .arg(type_arg()),
            ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a block")
                .arg(index("step"))
                .arg(index("index")),
        )
        .subcommand(
            Command::new("move")
                .about("Move a block within its step")
                .arg(index("step"))
                .arg(index("from"))
                .arg(index("to")),
        )
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_name("TYPE")
        .help("Block type: text, note, image, gif, video, or code")
}

fn field_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("content")
                .long("content")
                .value_name("TEXT")
                .help("Body of a text, note, or single-snippet code block"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Media location for image, gif, and video blocks"),
        )
        .arg(
            Arg::new("alt")
                .long("alt")
                .value_name("TEXT")
                .help("Alternative text for image and gif blocks"),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .value_name("LANG")
                .help("Language of a single-snippet code block"),
        )
        .arg(
            Arg::new("tab")
                .long("tab")
                .value_name("LANG[:LABEL]=CODE")
                .action(ArgAction::Append)
                .help("Language tab of a tabbed code block; repeat for each tab"),
        )
}

#[derive(Debug, Default)]
struct BlockFields {
    content: Option<String>,
    url: Option<String>,
    alt: Option<String>,
    language: Option<String>,
    tabs: Vec<CodeTab>,
}

impl BlockFields {
    fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let tabs = matches
            .get_many::<String>("tab")
            .map(|values| values.map(|raw| parse_tab(raw)).collect::<Result<Vec<_>, _>>())
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            content: matches.get_one::<String>("content").cloned(),
            url: matches.get_one::<String>("url").cloned(),
            alt: matches.get_one::<String>("alt").cloned(),
            language: matches.get_one::<String>("language").cloned(),
            tabs,
        })
    }

    fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.url.is_none()
            && self.alt.is_none()
            && self.language.is_none()
            && self.tabs.is_empty()
    }

    fn provided(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.content.is_some() {
            names.push("content");
        }
        if self.url.is_some() {
            names.push("url");
        }
        if self.alt.is_some() {
            names.push("alt");
        }
        if self.language.is_some() {
            names.push("language");
        }
        if !self.tabs.is_empty() {
            names.push("tab");
        }
        names
    }
}

fn parse_tab(raw: &str) -> Result<CodeTab, CliError> {
    let (head, content) = raw
        .split_once('=')
        .ok_or_else(|| CliError::usage(format!("--tab '{raw}' must look like LANG[:LABEL]=CODE")))?;
    let (language, label) = match head.split_once(':') {
        Some((language, label)) => (language, Some(label.to_string())),
        None => (head, None),
    };
    if language.trim().is_empty() {
        return Err(CliError::usage(format!("--tab '{raw}' is missing a language")));
    }
    Ok(CodeTab {
        language: language.trim().to_string(),
        label,
        content: content.to_string(),
    })
}

fn allowed_fields(kind: BlockKind) -> &'static [&'static str] {
    match kind {
        BlockKind::Text | BlockKind::Note => &["content"],
        BlockKind::Image | BlockKind::Gif => &["url", "alt"],
        BlockKind::Video => &["url"],
        BlockKind::Code => &["content", "language", "tab"],
    }
}

/// Writes the provided fields over `base`, rejecting fields the block type does not have.
fn overlay(base: BlockContent, fields: &BlockFields) -> Result<BlockContent, CliError> {
    let kind = base.kind();
    let allowed = allowed_fields(kind);
    let rejected: Vec<_> = fields
        .provided()
        .into_iter()
        .filter(|name| !allowed.contains(name))
        .map(|name| format!("--{name}"))
        .collect();
    if !rejected.is_empty() {
        return Err(CliError::usage(format!(
            "{} does not apply to {kind} blocks",
            rejected.join(", ")
        )));
    }

    let next = match base {
        BlockContent::Text { content } => BlockContent::Text {
            content: fields.content.clone().unwrap_or(content),
        },
        BlockContent::Note { content } => BlockContent::Note {
            content: fields.content.clone().unwrap_or(content),
        },
        BlockContent::Image { url, alt } => BlockContent::Image {
            url: fields.url.clone().unwrap_or(url),
            alt: fields.alt.clone().or(alt),
        },
        BlockContent::Gif { url, alt } => BlockContent::Gif {
            url: fields.url.clone().unwrap_or(url),
            alt: fields.alt.clone().or(alt),
        },
        BlockContent::Video { url } => BlockContent::Video {
            url: fields.url.clone().unwrap_or(url),
        },
        BlockContent::Code(body) => BlockContent::Code(overlay_code(body, fields)?),
    };
    Ok(next)
}

fn overlay_code(body: CodeBody, fields: &BlockFields) -> Result<CodeBody, CliError> {
    let single = fields.language.is_some() || fields.content.is_some();
    if !fields.tabs.is_empty() {
        if single {
            return Err(CliError::usage(
                "use either --tab or --language/--content for code blocks",
            ));
        }
        return Ok(CodeBody::Tabs {
            languages: fields.tabs.clone(),
        });
    }
    if !single {
        return Ok(body);
    }
    let (language, content) = match body {
        CodeBody::Single { language, content } => (language, content),
        CodeBody::Tabs { .. } => (String::new(), String::new()),
    };
    Ok(CodeBody::Single {
        language: fields.language.clone().unwrap_or(language),
        content: fields.content.clone().unwrap_or(content),
    })
}

fn parse_kind(raw: &str) -> Result<BlockKind, CliError> {
    BlockKind::parse(raw).ok_or_else(|| {
        CliError::usage(format!(
            "unknown block type '{raw}' (expected one of: text, note, image, gif, video, code)"
        ))
    })
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let mut editor = session.open_editor()?;
    let list = util::require_step_list(&editor)?;
    let step_count = editor.resolved().steps.len();

    match matches.subcommand() {
        Some(("add", sub)) => {
            let step = index_arg(sub, "step")?;
            util::ensure_index(step, step_count, "step")?;
            let kind = parse_kind(
                sub.get_one::<String>("type")
                    .map(String::as_str)
                    .unwrap_or_default(),
            )?;
            let content = overlay(BlockContent::empty(kind), &BlockFields::from_matches(sub)?)?;
            apply_and_commit(session, &mut editor, Mutation::AddBlock { step, content })
        }
        Some(("edit", sub)) => {
            let step = index_arg(sub, "step")?;
            let block = index_arg(sub, "index")?;
            util::ensure_index(step, step_count, "step")?;
            let fields = BlockFields::from_matches(sub)?;
            let requested = sub
                .get_one::<String>("type")
                .map(|raw| parse_kind(raw))
                .transpose()?;
            let (current, stashed) = {
                let blocks = &editor.resolved().steps[step].blocks;
                util::ensure_index(block, blocks.len(), "block")?;
                let target = &blocks[block];
                let stashed = requested.and_then(|kind| target.stashed(kind).cloned());
                (target.content().clone(), stashed)
            };
            let kind = requested.unwrap_or(current.kind());

            let mutation = if kind != current.kind() && fields.is_empty() {
                Mutation::SwitchBlockKind { step, block, kind }
            } else if fields.is_empty() {
                return Err(CliError::usage(
                    "nothing to change; pass --type or block fields",
                ));
            } else {
                let base = if kind == current.kind() {
                    current
                } else {
                    stashed.unwrap_or_else(|| BlockContent::empty(kind))
                };
                Mutation::EditBlock {
                    step,
                    block,
                    content: overlay(base, &fields)?,
                }
            };
            apply_and_commit(session, &mut editor, mutation)
        }
        Some(("delete", sub)) => {
            let step = index_arg(sub, "step")?;
            let block = index_arg(sub, "index")?;
            util::ensure_index(step, step_count, "step")?;
            util::ensure_index(block, editor.resolved().steps[step].blocks.len(), "block")?;
            apply_and_commit(session, &mut editor, Mutation::DeleteBlock { step, block })
        }
        Some(("move", sub)) => {
            let step = index_arg(sub, "step")?;
            let from = index_arg(sub, "from")?;
            let to = index_arg(sub, "to")?;
            util::ensure_index(step, step_count, "step")?;
            let count = editor.resolved().steps[step].blocks.len();
            util::ensure_index(from, count, "block")?;
            util::ensure_index(to, count, "block")?;
            reorder_and_commit(
                session,
                &mut editor,
                Reorder::new(ReorderScope::Blocks { list, step }, from, to),
            )
        }
        _ => Err(CliError::usage("unsupported block command")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tab_accepts_optional_label() {
        let tab = parse_tab("java:Java=SDK.init(this);").unwrap();
        assert_eq!(tab.language, "java");
        assert_eq!(tab.label.as_deref(), Some("Java"));
        assert_eq!(tab.content, "SDK.init(this);");

        let tab = parse_tab("kotlin=val x = 1").unwrap();
        assert_eq!(tab.label, None);
        assert_eq!(tab.content, "val x = 1");

        assert!(parse_tab("no-separator").is_err());
    }

    #[test]
    fn overlay_keeps_untouched_fields() {
        let base = BlockContent::Image {
            url: "https://via.placeholder.com/400x200".into(),
            alt: Some("Gradle Example".into()),
        };
        let fields = BlockFields {
            alt: Some("Gradle setup".into()),
            ..BlockFields::default()
        };
        assert_eq!(
            overlay(base, &fields).unwrap(),
            BlockContent::Image {
                url: "https://via.placeholder.com/400x200".into(),
                alt: Some("Gradle setup".into()),
            }
        );
    }

    #[test]
    fn overlay_rejects_fields_of_other_types() {
        let fields = BlockFields {
            url: Some("https://example.com".into()),
            ..BlockFields::default()
        };
        let err = overlay(BlockContent::text("hi"), &fields).unwrap_err();
        assert_eq!(err.to_string(), "--url does not apply to text blocks");
    }

    #[test]
    fn code_tabs_replace_single_snippet() {
        let fields = BlockFields {
            tabs: vec![parse_tab("java=a();").unwrap(), parse_tab("kotlin=a()").unwrap()],
            ..BlockFields::default()
        };
        match overlay(BlockContent::code("ruby", "pod"), &fields).unwrap() {
            BlockContent::Code(CodeBody::Tabs { languages }) => assert_eq!(languages.len(), 2),
            other => panic!("unexpected content: {other:?}"),
        }
    }
}
