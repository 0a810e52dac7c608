use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::DocsmithError;
use crate::model::{DocumentTree, FrameworkDocs};

/// Serializes the whole tree into the snapshot blob.
pub fn save(tree: &DocumentTree) -> Result<String, DocsmithError> {
    Ok(serde_json::to_string(tree)?)
}

/// Restores a tree from a snapshot blob.
///
/// Never fails: an absent or unreadable blob yields an empty tree, and a framework entry
/// that does not decode degrades to an empty framework while the others load normally.
/// Every key in `frameworks` is present in the result.
pub fn load<S: AsRef<str>>(blob: Option<&str>, frameworks: &[S]) -> DocumentTree {
    let mut tree = DocumentTree::new();

    match blob.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => tracing::debug!("no snapshot stored; starting from an empty tree"),
        Some(raw) => match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(entries) => {
                for (framework, value) in entries {
                    let docs = decode_framework(&framework, value);
                    tree.insert_framework(framework, docs);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "snapshot is unreadable; starting from an empty tree");
            }
        },
    }

    for framework in frameworks {
        tree.ensure_framework(framework.as_ref());
    }
    tree
}

fn decode_framework(framework: &str, value: Value) -> FrameworkDocs {
    match serde_json::from_value(value) {
        Ok(docs) => docs,
        Err(err) => {
            tracing::warn!(framework, error = %err, "framework entry is malformed; loading it empty");
            FrameworkDocs::default()
        }
    }
}

/// SHA-256 fingerprint of the saved form, used to detect unsaved edits.
pub fn digest(tree: &DocumentTree) -> Result<String, DocsmithError> {
    let blob = save(tree)?;
    Ok(hex::encode(Sha256::digest(blob.as_bytes())))
}

/// Downloadable dump of one framework's documentation.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub body: String,
}

/// Pretty-prints one framework as `<framework>Docs.json`. Unknown frameworks export as
/// an empty module list.
pub fn export(tree: &DocumentTree, framework: &str) -> Result<ExportArtifact, DocsmithError> {
    let empty = FrameworkDocs::default();
    let docs = tree.framework(framework).unwrap_or(&empty);
    Ok(ExportArtifact {
        file_name: format!("{framework}Docs.json"),
        body: serde_json::to_string_pretty(docs)?,
    })
}

/// JSON schema describing the snapshot blob.
pub fn schema() -> Result<String, DocsmithError> {
    let schema = schemars::schema_for!(DocumentTree);
    Ok(serde_json::to_string_pretty(&schema)?)
}
