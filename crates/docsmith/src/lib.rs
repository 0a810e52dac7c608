pub mod adapter;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod ops;
pub mod persistence;
pub mod resolve;
pub mod review;
pub mod seed;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod workspace;

pub use adapter::{InMemoryAdapter, SnapshotAdapter};
pub use config::{EditorConfig, ReviewConfig};
pub use error::{DocsmithError, ReviewError};
pub use model::{
    Block, BlockContent, BlockKind, CodeBody, CodeTab, DocumentTree, FrameworkDocs, Module, Step,
    StepId, Submodule,
};
pub use ops::{
    Mutation, MutationResult, Reorder, ReorderResult, ReorderScope, apply_mutation,
    apply_reorder, move_item, remap_index,
};
pub use persistence::{PersistedExport, WorkspacePersistence, write_export};
pub use resolve::{
    NavEntry, Neighbors, ResolvedPath, StepListAddress, navigation, neighbors, resolve,
    visible_step_list,
};
pub use review::{
    HttpReviewQueue, InMemoryReviewQueue, ReviewItem, ReviewKind, ReviewOutcome, ReviewPayload,
    ReviewQueue, ReviewState, ReviewWorkflow, Submission,
};
pub use selection::Selection;
pub use session::{Direction, EditorSession, Notice, SessionState, SessionView, Severity};
pub use snapshot::ExportArtifact;
pub use workspace::{
    FilesystemWorkspaceLocator, WorkspaceLocator, WorkspacePaths, discover as discover_workspace,
};
