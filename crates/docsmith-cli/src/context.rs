use std::path::PathBuf;
use std::sync::Arc;

use docsmith::persistence::WorkspacePersistence;
use docsmith::workspace::{FilesystemWorkspaceLocator, WorkspaceLocator, WorkspacePaths};
use docsmith::{EditorConfig, EditorSession, HttpReviewQueue, ReviewWorkflow};

use crate::error::CliError;
use crate::util::Verbosity;

pub type Persistence = WorkspacePersistence<Arc<FilesystemWorkspaceLocator>>;

pub struct CliSession {
    pub workspace_paths: WorkspacePaths,
    pub persistence: Arc<Persistence>,
    pub config: EditorConfig,
    pub verbosity: Verbosity,
}

impl CliSession {
    pub fn bootstrap(
        workspace_override: Option<String>,
        verbosity: Verbosity,
    ) -> Result<Self, CliError> {
        let locator = match workspace_override {
            Some(path) => {
                let locator = FilesystemWorkspaceLocator::new(PathBuf::from(path));
                locator.workspace()?;
                locator
            }
            None => FilesystemWorkspaceLocator::from_current_dir()?,
        };

        let workspace_locator = Arc::new(locator);
        let workspace_paths = workspace_locator.workspace()?;
        let config = EditorConfig::load(&workspace_paths)?;
        let persistence = Arc::new(WorkspacePersistence::new(workspace_locator));

        Ok(Self {
            workspace_paths,
            persistence,
            config,
            verbosity,
        })
    }

    /// Loads the snapshot and restores the last selection and step cursor.
    pub fn open_editor(&self) -> Result<EditorSession, CliError> {
        let mut editor = EditorSession::open(self.persistence.as_ref(), &self.config)?;
        if let Some(state) = self.persistence.load_session_state()? {
            editor.restore(state);
        }
        Ok(editor)
    }

    /// Saves the tree (when changed) and the selection state.
    pub fn commit(&self, editor: &mut EditorSession) -> Result<(), CliError> {
        if editor.is_dirty() {
            editor.save(self.persistence.as_ref())?;
        }
        self.persistence.save_session_state(&editor.state())?;
        Ok(())
    }

    pub fn review_workflow(&self) -> Result<ReviewWorkflow<HttpReviewQueue>, CliError> {
        let queue = HttpReviewQueue::from_config(&self.config.review)
            .map_err(docsmith::DocsmithError::from)?;
        Ok(ReviewWorkflow::new(queue))
    }
}
