use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{GIT_DIR, Workspace};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle to a repository rooted at a working directory
///
/// Owns the object database, the index, the refs and the workspace; every
/// command is a method on it.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("repository path {} is not accessible", path.display()))?;
        let git_path = path.join(GIT_DIR);

        Ok(Repository {
            index: Arc::new(Mutex::new(Index::new(
                git_path.join("index").into_boxed_path(),
            ))),
            database: Database::new(git_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            path: path.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> Box<Path> {
        self.path.join(GIT_DIR).into_boxed_path()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
