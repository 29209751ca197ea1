use crate::areas::repository::Repository;
use crate::areas::workspace::GIT_DIR;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::TwigError;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

impl Repository {
    /// Create the metadata directory under `path` (creating `path` itself if needed)
    pub async fn init(path: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create repository directory {}", path.display()))?;

        let git_path = path.join(GIT_DIR);
        if git_path.exists() {
            return Err(TwigError::AlreadyInitialized(path.display().to_string()).into());
        }

        let repository = Repository::new(path)?;

        fs::create_dir_all(repository.database().objects_path())
            .context("Failed to create .git/objects directory")?;
        fs::create_dir_all(repository.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;
        repository
            .refs()
            .set_head(&BranchName::default())
            .context("Failed to create initial HEAD reference")?;

        info!(path = %repository.path().display(), "initialized empty repository");
        Ok(repository)
    }
}
