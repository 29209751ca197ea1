//! Working directory access
//!
//! Paths handed out by the workspace are relative to its root and always
//! `/`-separated, whatever the platform.

use crate::artifacts::index::index_entry::EntryMetadata;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the metadata directory, never part of the working copy
pub const GIT_DIR: &str = ".git";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn a user-supplied path into the `/`-separated form stored in the index
    ///
    /// Backslashes become slashes, leading `./` and the workspace root prefix are
    /// dropped.
    pub fn normalize(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.path).unwrap_or(path);

        relative
            .to_string_lossy()
            .replace('\\', "/")
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect::<Vec<_>>()
            .join("/")
    }

    fn is_ignored(path: &Path) -> bool {
        path.components()
            .any(|component| matches!(component, Component::Normal(name) if name == GIT_DIR))
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.path).ok()?;
        if Self::is_ignored(relative) {
            return None;
        }
        Some(self.normalize(relative))
    }

    /// Every file of the working copy, excluding the metadata directory
    pub fn list_files(&self) -> anyhow::Result<BTreeSet<String>> {
        self.list_files_under("")
    }

    /// Files at or beneath a normalized path; a file path yields itself
    pub fn list_files_under(&self, path: &str) -> anyhow::Result<BTreeSet<String>> {
        let root = self.path.join(path);
        if !root.exists() {
            anyhow::bail!("pathspec {path:?} did not match any files");
        }

        let mut files = BTreeSet::new();
        let walker = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != GIT_DIR);
        for entry in walker {
            let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
            if entry.file_type().is_file()
                && let Some(relative) = self.relative(entry.path())
            {
                files.insert(relative);
            }
        }

        Ok(files)
    }

    pub fn read_file(&self, path: &str) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(path);
        let content = std::fs::read(&file_path)
            .with_context(|| format!("failed to read {}", file_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn stat_file(&self, path: &str) -> anyhow::Result<EntryMetadata> {
        let file_path = self.path.join(path);
        let metadata = std::fs::metadata(&file_path)
            .with_context(|| format!("failed to stat {}", file_path.display()))?;

        Ok(EntryMetadata::from_stat(path, &file_path, &metadata))
    }

    pub fn file_path(&self, path: &str) -> PathBuf {
        self.path.join(path)
    }
}
