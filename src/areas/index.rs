//! Staging area
//!
//! The index lives in `.git/index` and is replaced wholesale on every write:
//! writers claim `.git/index.lock`, write the new index into it and rename it
//! into place, so readers always see a complete file. [`Index::update`] holds
//! the claim across the whole read-modify-write cycle.

use crate::areas::lockfile::Lockfile;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_file;
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Staged files keyed by `/`-separated path, in byte order
    entries: BTreeMap<String, IndexEntry>,
    /// Set when entries were modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&mut self, lock: &mut Lockfile) -> anyhow::Result<()> {
        let entries = self.entries.values().cloned().collect::<Vec<_>>();
        let data = index_file::encode(&entries)?;

        lock.write(&data)
            .with_context(|| format!("Unable to write index {}", self.path.display()))?;
        self.changed = false;

        debug!(entries = entries.len(), bytes = data.len(), "wrote index");
        Ok(())
    }

    /// Load the index from disk; a missing or empty file is an empty index
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Unable to read index {}", self.path.display()));
            }
        };

        self.entries = index_file::decode(&data)?
            .into_iter()
            .map(|entry| (entry.path.clone(), entry))
            .collect();
        self.changed = false;

        debug!(entries = self.entries.len(), "loaded index");
        Ok(())
    }

    /// Run a read-modify-write cycle while holding `index.lock`
    ///
    /// The index is reloaded after the lock is taken; it is written back only
    /// if `f` succeeds and changed something.
    pub fn update<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> anyhow::Result<R>,
    ) -> anyhow::Result<R> {
        let mut lock = Lockfile::acquire(&self.path)?;

        self.rehydrate()?;
        let result = f(self)?;
        if self.changed {
            self.store(&mut lock)?;
            lock.commit()?;
        }

        Ok(result)
    }

    /// Write the current entries, replacing the file
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut lock = Lockfile::acquire(&self.path)?;
        self.store(&mut lock)?;
        lock.commit()
    }

    /// Drop entries that would clash with `path` as a file: its parent
    /// directories staged as files, and anything staged beneath it
    fn discard_conflicts(&mut self, path: &str) {
        let mut parent = path;
        while let Some((dir, _)) = parent.rsplit_once('/') {
            self.entries.remove(dir);
            parent = dir;
        }

        self.remove_children(path);
    }

    fn remove_children(&mut self, path: &str) {
        let prefix = format!("{path}/");
        self.entries.retain(|entry_path, _| !entry_path.starts_with(&prefix));
    }

    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry.path);
        self.entries.insert(entry.path.clone(), entry);
        self.changed = true;
    }

    pub fn remove(&mut self, path: &str) {
        let removed = self.entries.remove(path).is_some();
        let before = self.entries.len();
        self.remove_children(path);

        if removed || self.entries.len() != before {
            self.changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::{EntryFlags, EntryMetadata};
    use crate::artifacts::index::entry_mode::EntryMode;
    use crate::artifacts::objects::object::hash_payload;
    use crate::artifacts::objects::object_type::ObjectType;
    use crate::errors::TwigError;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn index(dir: &TempDir) -> Index {
        Index::new(dir.path().join("index").into_boxed_path())
    }

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(
            path.to_string(),
            hash_payload(ObjectType::Blob, path.as_bytes()).unwrap(),
            EntryMetadata {
                mode: EntryMode::REGULAR,
                flags: EntryFlags::for_path(path),
                ..Default::default()
            },
        )
    }

    fn paths(index: &Index) -> Vec<&str> {
        index.entries().map(|entry| entry.path.as_str()).collect()
    }

    #[rstest]
    fn missing_or_empty_file_is_empty_index(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.rehydrate().unwrap();
        assert!(index.is_empty());
        assert!(!index.path().exists());

        std::fs::write(index.path(), b"").unwrap();
        index.rehydrate().unwrap();
        assert!(index.is_empty());
    }

    #[rstest]
    fn update_persists_sorted_entries(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index
            .update(|index| {
                index.add(entry("b.txt"));
                index.add(entry("a.txt"));
                Ok(())
            })
            .unwrap();

        let mut reloaded = Index::new(index.path().into());
        reloaded.rehydrate().unwrap();
        assert_eq!(paths(&reloaded), vec!["a.txt", "b.txt"]);
        assert_eq!(reloaded.entry_by_path("a.txt"), Some(&entry("a.txt")));
    }

    #[rstest]
    fn update_reloads_before_modifying(index_dir: TempDir) {
        let mut first = index(&index_dir);
        let mut second = index(&index_dir);

        first.update(|index| Ok(index.add(entry("one")))).unwrap();
        second.update(|index| Ok(index.add(entry("two")))).unwrap();

        first.rehydrate().unwrap();
        assert_eq!(paths(&first), vec!["one", "two"]);
    }

    #[rstest]
    fn failed_update_leaves_file_untouched(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.update(|index| Ok(index.add(entry("kept")))).unwrap();
        let before = std::fs::read(index.path()).unwrap();

        let result: anyhow::Result<()> = index.update(|index| {
            index.add(entry("dropped"));
            Err(TwigError::UnsupportedPath("dropped".to_string()).into())
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read(index.path()).unwrap(), before);
    }

    #[rstest]
    fn adding_a_file_replaces_conflicting_directory(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.add(entry("dir/a.txt"));
        index.add(entry("dir/b.txt"));
        index.add(entry("other"));

        index.add(entry("dir"));
        assert_eq!(paths(&index), vec!["dir", "other"]);

        index.add(entry("dir/nested/c.txt"));
        assert_eq!(paths(&index), vec!["dir/nested/c.txt", "other"]);
    }

    #[rstest]
    fn update_releases_lock_on_failure(index_dir: TempDir) {
        let mut index = index(&index_dir);
        let lock_path = Lockfile::lock_path_for(index.path());

        let result: anyhow::Result<()> = index.update(|index| {
            index.add(entry("dropped"));
            assert!(lock_path.exists());
            Err(TwigError::UnsupportedPath("dropped".to_string()).into())
        });

        assert!(result.is_err());
        assert!(!lock_path.exists());
        assert!(!index.path().exists());
    }

    #[rstest]
    fn concurrent_handles_keep_every_entry(index_dir: TempDir) {
        let names = (0..32).map(|i| format!("file-{i:02}.txt")).collect::<Vec<_>>();

        std::thread::scope(|scope| {
            for name in &names {
                let mut handle = index(&index_dir);
                scope.spawn(move || {
                    handle.update(|index| Ok(index.add(entry(name)))).unwrap();
                });
            }
        });

        let mut reloaded = index(&index_dir);
        reloaded.rehydrate().unwrap();
        assert_eq!(paths(&reloaded), names);
    }

    #[rstest]
    fn corrupt_file_is_reported(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.update(|index| Ok(index.add(entry("a.txt")))).unwrap();

        let mut data = std::fs::read(index.path()).unwrap();
        data[20] ^= 0xff;
        std::fs::write(index.path(), data).unwrap();

        let err = index.rehydrate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<TwigError>(),
            Some(&TwigError::IndexChecksumMismatch)
        );
    }
}
