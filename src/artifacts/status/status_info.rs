use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

/// Paths that differ between the working copy and the index, each sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub changed: Vec<String>,
    pub new: Vec<String>,
    pub deleted: Vec<String>,
}

impl StatusInfo {
    /// Compare workspace paths with staged digests
    ///
    /// `hash` is called only for paths present on both sides and must return
    /// the blob digest of the working copy file.
    pub fn partition(
        workspace: &BTreeSet<String>,
        staged: &BTreeMap<String, ObjectId>,
        mut hash: impl FnMut(&str) -> anyhow::Result<ObjectId>,
    ) -> anyhow::Result<Self> {
        let mut status = StatusInfo::default();

        for path in workspace {
            match staged.get(path) {
                None => status.new.push(path.clone()),
                Some(oid) => {
                    if hash(path)? != *oid {
                        status.changed.push(path.clone());
                    }
                }
            }
        }

        status.deleted = staged
            .keys()
            .filter(|path| !workspace.contains(*path))
            .cloned()
            .collect();

        Ok(status)
    }

    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.new.is_empty() && self.deleted.is_empty()
    }

    /// Sections in display order, skipping empty ones
    pub fn sections(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [
            ("changed files:", self.changed.as_slice()),
            ("new files:", self.new.as_slice()),
            ("deleted files:", self.deleted.as_slice()),
        ]
        .into_iter()
        .filter(|(_, paths)| !paths.is_empty())
    }
}

impl std::fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (title, paths) in self.sections() {
            writeln!(f, "{title}")?;
            for path in paths {
                writeln!(f, "    {path}")?;
            }
        }

        Ok(())
    }
}
