//! Branch references
//!
//! `HEAD` is a symbolic ref naming the current branch (`ref: refs/heads/<name>`);
//! the branch ref file holds the digest of its tip commit followed by a newline.

use crate::areas::lockfile::Lockfile;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    /// Branch named by `HEAD`, or the default branch when `HEAD` is absent
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        match Self::read_ref_file(&self.head_path())? {
            Some(content) => BranchName::try_parse_symref(&content),
            None => Ok(BranchName::default()),
        }
    }

    /// Point `HEAD` at a branch
    pub fn set_head(&self, branch: &BranchName) -> anyhow::Result<()> {
        let mut lock = Lockfile::acquire(&self.head_path())?;
        lock.write(branch.to_symref().as_bytes())?;
        lock.commit()
    }

    /// Tip of the current branch; `None` before the first commit
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(&self.current_branch()?)
    }

    pub fn read_ref(&self, branch: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.path.join(branch.ref_path());
        let Some(content) = Self::read_ref_file(&ref_path)? else {
            return Ok(None);
        };

        ObjectId::try_parse(content.trim().to_string())
            .map(Some)
            .with_context(|| format!("malformed ref file {}", ref_path.display()))
    }

    /// Move the current branch to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.advance_head(|_| Ok(oid.clone()))?;
        Ok(())
    }

    /// Move the current branch to the commit `f` builds on top of its tip
    ///
    /// The branch ref stays locked from reading the tip until the new digest
    /// is in place, so concurrent writers chain instead of overwriting each
    /// other. Nothing changes if `f` fails.
    pub fn advance_head(
        &self,
        f: impl FnOnce(Option<ObjectId>) -> anyhow::Result<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let branch = self.current_branch()?;
        let ref_path = self.path.join(branch.ref_path());

        let mut lock = Lockfile::acquire(&ref_path)?;
        let parent = self.read_ref(&branch)?;
        let oid = f(parent)?;

        lock.write(format!("{oid}\n").as_bytes())?;
        lock.commit()?;

        Ok(oid)
    }

    fn read_ref_file(path: &Path) -> anyhow::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read ref file {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TwigError;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    const OID: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";

    #[fixture]
    fn git_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn refs(dir: &TempDir) -> Refs {
        Refs::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn fresh_repository_has_no_head_commit(git_dir: TempDir) {
        let refs = refs(&git_dir);
        assert_eq!(refs.current_branch().unwrap().as_ref(), "master");
        assert_eq!(refs.read_head().unwrap(), None);
    }

    #[rstest]
    fn update_head_writes_current_branch(git_dir: TempDir) {
        let refs = refs(&git_dir);
        let topic = BranchName::try_parse("topic".to_string()).unwrap();
        refs.set_head(&topic).unwrap();

        let oid = ObjectId::try_parse(OID.to_string()).unwrap();
        refs.update_head(&oid).unwrap();

        git_dir.child("HEAD").assert("ref: refs/heads/topic\n");
        git_dir.child("refs/heads/topic").assert(format!("{OID}\n"));
        assert_eq!(refs.read_head().unwrap(), Some(oid));
    }

    #[rstest]
    fn advance_head_passes_current_tip(git_dir: TempDir) {
        let refs = refs(&git_dir);
        let first = ObjectId::try_parse(OID.to_string()).unwrap();
        refs.update_head(&first).unwrap();

        let second = ObjectId::try_parse("a".repeat(40)).unwrap();
        let advanced = refs
            .advance_head(|parent| {
                assert_eq!(parent, Some(first.clone()));
                Ok(second.clone())
            })
            .unwrap();

        assert_eq!(advanced, second);
        git_dir.child("refs/heads/master").assert(format!("{second}\n"));
        git_dir
            .child("refs/heads/master.lock")
            .assert(predicates::path::missing());
    }

    #[rstest]
    fn failed_advance_keeps_tip(git_dir: TempDir) {
        let refs = refs(&git_dir);
        refs.update_head(&ObjectId::try_parse(OID.to_string()).unwrap())
            .unwrap();

        let result = refs.advance_head(|_| anyhow::bail!("commit could not be stored"));

        assert!(result.is_err());
        git_dir.child("refs/heads/master").assert(format!("{OID}\n"));
        git_dir
            .child("refs/heads/master.lock")
            .assert(predicates::path::missing());
    }

    #[rstest]
    fn concurrent_advances_form_a_chain(git_dir: TempDir) {
        let refs = refs(&git_dir);
        let digests = (0..16u8)
            .map(|i| ObjectId::try_parse(format!("{i:02x}").repeat(20)).unwrap())
            .collect::<Vec<_>>();

        // every writer records the tip it built on
        let parents = std::sync::Mutex::new(Vec::new());
        std::thread::scope(|scope| {
            for oid in &digests {
                let (refs, parents) = (&refs, &parents);
                scope.spawn(move || {
                    refs.advance_head(|parent| {
                        parents.lock().unwrap().push(parent);
                        Ok(oid.clone())
                    })
                    .unwrap();
                });
            }
        });

        let parents = parents.into_inner().unwrap();
        assert_eq!(parents.iter().filter(|parent| parent.is_none()).count(), 1);

        let mut seen = parents.into_iter().flatten().collect::<Vec<_>>();
        seen.push(refs.read_head().unwrap().unwrap());
        seen.sort();
        assert_eq!(seen, {
            let mut sorted = digests.clone();
            sorted.sort();
            sorted
        });
    }

    #[rstest]
    fn empty_ref_file_is_malformed(git_dir: TempDir) {
        git_dir.child("refs/heads/master").write_str("").unwrap();
        assert!(refs(&git_dir).read_head().is_err());
    }

    #[rstest]
    fn detached_head_is_rejected(git_dir: TempDir) {
        git_dir.child("HEAD").write_str(OID).unwrap();

        let err = refs(&git_dir).current_branch().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TwigError>(),
            Some(TwigError::InvalidBranchName(_))
        ));
    }
}
