//! Command implementations
//!
//! Every command is a method on [`Repository`](crate::areas::repository::Repository):
//!
//! - `plumbing`: low-level object and index access (hash-object, cat-file, ls-files, write-tree)
//! - `porcelain`: user-facing workflows (init, add, status, diff, commit, remote-head)

pub mod plumbing;
pub mod porcelain;
