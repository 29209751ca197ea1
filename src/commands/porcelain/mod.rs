//! Porcelain commands (user-facing operations)
//!
//! - `init`: create a repository
//! - `add`: stage files
//! - `status`: changed, new and deleted files
//! - `diff`: unified diff between the index and the working copy
//! - `commit`: record the staged tree on the current branch
//! - `remote_head`: head commit advertised by a remote

pub mod add;
pub mod commit;
pub mod diff;
pub mod init;
pub mod remote_head;
pub mod status;
