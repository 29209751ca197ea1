//! Working tree status
//!
//! Partitions the working copy against the index into changed, new and
//! deleted paths.

pub mod status_info;
