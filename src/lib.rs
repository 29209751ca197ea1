//! twig: a minimal content-addressable version-control storage engine.
//!
//! Snapshots of a flat working directory are stored as immutable, SHA-1 addressed
//! objects in a git-compatible `.git` directory. A binary index tracks staged files,
//! flat trees are built from it and chained into commits on a branch ref. A small
//! pkt-line client discovers the head of a remote branch.
//!
//! - `areas`: stateful repository components (object database, index, refs, workspace, remote)
//! - `artifacts`: data structures and codecs (objects, index format, diffing, pkt-lines)
//! - `commands`: operations exposed on the [`Repository`](areas::repository::Repository) handle
//! - `errors`: typed failures carried through `anyhow::Error`

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
