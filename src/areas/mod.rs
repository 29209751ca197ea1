//! Core repository components
//!
//! - `database`: object database for blobs, trees and commits
//! - `index`: staging area
//! - `lockfile`: `<file>.lock` claims with write-and-rename commits
//! - `refs`: `HEAD` and branch refs
//! - `remote`: ref discovery against a smart-HTTP remote
//! - `repository`: the handle tying the components together
//! - `workspace`: working directory file system access

pub mod database;
pub mod index;
pub mod lockfile;
pub mod refs;
pub mod remote;
pub mod repository;
pub mod workspace;
