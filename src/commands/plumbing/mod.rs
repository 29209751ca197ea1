//! Plumbing commands (low-level object and index access)
//!
//! - `hash-object`: compute an object ID and optionally store the object
//! - `cat-file`: print an object's type, size or contents
//! - `ls-files`: list staged files
//! - `write-tree`: store the index as a tree object

pub mod cat_file;
pub mod hash_object;
pub mod ls_files;
pub mod write_tree;
