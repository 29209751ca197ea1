//! Object types and operations
//!
//! Every piece of content is stored as an object identified by a SHA-1 hash:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Flat directory listing (modes, names and object IDs)
//! - **Commit**: Snapshot metadata (tree, optional parent, author, committer, message)
//!
//! All objects share the on-disk framing `<type> <size>\0<payload>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_BYTES: usize = 20;
