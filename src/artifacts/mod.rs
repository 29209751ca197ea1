//! Repository data structures and codecs
//!
//! - `branch`: Branch name validation and the `HEAD` symbolic ref format
//! - `diff`: Myers' line diff and unified-diff hunks
//! - `index`: Index file layout, entries, header and checksum
//! - `objects`: Object types (blob, tree, commit) and object IDs
//! - `protocol`: Pkt-line framing and remote ref advertisements
//! - `status`: Working tree status report

pub mod branch;
pub mod diff;
pub mod index;
pub mod objects;
pub mod protocol;
pub mod status;
