//! Index file format
//!
//! The index (also called staging area or cache) records which files, at which
//! content, go into the next commit.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 62-byte fixed header (see `layout::ENTRY_LAYOUT`)
//!   - NUL-terminated path, zero-padded to 8-byte alignment
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod entry_mode;
pub mod index_entry;
pub mod index_file;
pub mod index_header;
pub mod layout;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying index files
pub const SIGNATURE: [u8; 4] = *b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;
