//! Typed repository failures.
//!
//! Operations return `anyhow::Result`; the variants below travel inside `anyhow::Error`
//! and can be recovered with `err.downcast_ref::<TwigError>()`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TwigError {
    /// No stored object matches the digest or prefix.
    #[error("object {0} not found")]
    NotFound(String),

    /// A digest prefix matches more than one stored object.
    #[error("multiple objects ({count}) with prefix {prefix}")]
    AmbiguousPrefix { prefix: String, count: usize },

    /// Prefixes shorter than the shard directory name cannot be resolved.
    #[error("hash prefix must be 2 or more characters, got {0:?}")]
    PrefixTooShort(String),

    /// A stored object failed to decompress or its header does not match its payload.
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("invalid index checksum")]
    IndexChecksumMismatch,

    #[error("unsupported index version {0}")]
    UnsupportedIndexVersion(u32),

    /// Structural damage in the index file other than the checksum or version.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// Only a single flat directory can be written as a tree.
    #[error("unsupported path {0:?}: nested directories cannot be written to a tree")]
    UnsupportedPath(String),

    #[error("missing author identity: {0} not set")]
    MissingIdentity(&'static str),

    #[error("invalid GIT_AUTHOR_DATE {0:?}")]
    InvalidAuthorDate(String),

    /// The remote answered with something other than the expected ref advertisement.
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(String),

    #[error("invalid pkt-line: {0}")]
    InvalidPktLine(String),

    #[error("repository already exists at {0}")]
    AlreadyInitialized(String),

    /// Another writer holds `<file>.lock`.
    #[error("unable to lock {0}: held by another writer")]
    LockUnavailable(String),

    #[error("invalid branch name: {0:?}")]
    InvalidBranchName(String),
}
