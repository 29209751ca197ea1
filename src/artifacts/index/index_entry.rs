//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path (always `/`-separated, relative to the repository root)
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps, device and inode)
//!
//! ## Entry Format
//!
//! The fixed part follows [`ENTRY_LAYOUT`]; it is followed by the NUL-terminated
//! path and zero padding so the record length is a multiple of 8 bytes.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::layout::{self, ENTRY_FIXED_SIZE, ENTRY_LAYOUT, FieldValue};
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use bitflags::bitflags;
use bytes::Bytes;
use derive_new::new;
use std::cmp::min;
use std::fs::Metadata;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

bitflags! {
    /// The 16-bit flags field of an index entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
        const NAME_LENGTH = 0x0fff;
    }
}

impl EntryFlags {
    /// Flags of a fresh stage-0 entry: the path's byte length, saturated at 0xfff
    pub fn for_path(path: &str) -> Self {
        let length = min(path.len(), Self::NAME_LENGTH.bits() as usize) as u16;
        Self::from_bits_retain(length)
    }

    pub fn stage(&self) -> u8 {
        ((self.bits() & Self::STAGE.bits()) >> 12) as u8
    }

    pub fn name_length(&self) -> usize {
        (self.bits() & Self::NAME_LENGTH.bits()) as usize
    }
}

/// File metadata stored in index entries
///
/// Every numeric field is stored as an unsigned 32-bit big-endian integer, so
/// wider values from the file system are truncated the same way git does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
    pub flags: EntryFlags,
}

impl EntryMetadata {
    pub fn from_stat(path: &str, file_path: &Path, metadata: &Metadata) -> Self {
        Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::for_path(file_path).as_u32(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
            flags: EntryFlags::for_path(path),
        }
    }
}

/// Index entry representing a staged file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub path: String,
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn stage(&self) -> u8 {
        self.metadata.flags.stage()
    }

    fn fields(&self) -> anyhow::Result<Vec<FieldValue>> {
        let m = &self.metadata;

        Ok(vec![
            FieldValue::U32(m.ctime),
            FieldValue::U32(m.ctime_nsec),
            FieldValue::U32(m.mtime),
            FieldValue::U32(m.mtime_nsec),
            FieldValue::U32(m.dev),
            FieldValue::U32(m.ino),
            FieldValue::U32(m.mode),
            FieldValue::U32(m.uid),
            FieldValue::U32(m.gid),
            FieldValue::U32(m.size),
            FieldValue::Digest(self.oid.to_bytes()?),
            FieldValue::U16(m.flags.bits()),
        ])
    }

    /// Length of the encoded record: fixed part, path and at least one NUL, rounded up to 8
    pub fn encoded_len(path_len: usize) -> usize {
        (ENTRY_FIXED_SIZE + path_len + ENTRY_BLOCK) / ENTRY_BLOCK * ENTRY_BLOCK
    }

    /// Decode one entry from the start of `bytes`, returning it with its record length
    pub fn decode(bytes: &[u8]) -> anyhow::Result<(Self, usize)> {
        let corrupt = |reason: String| anyhow::Error::from(TwigError::CorruptIndex(reason));

        let fields = layout::decode(&ENTRY_LAYOUT, bytes)
            .map_err(|e| corrupt(format!("truncated entry: {e}")))?;

        let path_len = bytes[ENTRY_FIXED_SIZE..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing NUL terminator in entry path".to_string()))?;
        let path = std::str::from_utf8(&bytes[ENTRY_FIXED_SIZE..ENTRY_FIXED_SIZE + path_len])
            .map_err(|_| corrupt("invalid UTF-8 in entry path".to_string()))?
            .to_string();

        let record_len = Self::encoded_len(path_len);
        if record_len > bytes.len() {
            return Err(corrupt(format!("entry {path:?} is truncated")));
        }

        let oid = match &fields[10] {
            FieldValue::Digest(digest) => ObjectId::from_digest(digest)?,
            other => return Err(corrupt(format!("unexpected digest field {other:?}"))),
        };

        let metadata = EntryMetadata {
            ctime: fields[0].as_u32()?,
            ctime_nsec: fields[1].as_u32()?,
            mtime: fields[2].as_u32()?,
            mtime_nsec: fields[3].as_u32()?,
            dev: fields[4].as_u32()?,
            ino: fields[5].as_u32()?,
            mode: fields[6].as_u32()?,
            uid: fields[7].as_u32()?,
            gid: fields[8].as_u32()?,
            size: fields[9].as_u32()?,
            flags: EntryFlags::from_bits_retain(fields[11].as_u16()?),
        };

        Ok((IndexEntry::new(path, oid, metadata), record_len))
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut entry_bytes = Vec::with_capacity(Self::encoded_len(self.path.len()));

        layout::encode(&ENTRY_LAYOUT, &self.fields()?, &mut entry_bytes)?;
        entry_bytes.extend_from_slice(self.path.as_bytes());

        // There must be at least one NUL byte after the path
        entry_bytes.push(0);
        entry_bytes.resize(Self::encoded_len(self.path.len()), 0);

        Ok(Bytes::from(entry_bytes))
    }
}
