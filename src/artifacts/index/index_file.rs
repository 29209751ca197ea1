//! Whole-file index codec
//!
//! Reading checks, in order: the trailing checksum, the signature, the version,
//! each entry, and finally that the number of decoded entries matches the header.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::objects::object::Packable;
use crate::errors::TwigError;
use bytes::Bytes;

/// Decode index bytes into entries; an empty buffer is an empty index
pub fn decode(data: &[u8]) -> anyhow::Result<Vec<IndexEntry>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let body = Checksum::verify(data)?;
    let header = IndexHeader::decode(body)?;

    let mut entries = Vec::new();
    let mut offset = HEADER_SIZE;
    while offset < body.len() {
        let (entry, record_len) = IndexEntry::decode(&body[offset..])?;
        entries.push(entry);
        offset += record_len;
    }

    if entries.len() != header.entries_count as usize {
        return Err(TwigError::CorruptIndex(format!(
            "header declares {} entries, found {}",
            header.entries_count,
            entries.len()
        ))
        .into());
    }

    Ok(entries)
}

/// Encode sorted, unique entries into a complete index file image
pub fn encode(entries: &[IndexEntry]) -> anyhow::Result<Bytes> {
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].path >= pair[1].path) {
        return Err(TwigError::CorruptIndex(format!(
            "entries not sorted and unique at {:?}",
            pair[1].path
        ))
        .into());
    }

    let mut writer = Checksum::new();
    writer.write(&IndexHeader::for_entries(entries.len() as u32).serialize()?);
    for entry in entries {
        writer.write(&entry.serialize()?);
    }

    Ok(writer.finish())
}
