//! Fixed-width binary layouts
//!
//! The index header and the fixed part of every index entry are described as
//! tables of named, fixed-width, big-endian fields. A single [`encode`] and a
//! single [`decode`] routine interpret those tables.

use crate::artifacts::objects::OBJECT_ID_BYTES;
use anyhow::anyhow;
use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// 4 raw bytes
    Tag,
    U16,
    U32,
    /// 20-byte SHA-1 digest
    Digest,
}

impl FieldWidth {
    pub const fn size(self) -> usize {
        match self {
            FieldWidth::Tag => 4,
            FieldWidth::U16 => 2,
            FieldWidth::U32 => 4,
            FieldWidth::Digest => OBJECT_ID_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: FieldWidth,
}

const fn field(name: &'static str, width: FieldWidth) -> Field {
    Field { name, width }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Tag([u8; 4]),
    U16(u16),
    U32(u32),
    Digest([u8; OBJECT_ID_BYTES]),
}

impl FieldValue {
    fn width(&self) -> FieldWidth {
        match self {
            FieldValue::Tag(_) => FieldWidth::Tag,
            FieldValue::U16(_) => FieldWidth::U16,
            FieldValue::U32(_) => FieldWidth::U32,
            FieldValue::Digest(_) => FieldWidth::Digest,
        }
    }

    pub fn as_u32(&self) -> anyhow::Result<u32> {
        match self {
            FieldValue::U32(value) => Ok(*value),
            other => Err(anyhow!("expected a u32 field, got {other:?}")),
        }
    }

    pub fn as_u16(&self) -> anyhow::Result<u16> {
        match self {
            FieldValue::U16(value) => Ok(*value),
            other => Err(anyhow!("expected a u16 field, got {other:?}")),
        }
    }
}

pub const HEADER_LAYOUT: [Field; 3] = [
    field("signature", FieldWidth::Tag),
    field("version", FieldWidth::U32),
    field("entries", FieldWidth::U32),
];

pub const ENTRY_LAYOUT: [Field; 12] = [
    field("ctime_s", FieldWidth::U32),
    field("ctime_ns", FieldWidth::U32),
    field("mtime_s", FieldWidth::U32),
    field("mtime_ns", FieldWidth::U32),
    field("dev", FieldWidth::U32),
    field("ino", FieldWidth::U32),
    field("mode", FieldWidth::U32),
    field("uid", FieldWidth::U32),
    field("gid", FieldWidth::U32),
    field("size", FieldWidth::U32),
    field("sha1", FieldWidth::Digest),
    field("flags", FieldWidth::U16),
];

pub const fn layout_size(layout: &[Field]) -> usize {
    let mut size = 0;
    let mut i = 0;
    while i < layout.len() {
        size += layout[i].width.size();
        i += 1;
    }
    size
}

/// Width of the fixed part of an index entry (62 bytes)
pub const ENTRY_FIXED_SIZE: usize = layout_size(&ENTRY_LAYOUT);

pub fn encode(layout: &[Field], values: &[FieldValue], writer: &mut impl Write) -> anyhow::Result<()> {
    if layout.len() != values.len() {
        return Err(anyhow!(
            "layout has {} fields but {} values were given",
            layout.len(),
            values.len()
        ));
    }

    for (field, value) in layout.iter().zip(values) {
        if field.width != value.width() {
            return Err(anyhow!(
                "field {} expects {:?}, got {:?}",
                field.name,
                field.width,
                value
            ));
        }

        match value {
            FieldValue::Tag(tag) => writer.write_all(tag)?,
            FieldValue::U16(value) => writer.write_u16::<NetworkEndian>(*value)?,
            FieldValue::U32(value) => writer.write_u32::<NetworkEndian>(*value)?,
            FieldValue::Digest(digest) => writer.write_all(digest)?,
        }
    }

    Ok(())
}

pub fn decode(layout: &[Field], bytes: &[u8]) -> anyhow::Result<Vec<FieldValue>> {
    let size = layout_size(layout);
    if bytes.len() < size {
        return Err(anyhow!("need {} bytes, got {}", size, bytes.len()));
    }

    let mut offset = 0;
    let values = layout
        .iter()
        .map(|field| {
            let chunk = &bytes[offset..offset + field.width.size()];
            offset += field.width.size();

            match field.width {
                FieldWidth::Tag => FieldValue::Tag([chunk[0], chunk[1], chunk[2], chunk[3]]),
                FieldWidth::U16 => FieldValue::U16(NetworkEndian::read_u16(chunk)),
                FieldWidth::U32 => FieldValue::U32(NetworkEndian::read_u32(chunk)),
                FieldWidth::Digest => {
                    let mut digest = [0; OBJECT_ID_BYTES];
                    digest.copy_from_slice(chunk);
                    FieldValue::Digest(digest)
                }
            }
        })
        .collect();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry_layout_is_62_bytes() {
        assert_eq!(ENTRY_FIXED_SIZE, 62);
        assert_eq!(layout_size(&HEADER_LAYOUT), 12);
    }

    #[test]
    fn encode_is_big_endian() {
        let mut bytes = Vec::new();
        encode(
            &HEADER_LAYOUT,
            &[
                FieldValue::Tag(*b"DIRC"),
                FieldValue::U32(2),
                FieldValue::U32(0x0102_0304),
            ],
            &mut bytes,
        )
        .unwrap();

        assert_eq!(bytes, b"DIRC\x00\x00\x00\x02\x01\x02\x03\x04");
        assert_eq!(
            decode(&HEADER_LAYOUT, &bytes).unwrap(),
            vec![
                FieldValue::Tag(*b"DIRC"),
                FieldValue::U32(2),
                FieldValue::U32(0x0102_0304)
            ]
        );
    }

    #[test]
    fn encode_rejects_mismatched_values() {
        let mut bytes = Vec::new();
        let wrong_width = [
            FieldValue::Tag(*b"DIRC"),
            FieldValue::U16(2),
            FieldValue::U32(1),
        ];

        assert!(encode(&HEADER_LAYOUT, &wrong_width, &mut bytes).is_err());
        assert!(encode(&HEADER_LAYOUT, &wrong_width[..2], &mut bytes).is_err());
    }

    #[test]
    fn decode_rejects_short_input() {
        assert!(decode(&ENTRY_LAYOUT, &[0; 61]).is_err());
    }
}
