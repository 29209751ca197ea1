use crate::artifacts::index::layout::{self, FieldValue, HEADER_LAYOUT};
use crate::artifacts::index::{SIGNATURE, VERSION};
use crate::artifacts::objects::object::Packable;
use crate::errors::TwigError;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: [u8; 4],
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    pub fn for_entries(entries_count: u32) -> Self {
        IndexHeader::new(SIGNATURE, VERSION, entries_count)
    }

    /// Decode the 12-byte header, checking the signature before the version
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let fields = layout::decode(&HEADER_LAYOUT, bytes)
            .map_err(|e| TwigError::CorruptIndex(format!("truncated header: {e}")))?;

        let signature = match fields[0] {
            FieldValue::Tag(tag) => tag,
            _ => return Err(TwigError::CorruptIndex("malformed signature".to_string()).into()),
        };
        if signature != SIGNATURE {
            return Err(TwigError::CorruptIndex(format!(
                "bad signature {:?}",
                String::from_utf8_lossy(&signature)
            ))
            .into());
        }

        let version = fields[1].as_u32()?;
        if version != VERSION {
            return Err(TwigError::UnsupportedIndexVersion(version).into());
        }

        Ok(IndexHeader::new(signature, version, fields[2].as_u32()?))
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(layout::layout_size(&HEADER_LAYOUT));
        layout::encode(
            &HEADER_LAYOUT,
            &[
                FieldValue::Tag(self.signature),
                FieldValue::U32(self.version),
                FieldValue::U32(self.entries_count),
            ],
            &mut bytes,
        )?;

        Ok(Bytes::from(bytes))
    }
}
