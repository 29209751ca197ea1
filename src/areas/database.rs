//! Content-addressed object storage
//!
//! Objects are zlib-compressed and stored at `objects/<2 hex>/<38 hex>`, named
//! by the SHA-1 of their framed content.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable, frame, hash_payload};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters of a digest used as the shard directory name
const SHARD_PREFIX_LEN: usize = 2;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.store_bytes(object.object_type(), &object.serialize()?)
    }

    /// Store a payload unless an object with the same digest already exists
    pub fn store_bytes(&self, object_type: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        let object_id = hash_payload(object_type, payload)?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            debug!(oid = %object_id, %object_type, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, &frame(object_type, payload))?;
        debug!(oid = %object_id, %object_type, size = payload.len(), "stored object");

        Ok(object_id)
    }

    /// Digest a payload without writing it
    pub fn hash(&self, object_type: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        hash_payload(object_type, payload)
    }

    /// Resolve a digest or an unambiguous digest prefix to a stored object
    pub fn resolve(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if prefix.len() < SHARD_PREFIX_LEN || !prefix.is_char_boundary(SHARD_PREFIX_LEN) {
            return Err(TwigError::PrefixTooShort(prefix.to_string()).into());
        }

        let prefix = prefix.to_ascii_lowercase();
        let mut matches = self.find_objects_by_prefix(&prefix)?;

        match matches.len() {
            0 => Err(TwigError::NotFound(prefix).into()),
            1 => Ok(matches.remove(0)),
            count => Err(TwigError::AmbiguousPrefix { prefix, count }.into()),
        }
    }

    /// Path of the object file a digest or prefix resolves to
    pub fn resolve_path(&self, prefix: &str) -> anyhow::Result<PathBuf> {
        Ok(self.path.join(self.resolve(prefix)?.to_path()))
    }

    /// Load an object's type and payload, checking its header
    pub fn load(&self, prefix: &str) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_id = self.resolve(prefix)?;
        let corrupt = |reason: String| {
            anyhow::Error::from(TwigError::CorruptObject {
                oid: object_id.to_string(),
                reason,
            })
        };

        let object_path = self.path.join(object_id.to_path());
        let compressed = std::fs::read(&object_path)
            .with_context(|| format!("Unable to read object file {}", object_path.display()))?;
        let content = Self::decompress(&compressed)
            .map_err(|e| corrupt(format!("undecodable zlib data: {e}")))?;

        let nul = content
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing NUL after header".to_string()))?;
        let (object_type, size) =
            ObjectType::parse_header(&content[..nul]).map_err(|e| corrupt(e.to_string()))?;

        let payload = content.slice(nul + 1..);
        if payload.len() != size {
            return Err(corrupt(format!(
                "header declares {size} bytes, payload has {}",
                payload.len()
            )));
        }

        Ok((object_type, payload))
    }

    pub fn parse_object(&self, prefix: &str) -> anyhow::Result<ObjectBox> {
        let (object_type, payload) = self.load(prefix)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(payload)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(payload)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(payload)?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.load(object_id.as_ref())? {
            (ObjectType::Blob, payload) => Ok(Some(Blob::deserialize(payload)?)),
            _ => Ok(None),
        }
    }

    fn write_object(&self, object_path: &Path, framed: &[u8]) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let compressed = Self::compress(framed)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;
        file.write_all(&compressed).with_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // readers never observe a partially written object
        std::fs::rename(&temp_object_path, object_path).with_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects in the prefix's shard directory whose digest starts with it
    fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let (dir_name, file_prefix) = prefix.split_at(SHARD_PREFIX_LEN);
        let dir_path = self.path.join(dir_name);

        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to list {}", dir_path.display()))?
        {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }

        matches.sort();
        Ok(matches)
    }
}
