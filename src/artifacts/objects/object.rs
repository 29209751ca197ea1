use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};

/// Encodes a value into its payload bytes (without the object header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decodes a value from its payload bytes (the object header has already been stripped)
pub trait Unpackable {
    fn deserialize(payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// Full object content as hashed and stored: `<type> <size>\0<payload>`
    fn frame(&self) -> Result<Bytes> {
        let payload = self.serialize()?;
        Ok(frame(self.object_type(), &payload))
    }

    fn object_id(&self) -> Result<ObjectId> {
        let payload = self.serialize()?;
        hash_payload(self.object_type(), &payload)
    }
}

/// Prefix a payload with its object header
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = object_type.header(payload.len());

    let mut content = Vec::with_capacity(header.len() + payload.len());
    content.extend_from_slice(header.as_bytes());
    content.extend_from_slice(payload);

    Bytes::from(content)
}

/// Compute the object ID of a payload of the given type
pub fn hash_payload(object_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
    let mut hasher = Sha1::new();
    hasher.update(object_type.header(payload.len()).as_bytes());
    hasher.update(payload);

    ObjectId::from_digest(&hasher.finalize())
}

#[derive(Debug, Clone)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(blob) => blob.object_type(),
            ObjectBox::Tree(tree) => tree.object_type(),
            ObjectBox::Commit(commit) => commit.object_type(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blob_hash_matches_git() {
        // git hash-object on "hello world\n"
        let oid = hash_payload(ObjectType::Blob, b"hello world\n").unwrap();
        assert_eq!(oid.as_ref(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
    }

    #[test]
    fn empty_tree_hash_matches_git() {
        let oid = hash_payload(ObjectType::Tree, b"").unwrap();
        assert_eq!(oid.as_ref(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    }

    #[test]
    fn frame_prefixes_header() {
        assert_eq!(&frame(ObjectType::Blob, b"abc")[..], b"blob 3\0abc");
    }
}
