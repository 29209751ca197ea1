use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;

/// What `cat-file` reports about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// Object type name
    Type,
    /// Payload size in bytes
    Size,
    /// Human-readable rendering of the object
    Pretty,
    /// Raw payload, which must be of the given type
    Raw(ObjectType),
}

impl Repository {
    pub fn cat_file(&self, prefix: &str, mode: CatFileMode) -> anyhow::Result<Bytes> {
        match mode {
            CatFileMode::Type => {
                let (object_type, _) = self.database().load(prefix)?;
                Ok(Bytes::from(format!("{object_type}\n")))
            }
            CatFileMode::Size => {
                let (_, payload) = self.database().load(prefix)?;
                Ok(Bytes::from(format!("{}\n", payload.len())))
            }
            CatFileMode::Pretty => match self.database().parse_object(prefix)? {
                ObjectBox::Blob(blob) => Ok(blob.content().clone()),
                object => Ok(Bytes::from(object.display() + "\n")),
            },
            CatFileMode::Raw(expected) => {
                let (object_type, payload) = self.database().load(prefix)?;
                if object_type != expected {
                    anyhow::bail!("expected object type {expected}, got {object_type}");
                }
                Ok(payload)
            }
        }
    }
}
