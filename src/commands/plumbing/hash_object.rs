use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Digest a file as an object of the given type, storing it when `write` is set
    pub fn hash_object(
        &self,
        path: &Path,
        object_type: ObjectType,
        write: bool,
    ) -> anyhow::Result<ObjectId> {
        let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

        if write {
            self.database().store_bytes(object_type, &data)
        } else {
            self.database().hash(object_type, &data)
        }
    }
}
