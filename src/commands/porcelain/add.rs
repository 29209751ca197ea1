use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_type::ObjectType;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

impl Repository {
    /// Stage files; directories are expanded to the files beneath them
    pub async fn add<P: AsRef<Path>>(&self, paths: &[P]) -> anyhow::Result<()> {
        let paths = paths
            .iter()
            .map(|path| {
                let path = self.workspace().normalize(path.as_ref());
                self.workspace().list_files_under(&path)
            })
            .collect::<anyhow::Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>();

        let index = self.index();
        let mut index = index.lock().await;

        index.update(|index| {
            for path in &paths {
                index.remove(path);

                let data = self.workspace().read_file(path)?;
                let stat = self.workspace().stat_file(path)?;
                let oid = self.database().store_bytes(ObjectType::Blob, &data)?;

                debug!(%path, %oid, "staging file");
                index.add(IndexEntry::new(path.clone(), oid, stat));
            }

            Ok(())
        })?;

        info!(files = paths.len(), "updated index");
        Ok(())
    }
}
