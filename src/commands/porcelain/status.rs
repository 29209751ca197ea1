use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::status_info::StatusInfo;
use std::collections::BTreeMap;

impl Repository {
    /// Compare the working copy against the index
    pub async fn status(&self) -> anyhow::Result<StatusInfo> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let staged = index
            .entries()
            .map(|entry| (entry.path.clone(), entry.oid.clone()))
            .collect::<BTreeMap<_, _>>();
        let workspace_files = self.workspace().list_files()?;

        StatusInfo::partition(&workspace_files, &staged, |path| {
            let data = self.workspace().read_file(path)?;
            self.database().hash(ObjectType::Blob, &data)
        })
    }
}
