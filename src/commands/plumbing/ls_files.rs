use crate::areas::repository::Repository;

impl Repository {
    /// Staged paths; with `details`, `<mode> <digest> <stage>\t<path>` per entry
    pub async fn ls_files(&self, details: bool) -> anyhow::Result<Vec<String>> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        Ok(index
            .entries()
            .map(|entry| {
                if details {
                    format!(
                        "{:06o} {} {}\t{}",
                        entry.metadata.mode,
                        entry.oid,
                        entry.stage(),
                        entry.path
                    )
                } else {
                    entry.path.clone()
                }
            })
            .collect())
    }
}
