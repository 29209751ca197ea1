use crate::areas::repository::Repository;
use crate::artifacts::diff::myers::EditKind;
use crate::artifacts::diff::unified::unified_diff;
use crate::artifacts::diff::{CONTEXT_LINES, FILE_SEPARATOR_WIDTH};
use anyhow::Context;

impl Repository {
    /// Unified diff lines of every changed file, index side first
    ///
    /// Consecutive files are separated by a line of dashes, tagged as context.
    pub async fn diff_lines(&self) -> anyhow::Result<Vec<(EditKind, String)>> {
        let changed = self.status().await?.changed;

        let index = self.index();
        let index = index.lock().await;

        let mut lines = Vec::new();
        for (i, path) in changed.iter().enumerate() {
            let entry = index
                .entry_by_path(path)
                .with_context(|| format!("{path} is not staged"))?;
            let blob = self
                .database()
                .parse_object_as_blob(&entry.oid)?
                .with_context(|| format!("index entry for {path} is not a blob"))?;

            let working_copy = self.workspace().read_file(path)?;
            let working_lines = String::from_utf8_lossy(&working_copy)
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>();

            lines.extend(unified_diff(
                &blob.lines(),
                &working_lines,
                &format!("{path} (index)"),
                &format!("{path} (working copy)"),
                CONTEXT_LINES,
            ));

            if i + 1 < changed.len() {
                lines.push((EditKind::Equal, "-".repeat(FILE_SEPARATOR_WIDTH)));
            }
        }

        Ok(lines)
    }

    pub async fn diff(&self) -> anyhow::Result<String> {
        Ok(self
            .diff_lines()
            .await?
            .into_iter()
            .map(|(_, line)| line + "\n")
            .collect())
    }
}
