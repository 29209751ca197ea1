use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use tracing::info;

impl Repository {
    /// Commit the staged tree on the current branch
    ///
    /// Without an explicit author the identity comes from `GIT_AUTHOR_*`; the
    /// committer defaults to the author unless `GIT_COMMITTER_*` is set.
    pub async fn commit(&self, message: &str, author: Option<Author>) -> anyhow::Result<ObjectId> {
        let tree_oid = self.write_tree().await?;

        let author = match author {
            Some(author) => author,
            None => Author::load_from_env()?,
        };
        let committer = author.committer_with(|key| std::env::var(key).ok());

        // the branch stays locked from reading the parent until it moves
        let commit_oid = self.refs().advance_head(|parent| {
            let commit = Commit::new(parent, tree_oid, author, committer, message.to_string());
            let commit_oid = self.database().store(&commit)?;

            info!(
                oid = %commit_oid,
                root = commit.parent().is_none(),
                message = %commit.short_message(),
                "created commit"
            );
            Ok(commit_oid)
        })?;

        Ok(commit_oid)
    }
}
