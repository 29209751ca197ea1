use crate::areas::remote::{Credentials, Remote};
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Head commit a remote advertises for `git-receive-pack`
    pub async fn remote_head(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> anyhow::Result<Option<ObjectId>> {
        Remote::new(url).fetch_remote_head(credentials).await
    }
}
