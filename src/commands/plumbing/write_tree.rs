use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use tracing::debug;

impl Repository {
    /// Store the staged files as a single flat tree
    pub async fn write_tree(&self) -> anyhow::Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let tree = Tree::build(index.entries())?;
        let tree_oid = self.database().store(&tree)?;

        debug!(oid = %tree_oid, entries = tree.entries().len(), "wrote tree");
        Ok(tree_oid)
    }
}
