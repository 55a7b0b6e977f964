//! Folder manager - the query and mutation surface over folder state
//!
//! Every operation is scoped by resource kind. Mutations share one shape:
//! apply to in-memory state under the write lock, persist once, then notify
//! subscribers of the touched kind. An operation that changes nothing
//! neither saves nor notifies. Persistence failures propagate to the caller
//! with the in-memory change already applied.

use std::collections::HashSet;

use anyhow::Result;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use super::events::{ChangeBus, FolderEvent};
use super::state::{Folder, FolderState};
use super::store::FolderStore;
use crate::resources::ResourceKind;

pub struct FolderManager {
    store: FolderStore,
    state: RwLock<FolderState>,
    bus: ChangeBus,
}

impl FolderManager {
    /// Load persisted state through the store and wrap it. Never fails;
    /// unreadable state starts empty.
    pub async fn load(store: FolderStore) -> Self {
        let state = store.load().await;
        Self {
            store,
            state: RwLock::new(state),
            bus: ChangeBus::new(),
        }
    }

    /// Subscribe to change events. Each mutation that alters state fires
    /// exactly one event carrying the affected kind.
    pub fn subscribe(&self) -> broadcast::Receiver<FolderEvent> {
        self.bus.subscribe()
    }

    /// All folders of a kind, in creation order.
    pub async fn folders(&self, kind: ResourceKind) -> Vec<Folder> {
        self.state.read().await.kind_folders(kind).to_vec()
    }

    /// Folders directly under the given parent (`None` = root level).
    pub async fn child_folders(&self, kind: ResourceKind, parent_id: Option<&str>) -> Vec<Folder> {
        self.state
            .read()
            .await
            .child_folders(kind, parent_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The folder an item is assigned to, `None` when it sits at root.
    pub async fn folder_for_item(&self, kind: ResourceKind, key: &str) -> Option<String> {
        self.state
            .read()
            .await
            .assignment_map(kind)
            .and_then(|map| map.get(key).cloned())
    }

    /// Item keys directly assigned to a folder, in assignment order.
    pub async fn items_in_folder(&self, kind: ResourceKind, folder_id: &str) -> Vec<String> {
        self.state.read().await.items_in_folder(kind, folder_id)
    }

    /// Direct item count plus the counts of every descendant folder.
    pub async fn count_items_recursive(&self, kind: ResourceKind, folder_id: &str) -> usize {
        self.state
            .read()
            .await
            .count_items_recursive(kind, folder_id)
    }

    /// Create a folder with a fresh id. The name is stored as given
    /// (duplicate sibling names are legal) and `parent_id` is not checked
    /// for existence; a dangling parent leaves the folder unreachable from
    /// the root.
    pub async fn create_folder(
        &self,
        kind: ResourceKind,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Folder> {
        let folder = Folder {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
        };

        let mut state = self.state.write().await;
        state
            .folders
            .entry(kind)
            .or_default()
            .push(folder.clone());
        self.store.save(&state).await?;
        drop(state);

        info!(kind = %kind, folder_id = %folder.id, name = %folder.name, "created folder");
        self.bus.notify(kind);
        Ok(folder)
    }

    /// Rename a folder in place. An unknown id or an unchanged name changes
    /// nothing, so nothing is saved and no event fires.
    pub async fn rename_folder(
        &self,
        kind: ResourceKind,
        folder_id: &str,
        new_name: &str,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(folder) = state
            .folders
            .entry(kind)
            .or_default()
            .iter_mut()
            .find(|f| f.id == folder_id)
        else {
            debug!(kind = %kind, folder_id = %folder_id, "rename target not found");
            return Ok(());
        };
        if folder.name == new_name {
            return Ok(());
        }

        folder.name = new_name.to_string();
        self.store.save(&state).await?;
        drop(state);

        info!(kind = %kind, folder_id = %folder_id, "renamed folder");
        self.bus.notify(kind);
        Ok(())
    }

    /// Delete a folder and its whole subtree, descendants first. Every
    /// assignment pointing at a removed folder is cleared, so affected
    /// items revert to root level. An unknown id is a no-op.
    pub async fn delete_folder(&self, kind: ResourceKind, folder_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.find_folder(kind, folder_id).is_none() {
            debug!(kind = %kind, folder_id = %folder_id, "delete target not found");
            return Ok(());
        }

        let doomed: HashSet<String> = state.subtree_ids(kind, folder_id).into_iter().collect();
        state
            .folders
            .entry(kind)
            .or_default()
            .retain(|f| !doomed.contains(&f.id));
        if let Some(map) = state.assignments.get_mut(&kind) {
            map.retain(|_, target| !doomed.contains(target));
        }
        self.store.save(&state).await?;
        drop(state);

        info!(
            kind = %kind,
            folder_id = %folder_id,
            removed = doomed.len(),
            "deleted folder"
        );
        self.bus.notify(kind);
        Ok(())
    }

    /// Assign one item to a folder, or back to root when `folder_id` is
    /// `None`.
    pub async fn assign_item(
        &self,
        kind: ResourceKind,
        key: &str,
        folder_id: Option<&str>,
    ) -> Result<()> {
        let keys = [key.to_string()];
        self.assign_items(kind, &keys, folder_id).await
    }

    /// Batch assignment: the whole set is applied in memory, persisted
    /// once, and announced with a single event. Assigning to an unknown
    /// folder id is accepted; the items stay hidden until moved back to
    /// root. Keys already in the requested position are left untouched,
    /// and a batch that changes nothing fires no event.
    pub async fn assign_items(
        &self,
        kind: ResourceKind,
        keys: &[String],
        folder_id: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let map = state.assignments.entry(kind).or_default();

        let mut changed = false;
        for key in keys {
            match folder_id {
                Some(target) => {
                    if map.get(key).map(String::as_str) != Some(target) {
                        map.insert(key.clone(), target.to_string());
                        changed = true;
                    }
                }
                None => {
                    if map.shift_remove(key).is_some() {
                        changed = true;
                    }
                }
            }
        }

        if !changed {
            return Ok(());
        }

        self.store.save(&state).await?;
        drop(state);

        info!(
            kind = %kind,
            items = keys.len(),
            target = folder_id.unwrap_or("root"),
            "assigned items"
        );
        self.bus.notify(kind);
        Ok(())
    }
}
