//! Tree composition
//!
//! Builds the displayable forest for one resource kind: child folders
//! first (sorted by name, carrying recursive counts), then the items
//! assigned to the requested level (filtered, sorted by name). One
//! algorithm serves every kind; the enumerator supplies the flat item
//! list fresh on each query, so files that vanished since the last scan
//! simply stop appearing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{bail, Result};

use super::manager::FolderManager;
use super::state::Folder;
use crate::resources::{ResourceItem, ResourceKind, ResourceSource};

/// A folder row with the counts shown next to its name.
#[derive(Debug, Clone)]
pub struct FolderNode {
    pub folder: Folder,
    /// Items in this folder and every descendant.
    pub item_count: usize,
    /// Direct child folders only.
    pub subfolder_count: usize,
}

/// One row of a rendered level. Folders always precede items.
#[derive(Debug, Clone)]
pub enum TreeEntry {
    Folder(FolderNode),
    Item(ResourceItem),
}

/// An item being dragged, tagged with the kind of the tree it came from.
#[derive(Debug, Clone)]
pub struct DragEntry {
    pub kind: ResourceKind,
    pub key: String,
}

/// Where a drag landed. Anything that is not a folder node means root.
#[derive(Debug, Clone)]
pub enum DropTarget {
    Folder(String),
    Root,
}

/// Composes the tree for one resource kind.
pub struct ResourceTree {
    manager: Arc<FolderManager>,
    source: Box<dyn ResourceSource>,
}

impl ResourceTree {
    pub fn new(manager: Arc<FolderManager>, source: Box<dyn ResourceSource>) -> Self {
        Self { manager, source }
    }

    pub fn kind(&self) -> ResourceKind {
        self.source.kind()
    }

    /// Entries for one level of the tree: the child folders of `parent_id`
    /// (`None` = root), then the items assigned there. With a filter, an
    /// item must match on name or description, and a folder must match on
    /// name or contain at least one matching item somewhere in its
    /// subtree. Counts on folder nodes stay unfiltered. Expanding a folder
    /// is a recursive call with that folder as the parent.
    pub async fn level(
        &self,
        parent_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<TreeEntry>> {
        let kind = self.kind();
        let needle = filter.map(str::to_lowercase);
        let items = self.source.list().await?;

        let mut assigned = Vec::with_capacity(items.len());
        for item in items {
            let folder = self.manager.folder_for_item(kind, &item.key).await;
            assigned.push((item, folder));
        }

        let mut folders = self.manager.child_folders(kind, parent_id).await;
        folders.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        // Folder ids that directly hold a matching item; the subtree walk
        // below extends the hit through ancestors.
        let matched_folders: HashSet<String> = match &needle {
            Some(needle) => assigned
                .iter()
                .filter(|(item, folder)| folder.is_some() && item_matches(item, needle))
                .filter_map(|(_, folder)| folder.clone())
                .collect(),
            None => HashSet::new(),
        };
        let all_folders = self.manager.folders(kind).await;
        let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
        for folder in &all_folders {
            if let Some(parent) = folder.parent_id.as_deref() {
                children_of.entry(parent).or_default().push(folder.id.as_str());
            }
        }

        let mut entries = Vec::new();
        for folder in folders {
            if let Some(needle) = &needle {
                let name_hit = folder.name.to_lowercase().contains(needle);
                if !name_hit && !subtree_contains_match(&folder.id, &children_of, &matched_folders)
                {
                    continue;
                }
            }
            let item_count = self.manager.count_items_recursive(kind, &folder.id).await;
            let subfolder_count = self
                .manager
                .child_folders(kind, Some(&folder.id))
                .await
                .len();
            entries.push(TreeEntry::Folder(FolderNode {
                folder,
                item_count,
                subfolder_count,
            }));
        }

        let mut level_items: Vec<ResourceItem> = assigned
            .into_iter()
            .filter(|(_, folder)| folder.as_deref() == parent_id)
            .map(|(item, _)| item)
            .filter(|item| needle.as_deref().map_or(true, |n| item_matches(item, n)))
            .collect();
        level_items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        entries.extend(level_items.into_iter().map(TreeEntry::Item));

        Ok(entries)
    }
}

fn item_matches(item: &ResourceItem, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item.description.to_lowercase().contains(needle)
}

/// Whether any folder in the subtree rooted at `root` holds a matching
/// item. Short-circuits on the first hit; tolerates cycles in hand-edited
/// state.
fn subtree_contains_match(
    root: &str,
    children_of: &HashMap<&str, Vec<&str>>,
    matched: &HashSet<String>,
) -> bool {
    let mut stack = vec![root];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        if matched.contains(id) {
            return true;
        }
        if let Some(kids) = children_of.get(id) {
            stack.extend(kids.iter().copied());
        }
    }
    false
}

/// Translate a drop into one batch assignment. All dragged entries must
/// share a kind; a mixed drag is rejected before any state changes.
pub async fn apply_drop(
    manager: &FolderManager,
    entries: &[DragEntry],
    target: DropTarget,
) -> Result<()> {
    let Some(first) = entries.first() else {
        return Ok(());
    };
    if entries.iter().any(|e| e.kind != first.kind) {
        bail!("cannot move entries of mixed resource kinds");
    }

    let keys: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
    let folder_id = match &target {
        DropTarget::Folder(id) => Some(id.as_str()),
        DropTarget::Root => None,
    };
    manager.assign_items(first.kind, &keys, folder_id).await
}
