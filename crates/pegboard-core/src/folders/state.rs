//! Persisted folder state
//!
//! One document holds, per resource kind, the folder definitions and the
//! item-key to folder-id assignments. Folders form a forest: a folder's
//! parent is fixed at creation and there is no move-folder operation, so no
//! mutation can introduce a cycle.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resources::ResourceKind;

/// Current schema version. Version 1 predates nested folders and carried no
/// `parentId` field; such folders load as root-level.
pub const STATE_VERSION: u32 = 2;

/// A virtual folder. Purely organizational; deleting one never touches the
/// underlying resource files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Item-key to folder-id map. Insertion order is preserved so folder
/// listings keep the order items were moved in.
pub type AssignmentMap = IndexMap<String, String>;

/// The root persisted aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderState {
    pub version: u32,
    #[serde(default)]
    pub folders: HashMap<ResourceKind, Vec<Folder>>,
    #[serde(default)]
    pub assignments: HashMap<ResourceKind, AssignmentMap>,
}

impl FolderState {
    /// Fresh state at the current version with every kind present.
    pub fn empty() -> Self {
        let mut state = FolderState {
            version: STATE_VERSION,
            folders: HashMap::new(),
            assignments: HashMap::new(),
        };
        state.ensure_kinds();
        state
    }

    /// Upgrade an older recognized version in place and stamp the current
    /// version. Missing kinds (or kinds added since the blob was written)
    /// are filled in with empty entries.
    pub fn migrate(&mut self) {
        self.version = STATE_VERSION;
        self.ensure_kinds();
    }

    fn ensure_kinds(&mut self) {
        for kind in ResourceKind::ALL {
            self.folders.entry(kind).or_default();
            self.assignments.entry(kind).or_default();
        }
    }

    pub fn kind_folders(&self, kind: ResourceKind) -> &[Folder] {
        self.folders.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find_folder(&self, kind: ResourceKind, folder_id: &str) -> Option<&Folder> {
        self.kind_folders(kind).iter().find(|f| f.id == folder_id)
    }

    /// Folders whose parent equals the given value (`None` = root level),
    /// in creation order.
    pub fn child_folders(&self, kind: ResourceKind, parent_id: Option<&str>) -> Vec<&Folder> {
        self.kind_folders(kind)
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect()
    }

    pub fn assignment_map(&self, kind: ResourceKind) -> Option<&AssignmentMap> {
        self.assignments.get(&kind)
    }

    /// Item keys directly assigned to a folder, in assignment order.
    pub fn items_in_folder(&self, kind: ResourceKind, folder_id: &str) -> Vec<String> {
        self.assignment_map(kind)
            .map(|map| {
                map.iter()
                    .filter(|(_, v)| v.as_str() == folder_id)
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct item count plus the counts of every descendant folder.
    pub fn count_items_recursive(&self, kind: ResourceKind, folder_id: &str) -> usize {
        self.subtree_ids(kind, folder_id)
            .iter()
            .map(|id| {
                self.assignment_map(kind)
                    .map(|map| map.values().filter(|v| v.as_str() == id).count())
                    .unwrap_or(0)
            })
            .sum()
    }

    /// The ids of a folder's whole subtree, descendants before ancestors
    /// (the folder itself comes last). Tolerates parent cycles in
    /// hand-edited state.
    pub fn subtree_ids(&self, kind: ResourceKind, folder_id: &str) -> Vec<String> {
        let mut ordered = Vec::new();
        let mut seen = HashSet::new();
        self.collect_subtree(kind, folder_id, &mut seen, &mut ordered);
        ordered
    }

    fn collect_subtree(
        &self,
        kind: ResourceKind,
        folder_id: &str,
        seen: &mut HashSet<String>,
        out: &mut Vec<String>,
    ) {
        if !seen.insert(folder_id.to_string()) {
            return;
        }
        for child in self.child_folders(kind, Some(folder_id)) {
            let child_id = child.id.clone();
            self.collect_subtree(kind, &child_id, seen, out);
        }
        out.push(folder_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, name: &str, parent: Option<&str>) -> Folder {
        Folder {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent.map(str::to_string),
        }
    }

    fn sample_state() -> FolderState {
        let mut state = FolderState::empty();
        let folders = state.folders.get_mut(&ResourceKind::Skill).unwrap();
        folders.push(folder("a", "Top", None));
        folders.push(folder("b", "Mid", Some("a")));
        folders.push(folder("c", "Leaf", Some("b")));
        folders.push(folder("d", "Other", None));

        let map = state.assignments.get_mut(&ResourceKind::Skill).unwrap();
        map.insert("one.md".to_string(), "a".to_string());
        map.insert("two.md".to_string(), "c".to_string());
        map.insert("three.md".to_string(), "d".to_string());
        state
    }

    #[test]
    fn empty_state_has_every_kind() {
        let state = FolderState::empty();
        assert_eq!(state.version, STATE_VERSION);
        for kind in ResourceKind::ALL {
            assert!(state.folders.contains_key(&kind));
            assert!(state.assignments.contains_key(&kind));
        }
    }

    #[test]
    fn child_folders_filters_by_parent() {
        let state = sample_state();
        let roots = state.child_folders(ResourceKind::Skill, None);
        assert_eq!(
            roots.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "d"]
        );
        let under_a = state.child_folders(ResourceKind::Skill, Some("a"));
        assert_eq!(under_a.len(), 1);
        assert_eq!(under_a[0].id, "b");
    }

    #[test]
    fn subtree_lists_descendants_before_the_folder() {
        let state = sample_state();
        assert_eq!(state.subtree_ids(ResourceKind::Skill, "a"), vec!["c", "b", "a"]);
        assert_eq!(state.subtree_ids(ResourceKind::Skill, "c"), vec!["c"]);
    }

    #[test]
    fn recursive_count_includes_nested_items() {
        let state = sample_state();
        assert_eq!(state.count_items_recursive(ResourceKind::Skill, "a"), 2);
        assert_eq!(state.count_items_recursive(ResourceKind::Skill, "b"), 1);
        assert_eq!(state.count_items_recursive(ResourceKind::Skill, "d"), 1);
    }

    #[test]
    fn subtree_walk_survives_a_parent_cycle() {
        let mut state = FolderState::empty();
        let folders = state.folders.get_mut(&ResourceKind::Agent).unwrap();
        folders.push(folder("x", "X", Some("y")));
        folders.push(folder("y", "Y", Some("x")));

        let ids = state.subtree_ids(ResourceKind::Agent, "x");
        assert_eq!(ids, vec!["y", "x"]);
    }

    #[test]
    fn folder_serializes_to_camel_case_and_omits_absent_parent() {
        let root = folder("f1", "Root", None);
        let nested = folder("f2", "Nested", Some("f1"));

        let root_json = serde_json::to_value(&root).unwrap();
        assert!(root_json.get("parentId").is_none());

        let nested_json = serde_json::to_value(&nested).unwrap();
        assert_eq!(nested_json["parentId"], "f1");
    }

    #[test]
    fn version_1_blob_loads_with_root_level_folders() {
        let blob = r#"{
            "version": 1,
            "folders": { "skill": [ { "id": "old", "name": "Legacy" } ] },
            "assignments": { "skill": { "a.md": "old" } }
        }"#;
        let mut state: FolderState = serde_json::from_str(blob).unwrap();
        state.migrate();

        assert_eq!(state.version, STATE_VERSION);
        let legacy = state.find_folder(ResourceKind::Skill, "old").unwrap();
        assert_eq!(legacy.parent_id, None);
        assert!(state.assignments.contains_key(&ResourceKind::Plugin));
    }
}
