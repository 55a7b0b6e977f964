//! Agent discovery
//!
//! An agent is a single markdown file with YAML frontmatter (`name`,
//! `description`); the body is the agent's system prompt. Scanned from the
//! global and project agents directories.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use super::{frontmatter, ResourceItem, ResourceKind, ResourceSource};
use crate::paths;

#[derive(Debug, Deserialize)]
struct AgentFrontmatter {
    name: Option<String>,
    #[serde(default)]
    description: String,
}

/// Enumerates agent definition files from a set of directories.
pub struct AgentSource {
    dirs: Vec<PathBuf>,
}

impl AgentSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Global agents plus the project's agents.
    pub fn with_defaults(working_dir: &Path) -> Self {
        Self::new(vec![
            paths::agents_dir(),
            paths::project_agents_dir(working_dir),
        ])
    }
}

#[async_trait]
impl ResourceSource for AgentSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Agent
    }

    async fn list(&self) -> Result<Vec<ResourceItem>> {
        let mut items = Vec::new();
        for dir in &self.dirs {
            scan_dir(dir, &mut items).await;
        }
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(items)
    }
}

async fn scan_dir(dir: &Path, items: &mut Vec<ResourceItem>) {
    let Ok(mut entries) = fs::read_dir(dir).await else {
        return;
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension() != Some(OsStr::new("md")) {
            continue;
        }

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => continue,
        };

        let meta = match frontmatter::parse::<AgentFrontmatter>(&content) {
            Ok((meta, _)) => meta,
            Err(e) => {
                debug!("Skipping agent at {:?}: {}", path, e);
                continue;
            }
        };

        let name = meta.name.unwrap_or_else(|| {
            path.file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        items.push(ResourceItem {
            key: path.to_string_lossy().into_owned(),
            name,
            description: meta.description,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn lists_agents_from_markdown_files() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("reviewer.md"),
            "---\nname: reviewer\ndescription: Reviews diffs\n---\nYou review code.\n",
        )
        .await
        .unwrap();
        fs::write(temp.path().join("notes.txt"), "not an agent")
            .await
            .unwrap();

        let source = AgentSource::new(vec![temp.path().to_path_buf()]);
        let items = source.list().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "reviewer");
        assert_eq!(items[0].description, "Reviews diffs");
        assert!(items[0].key.ends_with("reviewer.md"));
    }

    #[tokio::test]
    async fn name_falls_back_to_file_stem() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("planner.md"),
            "---\ndescription: Plans work\n---\n",
        )
        .await
        .unwrap();

        let source = AgentSource::new(vec![temp.path().to_path_buf()]);
        let items = source.list().await.unwrap();

        assert_eq!(items[0].name, "planner");
    }

    #[tokio::test]
    async fn skips_files_without_frontmatter() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("plain.md"), "# Just a document\n")
            .await
            .unwrap();

        let source = AgentSource::new(vec![temp.path().to_path_buf()]);
        assert!(source.list().await.unwrap().is_empty());
    }
}
