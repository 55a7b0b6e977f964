//! Skill discovery
//!
//! A skill is a directory containing a `SKILL.md` file with YAML frontmatter
//! (`name`, `description`). Skills live in the global skills dir and in the
//! project skills dir; both are scanned on every listing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use super::{frontmatter, ResourceItem, ResourceKind, ResourceSource};
use crate::paths;

#[derive(Debug, Deserialize)]
struct SkillFrontmatter {
    name: Option<String>,
    #[serde(default)]
    description: String,
}

/// Enumerates skills from a set of directories.
pub struct SkillSource {
    dirs: Vec<PathBuf>,
}

impl SkillSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Global skills plus the project's skills.
    pub fn with_defaults(working_dir: &Path) -> Self {
        Self::new(vec![
            paths::skills_dir(),
            paths::project_skills_dir(working_dir),
        ])
    }
}

#[async_trait]
impl ResourceSource for SkillSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Skill
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
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        let skill_file = path.join("SKILL.md");
        let content = match fs::read_to_string(&skill_file).await {
            Ok(content) => content,
            Err(_) => continue,
        };

        let meta = match frontmatter::parse::<SkillFrontmatter>(&content) {
            Ok((meta, _)) => meta,
            Err(e) => {
                debug!("Skipping skill at {:?}: {}", path, e);
                continue;
            }
        };

        let name = meta.name.unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        items.push(ResourceItem {
            key: skill_file.to_string_lossy().into_owned(),
            name,
            description: meta.description,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn write_skill(root: &Path, dir_name: &str, frontmatter: &str) {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("SKILL.md"), frontmatter).await.unwrap();
    }

    #[tokio::test]
    async fn lists_skills_sorted_by_name() {
        let temp = tempdir().unwrap();
        write_skill(
            temp.path(),
            "zeta",
            "---\nname: zeta\ndescription: Last\n---\n",
        )
        .await;
        write_skill(
            temp.path(),
            "alpha",
            "---\nname: Alpha\ndescription: First\n---\n",
        )
        .await;

        let source = SkillSource::new(vec![temp.path().to_path_buf()]);
        let items = source.list().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Alpha");
        assert_eq!(items[1].name, "zeta");
        assert_eq!(items[0].description, "First");
        assert!(items[0].key.ends_with("SKILL.md"));
    }

    #[tokio::test]
    async fn skips_directories_without_skill_file_and_bad_frontmatter() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("not-a-skill"))
            .await
            .unwrap();
        write_skill(temp.path(), "broken", "no frontmatter here\n").await;
        write_skill(temp.path(), "good", "---\nname: good\n---\n").await;

        let source = SkillSource::new(vec![temp.path().to_path_buf()]);
        let items = source.list().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "good");
    }

    #[tokio::test]
    async fn falls_back_to_directory_name() {
        let temp = tempdir().unwrap();
        write_skill(temp.path(), "dir-named", "---\ndescription: No name\n---\n").await;

        let source = SkillSource::new(vec![temp.path().to_path_buf()]);
        let items = source.list().await.unwrap();

        assert_eq!(items[0].name, "dir-named");
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_list() {
        let source = SkillSource::new(vec![PathBuf::from("/nonexistent/skills")]);
        assert!(source.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn merges_multiple_directories() {
        let global = tempdir().unwrap();
        let project = tempdir().unwrap();
        write_skill(global.path(), "g", "---\nname: global-skill\n---\n").await;
        write_skill(project.path(), "p", "---\nname: project-skill\n---\n").await;

        let source = SkillSource::new(vec![
            global.path().to_path_buf(),
            project.path().to_path_buf(),
        ]);
        let items = source.list().await.unwrap();

        assert_eq!(items.len(), 2);
    }
}
