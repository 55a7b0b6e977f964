//! Plugin discovery
//!
//! Installed plugins are directories under the plugins root, each carrying a
//! `plugin.toml` manifest. The declared name is the plugin's stable key.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use super::{ResourceItem, ResourceKind, ResourceSource};
use crate::paths;

#[derive(Debug, Deserialize)]
struct PluginManifest {
    name: Option<String>,
    id: Option<String>,
    #[serde(default)]
    description: String,
}

impl PluginManifest {
    fn declared_name(&self) -> Option<String> {
        self.name.clone().or_else(|| self.id.clone())
    }
}

/// Enumerates installed plugins from the plugins root.
pub struct PluginSource {
    root: PathBuf,
}

impl PluginSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn with_defaults() -> Self {
        Self::new(paths::plugins_dir())
    }
}

#[async_trait]
impl ResourceSource for PluginSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Plugin
    }

    async fn list(&self) -> Result<Vec<ResourceItem>> {
        let mut items = Vec::new();

        let Ok(mut entries) = fs::read_dir(&self.root).await else {
            return Ok(items);
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let manifest_path = entry.path().join("plugin.toml");
            let content = match fs::read_to_string(&manifest_path).await {
                Ok(content) => content,
                Err(_) => continue,
            };

            let manifest: PluginManifest = match toml::from_str(&content) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("Skipping plugin with invalid manifest {:?}: {}", manifest_path, e);
                    continue;
                }
            };

            let Some(name) = manifest.declared_name() else {
                warn!("Skipping plugin without a name at {:?}", manifest_path);
                continue;
            };

            items.push(ResourceItem {
                key: name.clone(),
                name,
                description: manifest.description,
            });
        }

        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    async fn write_plugin(root: &Path, dir: &str, manifest: &str) {
        let plugin_dir = root.join(dir);
        fs::create_dir_all(&plugin_dir).await.unwrap();
        fs::write(plugin_dir.join("plugin.toml"), manifest)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn lists_plugins_keyed_by_declared_name() {
        let temp = tempdir().unwrap();
        write_plugin(
            temp.path(),
            "demo-dir",
            "name = \"demo\"\ndescription = \"A demo plugin\"\n",
        )
        .await;

        let source = PluginSource::new(temp.path().to_path_buf());
        let items = source.list().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "demo");
        assert_eq!(items[0].name, "demo");
        assert_eq!(items[0].description, "A demo plugin");
    }

    #[tokio::test]
    async fn id_serves_as_fallback_name() {
        let temp = tempdir().unwrap();
        write_plugin(temp.path(), "x", "id = \"com.example.tool\"\n").await;

        let source = PluginSource::new(temp.path().to_path_buf());
        let items = source.list().await.unwrap();

        assert_eq!(items[0].key, "com.example.tool");
    }

    #[tokio::test]
    async fn invalid_and_nameless_manifests_are_skipped() {
        let temp = tempdir().unwrap();
        write_plugin(temp.path(), "broken", "name = [unterminated\n").await;
        write_plugin(temp.path(), "anon", "description = \"who am i\"\n").await;
        write_plugin(temp.path(), "ok", "name = \"ok\"\n").await;

        let source = PluginSource::new(temp.path().to_path_buf());
        let items = source.list().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "ok");
    }

    #[tokio::test]
    async fn missing_root_yields_empty_list() {
        let source = PluginSource::new(PathBuf::from("/nonexistent/plugins"));
        assert!(source.list().await.unwrap().is_empty());
    }
}
