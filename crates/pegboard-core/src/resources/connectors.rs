//! Connector discovery
//!
//! Connectors are the entries of the `mcpServers` map in `.mcp.json`-style
//! config files. Two server shapes are recognized:
//! - Local (stdio): spawned as a process, described by its command line
//! - Remote (url): described by its endpoint
//!
//! A connector's stable key is the config file path plus the declared server
//! name, so the same name in two config files stays distinct.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, warn};

use super::{ResourceItem, ResourceKind, ResourceSource};
use crate::paths;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectorFile {
    #[serde(default)]
    mcp_servers: HashMap<String, ConnectorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectorEntry {
    Local {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Remote {
        url: String,
    },
}

impl ConnectorEntry {
    fn describe(&self) -> String {
        match self {
            ConnectorEntry::Local { command, args } => {
                if args.is_empty() {
                    format!("stdio: {}", command)
                } else {
                    format!("stdio: {} {}", command, args.join(" "))
                }
            }
            ConnectorEntry::Remote { url } => format!("url: {}", url),
        }
    }
}

/// Enumerates connectors from a set of config files.
pub struct ConnectorSource {
    config_paths: Vec<PathBuf>,
}

impl ConnectorSource {
    pub fn new(config_paths: Vec<PathBuf>) -> Self {
        Self { config_paths }
    }

    /// The project's `.mcp.json` plus the global config.
    pub fn with_defaults(working_dir: &Path) -> Self {
        Self::new(vec![
            paths::project_connectors_config(working_dir),
            paths::connectors_config(),
        ])
    }
}

/// Compose the stable key for a connector.
pub fn connector_key(config_path: &Path, name: &str) -> String {
    format!("{}::{}", config_path.to_string_lossy(), name)
}

#[async_trait]
impl ResourceSource for ConnectorSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Connector
    }

    async fn list(&self) -> Result<Vec<ResourceItem>> {
        let mut items = Vec::new();

        for path in &self.config_paths {
            let content = match fs::read_to_string(path).await {
                Ok(content) => content,
                Err(_) => {
                    debug!("No connector config at {:?}", path);
                    continue;
                }
            };

            let file: ConnectorFile = match serde_json::from_str(&content) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    continue;
                }
            };

            for (name, entry) in &file.mcp_servers {
                items.push(ResourceItem {
                    key: connector_key(path, name),
                    name: name.clone(),
                    description: entry.describe(),
                });
            }
        }

        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(items)
    }
}
