//! Resource discovery
//!
//! Pegboard browses four kinds of local resources, each read fresh from disk
//! on every listing:
//!
//! - Skills: directories containing a `SKILL.md` with YAML frontmatter
//! - Agents: markdown definition files with the same frontmatter shape
//! - Connectors: entries of an `mcpServers` map in `.mcp.json`-style configs
//! - Plugins: installed plugin directories carrying a `plugin.toml` manifest
//!
//! Every resource is addressed by a stable key that survives re-enumeration
//! (file path for skills and agents, config-path plus declared name for
//! connectors, declared name for plugins). The folder engine stores only
//! these keys and never looks at resource content.

mod agents;
mod connectors;
mod frontmatter;
mod plugins;
mod skills;

pub use agents::AgentSource;
pub use connectors::ConnectorSource;
pub use plugins::PluginSource;
pub use skills::SkillSource;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The four independent resource namespaces.
///
/// Folders and assignments never cross kinds; every folder operation is
/// scoped by one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Skill,
    Agent,
    Connector,
    Plugin,
}

impl ResourceKind {
    /// All kinds, in display order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Skill,
        ResourceKind::Agent,
        ResourceKind::Connector,
        ResourceKind::Plugin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Skill => "skill",
            ResourceKind::Agent => "agent",
            ResourceKind::Connector => "connector",
            ResourceKind::Plugin => "plugin",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skill" | "skills" => Ok(ResourceKind::Skill),
            "agent" | "agents" => Ok(ResourceKind::Agent),
            "connector" | "connectors" => Ok(ResourceKind::Connector),
            "plugin" | "plugins" => Ok(ResourceKind::Plugin),
            other => Err(format!(
                "unknown resource kind '{}' (expected skill, agent, connector or plugin)",
                other
            )),
        }
    }
}

/// A single discovered resource.
///
/// The key is the stable external identifier; name and description are for
/// display and filtering only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A fresh-reading enumerator for one resource kind.
///
/// Implementations scan the filesystem on every call and never fail the
/// whole listing because of one unreadable entry. A missing location yields
/// an empty list.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    fn kind(&self) -> ResourceKind;

    async fn list(&self) -> Result<Vec<ResourceItem>>;
}

/// Build the default enumerator for a kind, scoped to a working directory.
pub fn default_source(kind: ResourceKind, working_dir: &Path) -> Box<dyn ResourceSource> {
    match kind {
        ResourceKind::Skill => Box::new(SkillSource::with_defaults(working_dir)),
        ResourceKind::Agent => Box::new(AgentSource::with_defaults(working_dir)),
        ResourceKind::Connector => Box::new(ConnectorSource::with_defaults(working_dir)),
        ResourceKind::Plugin => Box::new(PluginSource::with_defaults()),
    }
}
