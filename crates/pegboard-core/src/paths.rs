//! Centralized path utilities
//!
//! All well-known Pegboard locations in one place. Resources live in two
//! scopes: global (under the home config dir) and project (under a working
//! directory).

use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".pegboard";

/// Get the pegboard config directory (~/.pegboard)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Get the global skills directory (~/.pegboard/skills)
pub fn skills_dir() -> PathBuf {
    config_dir().join("skills")
}

/// Get the project skills directory (<working_dir>/.pegboard/skills)
pub fn project_skills_dir(working_dir: &Path) -> PathBuf {
    working_dir.join(CONFIG_DIR_NAME).join("skills")
}

/// Get the global agents directory (~/.pegboard/agents)
pub fn agents_dir() -> PathBuf {
    config_dir().join("agents")
}

/// Get the project agents directory (<working_dir>/.pegboard/agents)
pub fn project_agents_dir(working_dir: &Path) -> PathBuf {
    working_dir.join(CONFIG_DIR_NAME).join("agents")
}

/// Get the global connector config file (~/.pegboard/mcp.json)
pub fn connectors_config() -> PathBuf {
    config_dir().join("mcp.json")
}

/// Get the project connector config file (<working_dir>/.mcp.json)
pub fn project_connectors_config(working_dir: &Path) -> PathBuf {
    working_dir.join(".mcp.json")
}

/// Get the installed plugins directory (~/.pegboard/plugins)
pub fn plugins_dir() -> PathBuf {
    config_dir().join("plugins")
}
