//! Virtual folder organization for resource trees
//!
//! Lets a user impose hierarchical folders on the flat, re-scanned
//! resource sets (skills, agents, connectors, plugins) without touching
//! the files themselves. Each resource kind has its own independent
//! folder namespace. State is one persisted document; the underlying
//! items are only ever referenced by their stable keys, so files that
//! disappear leave harmless dead assignments behind.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pegboard_core::folders::{FileBackend, FolderManager, FolderStore};
//! use pegboard_core::resources::ResourceKind;
//! use pegboard_core::paths;
//!
//! let store = FolderStore::new(FileBackend::new(paths::config_dir()));
//! let manager = FolderManager::load(store).await;
//!
//! let folder = manager.create_folder(ResourceKind::Skill, "Testing", None).await?;
//! manager.assign_item(ResourceKind::Skill, "a/SKILL.md", Some(&folder.id)).await?;
//! ```

mod events;
mod manager;
mod state;
mod store;
pub mod tree;

pub use events::{ChangeBus, FolderEvent};
pub use manager::FolderManager;
pub use state::{Folder, FolderState, STATE_VERSION};
pub use store::{FileBackend, FolderStore, MemoryBackend, StateBackend, StoreError, STATE_KEY};
