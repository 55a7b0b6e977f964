//! Pegboard core: resource discovery and virtual folder organization
//!
//! Pegboard browses the local resources of a developer tool (skills,
//! agents, connector configs, plugins) and lets the user arrange them in
//! virtual folders. The resources stay flat on disk and are re-scanned on
//! every listing; folders and item assignments are pegboard's own state,
//! persisted separately per user.
//!
//! The crate splits into:
//!
//! - [`resources`]: per-kind enumerators producing items with stable keys
//! - [`folders`]: the folder state, its store, the manager that mutates it,
//!   and the tree composition that merges folders with enumerated items
//! - [`invoke`]: the chat-input strings that activate a resource
//! - [`paths`]: well-known locations under `~/.pegboard` and the project

pub mod folders;
pub mod invoke;
pub mod paths;
pub mod resources;

pub use folders::{Folder, FolderManager, FolderStore};
pub use resources::{ResourceItem, ResourceKind, ResourceSource};
