//! Pegboard - browse and organize local dev-tool resources
//!
//! A command surface over the pegboard engine:
//! - `tree` renders the foldered view of one resource kind
//! - `folder` creates, renames, deletes and lists virtual folders
//! - `move` reassigns items between folders (or back to the root)
//! - `invoke` prints the string that activates a resource, optionally
//!   copying it to the clipboard

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pegboard_core::folders::tree::{
    apply_drop, DragEntry, DropTarget, FolderNode, ResourceTree, TreeEntry,
};
use pegboard_core::folders::{FileBackend, FolderStore};
use pegboard_core::resources::default_source;
use pegboard_core::{invoke, paths, FolderManager, ResourceKind, ResourceSource};

/// Pegboard - resource browser and organizer
#[derive(Parser)]
#[command(name = "pegboard")]
#[command(about = "Browse and organize skills, agents, connectors and plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the folder tree for one resource kind
    Tree {
        kind: ResourceKind,
        /// Case-insensitive substring filter on names and descriptions
        #[arg(short, long)]
        filter: Option<String>,
        /// Render the children of this folder instead of the root
        #[arg(long)]
        folder: Option<String>,
        /// Expand every folder recursively
        #[arg(long)]
        all: bool,
    },
    /// Manage virtual folders
    #[command(subcommand)]
    Folder(FolderCommands),
    /// Move items into a folder, or back to the root when --folder is omitted
    Move {
        kind: ResourceKind,
        /// Item keys as shown by `tree`
        #[arg(required = true)]
        keys: Vec<String>,
        /// Target folder id
        #[arg(long)]
        folder: Option<String>,
    },
    /// Print the invocation string for a resource
    Invoke {
        kind: ResourceKind,
        /// Item key as shown by `tree`
        key: String,
        /// Also copy the string to the clipboard
        #[arg(long)]
        copy: bool,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Create a folder, optionally nested under a parent
    Create {
        kind: ResourceKind,
        name: String,
        /// Parent folder id
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename a folder in place
    Rename {
        kind: ResourceKind,
        id: String,
        new_name: String,
    },
    /// Delete a folder and its subfolders; their items return to the root
    Delete { kind: ResourceKind, id: String },
    /// List every folder of a kind with its id
    List { kind: ResourceKind },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let manager = open_manager().await;

    match cli.command {
        Commands::Tree {
            kind,
            filter,
            folder,
            all,
        } => {
            let working_dir = std::env::current_dir().context("failed to resolve working directory")?;
            let tree = ResourceTree::new(Arc::new(manager), default_source(kind, &working_dir));
            print_tree(&tree, folder.as_deref(), filter.as_deref(), all).await?;
        }
        Commands::Folder(cmd) => run_folder_command(&manager, cmd).await?,
        Commands::Move { kind, keys, folder } => {
            let entries: Vec<DragEntry> = keys
                .into_iter()
                .map(|key| DragEntry { kind, key })
                .collect();
            let target = match folder {
                Some(id) => DropTarget::Folder(id),
                None => DropTarget::Root,
            };
            apply_drop(&manager, &entries, target).await?;
        }
        Commands::Invoke { kind, key, copy } => {
            let working_dir = std::env::current_dir().context("failed to resolve working directory")?;
            let source = default_source(kind, &working_dir);
            let items = source.list().await?;
            let Some(item) = items.into_iter().find(|item| item.key == key) else {
                bail!("no {kind} found with key '{key}'");
            };

            let command = invoke::invocation_string(kind, &item.name);
            println!("{command}");
            if copy {
                let mut clipboard =
                    arboard::Clipboard::new().context("failed to access clipboard")?;
                clipboard
                    .set_text(command)
                    .context("failed to copy to clipboard")?;
            }
        }
    }

    Ok(())
}

async fn open_manager() -> FolderManager {
    let store = FolderStore::new(FileBackend::new(paths::config_dir()));
    FolderManager::load(store).await
}

async fn run_folder_command(manager: &FolderManager, cmd: FolderCommands) -> Result<()> {
    match cmd {
        FolderCommands::Create { kind, name, parent } => {
            let folder = manager
                .create_folder(kind, &name, parent.as_deref())
                .await?;
            println!("{}  {}", folder.id, folder.name);
        }
        FolderCommands::Rename { kind, id, new_name } => {
            manager.rename_folder(kind, &id, &new_name).await?;
        }
        FolderCommands::Delete { kind, id } => {
            manager.delete_folder(kind, &id).await?;
        }
        FolderCommands::List { kind } => {
            for folder in manager.folders(kind).await {
                match &folder.parent_id {
                    Some(parent) => println!("{}  {}  parent={}", folder.id, folder.name, parent),
                    None => println!("{}  {}", folder.id, folder.name),
                }
            }
        }
    }
    Ok(())
}

/// One displayed folder line. The id is what `tree --folder`, `move` and the
/// `folder` subcommands take, and it keeps duplicate sibling names apart.
fn folder_row(node: &FolderNode) -> String {
    format!(
        "{}/  [{}]  ({} items, {} subfolders)",
        node.folder.name, node.folder.id, node.item_count, node.subfolder_count
    )
}

/// Depth-first render. Each folder prints before its children; items of a
/// level print after all of its folders, matching the sidebar order. A parent
/// cycle in hand-edited state is expanded once, not forever.
async fn print_tree(
    tree: &ResourceTree,
    start: Option<&str>,
    filter: Option<&str>,
    all: bool,
) -> Result<()> {
    let mut pending: Vec<(TreeEntry, usize)> = Vec::new();
    for entry in tree.level(start, filter).await?.into_iter().rev() {
        pending.push((entry, 0));
    }

    let mut expanded: HashSet<String> = HashSet::new();
    while let Some((entry, depth)) = pending.pop() {
        let indent = "  ".repeat(depth);
        match entry {
            TreeEntry::Folder(node) => {
                println!("{indent}{}", folder_row(&node));
                if all && expanded.insert(node.folder.id.clone()) {
                    let children = tree.level(Some(&node.folder.id), filter).await?;
                    for child in children.into_iter().rev() {
                        pending.push((child, depth + 1));
                    }
                }
            }
            TreeEntry::Item(item) => {
                if item.description.is_empty() {
                    println!("{indent}{}  [{}]", item.name, item.key);
                } else {
                    println!("{indent}{}  [{}]  {}", item.name, item.key, item.description);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pegboard_core::folders::{MemoryBackend, StateBackend, STATE_KEY};
    use pegboard_core::{Folder, ResourceItem};

    struct EmptySource;

    #[async_trait::async_trait]
    impl ResourceSource for EmptySource {
        fn kind(&self) -> ResourceKind {
            ResourceKind::Skill
        }

        async fn list(&self) -> Result<Vec<ResourceItem>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn folder_rows_carry_the_id_so_duplicate_names_stay_distinct() {
        let node = |id: &str| FolderNode {
            folder: Folder {
                id: id.to_string(),
                name: "Dup".to_string(),
                parent_id: None,
            },
            item_count: 2,
            subfolder_count: 0,
        };

        let first = folder_row(&node("f-1"));
        assert!(first.contains("[f-1]"));
        assert!(first.contains("(2 items, 0 subfolders)"));
        assert_ne!(first, folder_row(&node("f-2")));
    }

    #[tokio::test]
    async fn all_expansion_terminates_on_a_parent_cycle() {
        let blob = r#"{
            "version": 2,
            "folders": { "skill": [
                { "id": "a", "name": "A", "parentId": "b" },
                { "id": "b", "name": "B", "parentId": "a" }
            ] },
            "assignments": {}
        }"#;
        let backend = MemoryBackend::default();
        backend.set(STATE_KEY, blob.as_bytes()).await.unwrap();

        let manager = Arc::new(FolderManager::load(FolderStore::new(backend)).await);
        let tree = ResourceTree::new(manager, Box::new(EmptySource));

        tokio::time::timeout(
            Duration::from_secs(2),
            print_tree(&tree, Some("a"), None, true),
        )
        .await
        .expect("tree expansion timed out")
        .unwrap();
    }
}
