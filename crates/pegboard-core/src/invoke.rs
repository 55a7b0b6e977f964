//! Invocation strings
//!
//! Each resource kind is invoked through a different chat-input form. The
//! browser copies these to the clipboard on activation; composing the
//! string lives here so every surface produces the same one.

use crate::resources::ResourceKind;

/// The string a user pastes into the prompt to invoke a resource by name.
pub fn invocation_string(kind: ResourceKind, name: &str) -> String {
    match kind {
        ResourceKind::Skill => format!("/{name}"),
        ResourceKind::Agent => format!("@{name}"),
        ResourceKind::Connector => format!("/mcp {name}"),
        ResourceKind::Plugin => format!("/plugin {name}"),
    }
}
