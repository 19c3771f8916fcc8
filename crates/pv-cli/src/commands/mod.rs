pub mod add;
pub mod check;
pub mod edit;
pub mod export;
pub mod graph;
pub mod init;
pub mod list;
pub mod play;
pub mod show;
pub mod slot;

use std::path::Path;

use pv_core::{DialogueGraph, Node, NodeId, NodeKind};

/// Load and validate a dialogue file.
fn load(path: &Path) -> Result<DialogueGraph, String> {
    tracing::debug!(path = %path.display(), "loading dialogue");
    DialogueGraph::load(path).map_err(|e| format!("cannot load {}: {e}", path.display()))
}

/// Write a dialogue file back to disk.
fn save(graph: &DialogueGraph, path: &Path) -> Result<(), String> {
    tracing::debug!(path = %path.display(), nodes = graph.node_count(), "saving dialogue");
    graph
        .save(path)
        .map_err(|e| format!("cannot write to {}: {e}", path.display()))
}

/// Resolve a node by label or id prefix.
fn resolve(graph: &DialogueGraph, query: &str) -> Result<NodeId, String> {
    graph
        .resolve(query)
        .map(|n| n.id)
        .ok_or_else(|| format!("node not found: \"{query}\""))
}

/// Shorten `text` to at most `max` characters.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// One-line description of a node's content.
fn summary(node: &Node) -> String {
    match &node.kind {
        NodeKind::Sentence(s) => format!("{}: {}", s.sentence.speaker, s.sentence.text),
        NodeKind::Answer(a) => a
            .slots
            .iter()
            .map(|slot| slot.as_ref().map_or("(empty)", |s| s.text.as_str()))
            .collect::<Vec<_>>()
            .join(" | "),
    }
}
