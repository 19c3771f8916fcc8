//! Edge and node edits that go straight through the connector.

use std::path::Path;

use pv_core::Edge;

pub fn connect(path: &Path, source: &str, target: &str) -> Result<(), String> {
    let mut graph = super::load(path)?;
    let source = super::resolve(&graph, source)?;
    let target = super::resolve(&graph, target)?;
    let (source_label, target_label) = (graph.label_of(source), graph.label_of(target));

    let edge = graph
        .connector()
        .connect(source, target)
        .map_err(|e| format!("cannot connect '{source_label}' to '{target_label}': {e}"))?;

    match edge.slot {
        Some(slot) => println!("  Connected {source_label} [{}] -> {target_label}", slot + 1),
        None => println!("  Connected {source_label} -> {target_label}"),
    }

    super::save(&graph, path)
}

pub fn disconnect(path: &Path, source: &str, target: &str) -> Result<(), String> {
    let mut graph = super::load(path)?;
    let source = super::resolve(&graph, source)?;
    let target = super::resolve(&graph, target)?;
    let (source_label, target_label) = (graph.label_of(source), graph.label_of(target));

    let edge = Edge {
        source,
        target,
        slot: None,
    };
    if !graph.connector().disconnect(edge) {
        return Err(format!("no edge from '{source_label}' to '{target_label}'"));
    }
    println!("  Disconnected {source_label} -> {target_label}");

    super::save(&graph, path)
}

pub fn delete(path: &Path, node: &str) -> Result<(), String> {
    let mut graph = super::load(path)?;
    let id = super::resolve(&graph, node)?;

    let was_first = graph.position(id) == Some(0);
    let removed = graph.connector().delete_node(id).map_err(|e| e.to_string())?;
    println!("  Deleted node '{}'", removed.label);
    if was_first && let Ok(first) = graph.first_node() {
        println!("  '{}' is now the first node", first.label);
    }

    super::save(&graph, path)
}
