use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path) -> Result<(), String> {
    let graph = super::load(path)?;

    if graph.is_empty() {
        println!("  {} '{}' has no nodes.", "warning:".yellow(), graph.meta.name);
        return Ok(());
    }

    println!("  All checks passed for '{}'.", graph.meta.name);
    println!(
        "  {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    for node in graph.unreachable() {
        println!(
            "  {} node '{}' is unreachable from the first node",
            "warning:".yellow(),
            node.label
        );
    }

    Ok(())
}
