use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use pv_core::NodeKind;

pub fn run(path: &Path) -> Result<(), String> {
    let graph = super::load(path)?;

    if graph.is_empty() {
        println!("  No nodes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Label", "Kind", "Id", "Content", "Next"]);

    for (pos, node) in graph.nodes().enumerate() {
        let next = match &node.kind {
            NodeKind::Sentence(s) => match s.child {
                Some(child) => graph.label_of(child),
                None => "(end)".to_string(),
            },
            NodeKind::Answer(a) => {
                format!("{}/{} bound", a.bound_children().count(), a.slot_count())
            }
        };

        table.add_row(vec![
            (pos + 1).to_string(),
            node.label.clone(),
            node.kind.to_string(),
            node.id.to_string(),
            super::truncate(&super::summary(node), 60),
            next,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} nodes, {} edges", graph.node_count(), graph.edge_count());

    Ok(())
}
