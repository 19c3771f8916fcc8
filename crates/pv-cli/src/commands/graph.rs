use std::collections::HashSet;
use std::path::Path;

use colored::Colorize;
use pv_core::{DialogueGraph, NodeId, NodeKind};

pub fn run(path: &Path) -> Result<(), String> {
    let graph = super::load(path)?;

    println!("  Dialogue tree for '{}'", graph.meta.name);
    println!();

    let Ok(first) = graph.first_node() else {
        println!("  (empty)");
        return Ok(());
    };

    let mut seen = HashSet::new();
    render(&graph, first.id, 1, "", &mut seen);

    let unreachable = graph.unreachable();
    if !unreachable.is_empty() {
        let names: Vec<&str> = unreachable.iter().map(|n| n.label.as_str()).collect();
        println!();
        println!("  {} {}", "Unreachable:".yellow(), names.join(", "));
    }

    Ok(())
}

fn render(graph: &DialogueGraph, id: NodeId, depth: usize, lead: &str, seen: &mut HashSet<NodeId>) {
    let pad = "  ".repeat(depth);
    let Some(node) = graph.get(id) else {
        println!("{pad}{lead}(missing {id})");
        return;
    };

    if !seen.insert(id) {
        println!("{pad}{lead}{} {}", node.label, "(see above)".dimmed());
        return;
    }

    match &node.kind {
        NodeKind::Sentence(s) => {
            println!(
                "{pad}{lead}{}  {}",
                node.label.bold(),
                super::truncate(&format!("{}: {}", s.sentence.speaker, s.sentence.text), 50).dimmed()
            );
            if let Some(child) = s.child {
                render(graph, child, depth, "-> ", seen);
            }
        }
        NodeKind::Answer(a) => {
            println!("{pad}{lead}{} ?", node.label.bold());
            for (i, slot) in a.slots.iter().enumerate() {
                let text = slot.as_ref().map_or("(empty)", |s| s.text.as_str());
                println!("{pad}  {}. {text}", i + 1);
                match a.child_at(i) {
                    Some(child) => render(graph, child, depth + 2, "-> ", seen),
                    None => println!("{pad}    {}", "(unconnected)".dimmed()),
                }
            }
        }
    }
}
