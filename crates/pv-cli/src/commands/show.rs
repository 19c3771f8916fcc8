use std::path::Path;

use colored::Colorize;
use pv_core::{DialogueGraph, NodeId, NodeKind};

pub fn run(path: &Path, query: &str) -> Result<(), String> {
    let graph = super::load(path)?;
    let id = super::resolve(&graph, query)?;
    let node = graph
        .get(id)
        .ok_or_else(|| format!("node not found: \"{query}\""))?;

    // Header
    let first = graph.position(id) == Some(0);
    println!(
        "  {} [{}] {}{}",
        node.label.bold(),
        node.kind.to_string().dimmed(),
        node.id.to_string().dimmed(),
        if first { " (first node)" } else { "" }
    );
    println!();

    match &node.kind {
        NodeKind::Sentence(s) => {
            println!("  speaker:  {}", s.sentence.speaker);
            println!("  text:     {}", s.sentence.text);
            if let Some(portrait) = &s.sentence.portrait {
                println!("  portrait: {portrait}");
            }
            println!("  parents:  {}", labels(&graph, &s.parents));
            match s.child {
                Some(child) => println!("  next:     {}", graph.label_of(child)),
                None => println!("  next:     {}", "(end of dialogue)".dimmed()),
            }
        }
        NodeKind::Answer(a) => {
            if let Some(speaker) = &a.speaker {
                println!("  speaker:  {speaker}");
            }
            if let Some(portrait) = &a.portrait {
                println!("  portrait: {portrait}");
            }
            println!("  parent:   {}", labels(&graph, &a.parent.into_iter().collect::<Vec<_>>()));
            println!("  {}", "Slots:".dimmed());

            let active = a.active_prefix();
            for (i, slot) in a.slots.iter().enumerate() {
                let text = slot.as_ref().map_or("(empty)".to_string(), |s| s.text.clone());
                let target = a
                    .child_at(i)
                    .map_or_else(|| "(unconnected)".to_string(), |c| graph.label_of(c));
                let marker = if i < active { "" } else { "  (not offered)" };
                println!("    {}. {text} -> {target}{}", i + 1, marker.yellow());
                if let Some(hooks) = slot.as_ref().map(|s| &s.hooks).filter(|h| !h.is_empty()) {
                    println!("       hooks: {}", hooks.join(", "));
                }
            }
        }
    }

    if !node.on_activated.is_empty() {
        println!("  on enter: {}", node.on_activated.join(", "));
    }
    if !node.on_deactivated.is_empty() {
        println!("  on leave: {}", node.on_deactivated.join(", "));
    }

    Ok(())
}

fn labels(graph: &DialogueGraph, ids: &[NodeId]) -> String {
    if ids.is_empty() {
        return "(none)".to_string();
    }
    ids.iter()
        .map(|id| graph.label_of(*id))
        .collect::<Vec<_>>()
        .join(", ")
}
