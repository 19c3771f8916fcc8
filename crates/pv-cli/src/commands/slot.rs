use std::path::Path;

use pv_core::AnswerSlot;

pub fn add(path: &Path, node: &str, text: Option<&str>) -> Result<(), String> {
    let mut graph = super::load(path)?;
    let id = super::resolve(&graph, node)?;
    let label = graph.label_of(id);

    let index = graph
        .connector()
        .add_answer_slot(id, text.map(AnswerSlot::new))
        .map_err(|e| e.to_string())?;
    println!("  Added slot {} to '{label}'", index + 1);

    super::save(&graph, path)
}

pub fn remove(path: &Path, node: &str) -> Result<(), String> {
    let mut graph = super::load(path)?;
    let id = super::resolve(&graph, node)?;
    let label = graph.label_of(id);
    let bound_before = graph.edge_count();

    graph
        .connector()
        .remove_answer_slot(id)
        .map_err(|e| e.to_string())?;
    let slots = graph
        .get(id)
        .and_then(|n| n.as_answer())
        .map_or(0, |a| a.slot_count());
    println!("  Removed slot {} from '{label}'", slots + 1);
    if graph.edge_count() < bound_before {
        println!("  The edge bound to that slot was removed");
    }

    super::save(&graph, path)
}

pub fn set(path: &Path, node: &str, index: usize, text: &str) -> Result<(), String> {
    if index == 0 {
        return Err("slot numbers start at 1".into());
    }

    let mut graph = super::load(path)?;
    let id = super::resolve(&graph, node)?;
    let label = graph.label_of(id);

    // Keep the slot's hooks when only the text changes.
    let hooks = graph
        .get(id)
        .and_then(|n| n.as_answer())
        .and_then(|a| a.slots.get(index - 1).cloned().flatten())
        .map(|s| s.hooks)
        .unwrap_or_default();
    let slot = AnswerSlot {
        text: text.to_string(),
        hooks,
    };

    graph
        .connector()
        .set_slot(id, index - 1, Some(slot))
        .map_err(|e| e.to_string())?;
    println!("  Set slot {index} of '{label}'");

    super::save(&graph, path)
}
