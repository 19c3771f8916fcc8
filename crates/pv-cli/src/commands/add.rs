use std::path::Path;

use pv_core::{AnswerNode, DialogueGraph, NodeId, Sentence};

pub fn sentence(
    path: &Path,
    label: &str,
    speaker: &str,
    text: &str,
    portrait: Option<&str>,
    after: Option<&str>,
) -> Result<(), String> {
    let mut graph = super::load(path)?;

    let mut line = Sentence::new(speaker, text);
    if let Some(portrait) = portrait {
        line = line.with_portrait(portrait);
    }
    let id = graph.connector().create_sentence_node(label, line);
    println!("  Added sentence node '{label}' ({id})");

    if let Some(after) = after {
        connect_after(&mut graph, after, id, label)?;
    }

    super::save(&graph, path)
}

pub fn answer(
    path: &Path,
    label: &str,
    answers: &[String],
    speaker: Option<&str>,
    after: Option<&str>,
) -> Result<(), String> {
    let mut graph = super::load(path)?;

    let mut node = AnswerNode::with_answers(answers.iter().cloned());
    node.speaker = speaker.map(str::to_string);
    let slots = node.slot_count();
    let id = graph.connector().create_answer_node(label, node);
    println!("  Added answer node '{label}' with {slots} slots ({id})");

    if let Some(after) = after {
        connect_after(&mut graph, after, id, label)?;
    }

    super::save(&graph, path)
}

fn connect_after(graph: &mut DialogueGraph, after: &str, id: NodeId, label: &str) -> Result<(), String> {
    let source = super::resolve(graph, after)?;
    let source_label = graph.label_of(source);
    graph
        .connector()
        .connect(source, id)
        .map_err(|e| format!("cannot connect '{source_label}' to '{label}': {e}"))?;
    println!("  Connected {source_label} -> {label}");
    Ok(())
}
