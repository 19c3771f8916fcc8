//! Text renderings of a dialogue graph.

use std::fmt::Write;

use crate::graph::DialogueGraph;
use crate::node::{NodeId, NodeKind};

/// Render the graph as a Graphviz digraph.
///
/// Nodes are named by insertion position (`n0`, `n1`, ...) so the output is
/// stable across saves.
pub fn to_dot(graph: &DialogueGraph) -> String {
    let name_of = |id: NodeId| match graph.position(id) {
        Some(pos) => format!("n{pos}"),
        None => format!("missing_{id}"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{}\" {{", escape(&graph.meta.name));
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [fontname=\"Helvetica\"];\n");

    for node in graph.nodes() {
        let name = name_of(node.id);
        match &node.kind {
            NodeKind::Sentence(s) => {
                let _ = writeln!(
                    out,
                    "  {name} [shape=box, label=\"{}\\n{}: {}\"];",
                    escape(&node.label),
                    escape(&s.sentence.speaker),
                    escape(&s.sentence.text)
                );
            }
            NodeKind::Answer(_) => {
                let _ = writeln!(
                    out,
                    "  {name} [shape=diamond, label=\"{}\"];",
                    escape(&node.label)
                );
            }
        }
    }

    for edge in graph.edges() {
        let (source, target) = (name_of(edge.source), name_of(edge.target));
        let answer_text = edge.slot.and_then(|slot| {
            graph
                .get(edge.source)
                .and_then(|n| n.as_answer())
                .and_then(|a| a.slots.get(slot).cloned().flatten())
                .map(|s| (slot, s.text))
        });
        match (edge.slot, answer_text) {
            (_, Some((slot, text))) => {
                let _ = writeln!(
                    out,
                    "  {source} -> {target} [label=\"{}: {}\"];",
                    slot + 1,
                    escape(&text)
                );
            }
            (Some(slot), None) => {
                let _ = writeln!(out, "  {source} -> {target} [label=\"{}\"];", slot + 1);
            }
            (None, None) => {
                let _ = writeln!(out, "  {source} -> {target};");
            }
        }
    }

    out.push_str("}\n");
    out
}

/// Render the graph as a readable script, one section per node.
pub fn to_markdown(graph: &DialogueGraph) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", graph.meta.name);
    if !graph.meta.description.is_empty() {
        let _ = writeln!(out, "{}\n", graph.meta.description.trim());
    }
    if !graph.meta.authors.is_empty() {
        let _ = writeln!(out, "**Authors:** {}\n", graph.meta.authors.join(", "));
    }
    out.push_str("---\n");

    for node in graph.nodes() {
        let _ = writeln!(out, "\n## {}\n", node.label);
        match &node.kind {
            NodeKind::Sentence(s) => {
                let _ = writeln!(out, "**{}:** {}\n", s.sentence.speaker, s.sentence.text);
                match s.child {
                    Some(child) => {
                        let _ = writeln!(out, "Next: {}", graph.label_of(child));
                    }
                    None => out.push_str("*End of dialogue.*\n"),
                }
            }
            NodeKind::Answer(a) => {
                if let Some(speaker) = &a.speaker {
                    let _ = writeln!(out, "**{speaker}** chooses:\n");
                }
                for (i, slot) in a.slots.iter().enumerate() {
                    let text = slot.as_ref().map_or("(empty)", |s| s.text.as_str());
                    let target = a
                        .child_at(i)
                        .map_or_else(|| "unconnected".to_string(), |c| graph.label_of(c));
                    let _ = writeln!(out, "{}. {text} -> {target}", i + 1);
                }
            }
        }
    }

    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphMeta;
    use crate::node::{AnswerNode, Sentence};

    fn sample() -> DialogueGraph {
        let mut meta = GraphMeta::new("Tavern");
        meta.description = "Meeting the innkeeper.".into();
        let mut graph = DialogueGraph::new(meta);
        let mut editor = graph.connector();
        let greet = editor.create_sentence_node("Greet", Sentence::new("Innkeeper", "Welcome, \"traveller\"!"));
        let ask = editor.create_answer_node("Ask", AnswerNode::with_answers(["A room", "Just ale", "Nothing"]));
        let room = editor.create_sentence_node("Room", Sentence::new("Innkeeper", "Upstairs."));
        let ale = editor.create_sentence_node("Ale", Sentence::new("Innkeeper", "Coming up."));
        editor.connect(greet, ask).unwrap();
        editor.connect(ask, room).unwrap();
        editor.connect(ask, ale).unwrap();
        graph
    }

    #[test]
    fn dot_export() {
        insta::assert_snapshot!(to_dot(&sample()), @r#"
        digraph "Tavern" {
          rankdir=TB;
          node [fontname="Helvetica"];
          n0 [shape=box, label="Greet\nInnkeeper: Welcome, \"traveller\"!"];
          n1 [shape=diamond, label="Ask"];
          n2 [shape=box, label="Room\nInnkeeper: Upstairs."];
          n3 [shape=box, label="Ale\nInnkeeper: Coming up."];
          n0 -> n1;
          n1 -> n2 [label="1: A room"];
          n1 -> n3 [label="2: Just ale"];
        }
        "#);
    }

    #[test]
    fn markdown_export() {
        insta::assert_snapshot!(to_markdown(&sample()), @r#"
        # Tavern

        Meeting the innkeeper.

        ---

        ## Greet

        **Innkeeper:** Welcome, "traveller"!

        Next: Ask

        ## Ask

        1. A room -> Room
        2. Just ale -> Ale
        3. Nothing -> unconnected

        ## Room

        **Innkeeper:** Upstairs.

        *End of dialogue.*

        ## Ale

        **Innkeeper:** Coming up.

        *End of dialogue.*
        "#);
    }

    #[test]
    fn empty_graph_exports() {
        let graph = DialogueGraph::new(GraphMeta::new("Empty"));
        assert_eq!(to_dot(&graph), "digraph \"Empty\" {\n  rankdir=TB;\n  node [fontname=\"Helvetica\"];\n}\n");
        assert!(to_markdown(&graph).starts_with("# Empty\n"));
    }
}
