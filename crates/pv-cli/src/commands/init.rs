use std::path::Path;

use pv_core::{AnswerNode, AnswerSlot, DialogueGraph, GraphMeta, Node, Rect, Sentence};

pub fn run(path: &Path, name: Option<&str>, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let name = name.map(str::to_string).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    let graph = sample_graph(&name)?;
    super::save(&graph, path)?;

    println!("Created dialogue '{}' in {}", name, path.display());
    println!("  {} nodes, {} edges", graph.node_count(), graph.edge_count());
    println!();
    println!("Get started:");
    println!("  pv list {}          # List all nodes", path.display());
    println!("  pv graph {}         # Show the dialogue tree", path.display());
    println!("  pv play {}          # Play it in the terminal", path.display());

    Ok(())
}

/// A small tavern scene exercising both node kinds, hooks, and a dead-end slot.
fn sample_graph(name: &str) -> Result<DialogueGraph, String> {
    let mut meta = GraphMeta::new(name);
    meta.description = "A traveller walks into a tavern.".into();
    let mut graph = DialogueGraph::new(meta);
    let mut editor = graph.connector();

    let greet = editor.add_node(
        Node::sentence(
            "Greet",
            Sentence::new("Innkeeper", "Welcome to the Rusty Flagon, traveller.")
                .with_portrait("innkeeper_smile"),
        )
        .on_activated("play_tavern_music")
        .at(Rect::new(0.0, 0.0, 200.0, 80.0)),
    );

    let mut choices = AnswerNode::with_answers(["A room for the night", "Just an ale"]);
    choices.speaker = Some("Traveller".into());
    choices.slots[0] = Some(AnswerSlot::new("A room for the night").with_hook("check_purse"));
    choices.slots.push(Some(AnswerSlot::new("Nothing, thanks")));
    let ask = editor.add_node(Node::answer("Ask", choices).at(Rect::new(0.0, 120.0, 200.0, 120.0)));

    let room = editor.create_sentence_node(
        "Room",
        Sentence::new("Innkeeper", "Upstairs, second door on the left."),
    );
    let ale = editor.create_sentence_node("Ale", Sentence::new("Innkeeper", "Coming right up."));
    let nothing = editor.create_sentence_node("Nothing", Sentence::new("Innkeeper", "Suit yourself."));
    let farewell = editor.add_node(
        Node::sentence("Farewell", Sentence::new("Innkeeper", "Enjoy your stay."))
            .on_deactivated("stop_music"),
    );

    let edges = [
        (greet, ask),
        (ask, room),
        (ask, ale),
        (ask, nothing),
        (room, farewell),
        (ale, farewell),
    ];
    for (source, target) in edges {
        editor
            .connect(source, target)
            .map_err(|e| format!("cannot build sample graph: {e}"))?;
    }

    Ok(graph)
}
