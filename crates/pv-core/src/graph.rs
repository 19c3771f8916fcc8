use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::connector::GraphConnector;
use crate::error::{GraphError, GraphResult};
use crate::node::{Node, NodeId, NodeKind, Sentence};

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Metadata about the dialogue itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    /// Dialogue name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Authors credited for the dialogue.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Version of the file layout.
    pub schema_version: u32,
    /// When the graph was first created.
    pub created_at: DateTime<Utc>,
    /// When the graph was last edited.
    pub updated_at: DateTime<Utc>,
}

impl GraphMeta {
    /// Create metadata with the given name and fresh timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: String::new(),
            authors: Vec::new(),
            schema_version: SCHEMA_VERSION,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A directed parent-to-child relationship between two nodes.
///
/// `slot` is set for edges leaving an answer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The node the edge leaves.
    pub source: NodeId,
    /// The node the edge enters.
    pub target: NodeId,
    /// Answer slot carrying the edge, if the source is an answer node.
    pub slot: Option<usize>,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "{} [{}] -> {}", self.source, slot, self.target),
            None => write!(f, "{} -> {}", self.source, self.target),
        }
    }
}

/// The dialogue graph. Owns every node; edges are ID lookups.
///
/// Nodes keep their insertion order, which decides the first node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphDocument", into = "GraphDocument")]
pub struct DialogueGraph {
    /// Graph metadata.
    pub meta: GraphMeta,
    nodes: IndexMap<NodeId, Node>,
}

impl DialogueGraph {
    /// Create an empty graph.
    pub fn new(meta: GraphMeta) -> Self {
        Self {
            meta,
            nodes: IndexMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The traversal root: the first node in insertion order.
    pub fn first_node(&self) -> GraphResult<&Node> {
        self.nodes
            .first()
            .map(|(_, node)| node)
            .ok_or(GraphError::Empty)
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Returns true if the node is part of the graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a node in insertion order.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    /// Find a node by label (case-insensitive). Returns the first match.
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        let lower = label.to_lowercase();
        self.nodes().find(|n| n.label.to_lowercase() == lower)
    }

    /// Resolve a node by label, or by a unique ID prefix.
    pub fn resolve(&self, query: &str) -> Option<&Node> {
        if let Some(node) = self.find_by_label(query) {
            return Some(node);
        }
        let mut matches = self.nodes().filter(|n| n.id.matches_prefix(query));
        match (matches.next(), matches.next()) {
            (Some(node), None) => Some(node),
            _ => None,
        }
    }

    /// Display label for a node ID, falling back to the short ID.
    pub fn label_of(&self, id: NodeId) -> String {
        self.get(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Every edge in the graph, in node order then slot order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for node in self.nodes() {
            match &node.kind {
                NodeKind::Sentence(s) => {
                    if let Some(child) = s.child {
                        edges.push(Edge {
                            source: node.id,
                            target: child,
                            slot: None,
                        });
                    }
                }
                NodeKind::Answer(a) => {
                    for (slot, child) in a.bound_children() {
                        edges.push(Edge {
                            source: node.id,
                            target: child,
                            slot: Some(slot),
                        });
                    }
                }
            }
        }
        edges
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// The largest slot count over all answer nodes (0 if there are none).
    pub fn max_answer_slots(&self) -> usize {
        self.nodes()
            .filter_map(Node::as_answer)
            .map(|a| a.slot_count())
            .max()
            .unwrap_or(0)
    }

    /// IDs reachable from the first node through child edges.
    pub fn reachable(&self) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        let Ok(root) = self.first_node() else {
            return seen;
        };

        let mut queue = VecDeque::from([root.id]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.get(id) {
                queue.extend(node.children());
            }
        }
        seen
    }

    /// Nodes that can never be visited, in insertion order.
    pub fn unreachable(&self) -> Vec<&Node> {
        let reachable = self.reachable();
        self.nodes()
            .filter(|n| !reachable.contains(&n.id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Start editing the graph's structure.
    pub fn connector(&mut self) -> GraphConnector<'_> {
        GraphConnector::new(self)
    }

    /// Mutable access to a sentence's text fields. Edges are not exposed.
    pub fn sentence_mut(&mut self, id: NodeId) -> Option<&mut Sentence> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Sentence(s) => Some(&mut s.sentence),
            NodeKind::Answer(_) => None,
        }
    }

    /// Rename a node.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> GraphResult<()> {
        let node = self.get_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        node.label = label.into();
        self.touch();
        Ok(())
    }

    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.shift_remove(&id)
    }

    pub(crate) fn ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub(crate) fn touch(&mut self) {
        self.meta.updated_at = Utc::now();
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Parse and validate a graph from JSON.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }

    /// Serialize the graph as pretty-printed JSON.
    pub fn to_json(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a graph file.
    pub fn load(path: &Path) -> GraphResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let graph = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            nodes = graph.node_count(),
            "loaded dialogue graph"
        );
        Ok(graph)
    }

    /// Write the graph to a file.
    pub fn save(&self, path: &Path) -> GraphResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// The serialized layout of a graph: metadata plus an ordered node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Graph metadata.
    pub meta: GraphMeta,
    /// Nodes in insertion order.
    pub nodes: Vec<Node>,
}

impl TryFrom<GraphDocument> for DialogueGraph {
    type Error = GraphError;

    fn try_from(document: GraphDocument) -> GraphResult<Self> {
        let mut graph = DialogueGraph::new(document.meta);
        for node in document.nodes {
            if graph.contains(node.id) {
                return Err(GraphError::Invalid(vec![format!(
                    "duplicate node id {}",
                    node.id
                )]));
            }
            graph.insert(node);
        }

        let violations = graph.validate();
        if violations.is_empty() {
            Ok(graph)
        } else {
            Err(GraphError::Invalid(
                violations.iter().map(ToString::to_string).collect(),
            ))
        }
    }
}

impl From<DialogueGraph> for GraphDocument {
    fn from(graph: DialogueGraph) -> Self {
        Self {
            meta: graph.meta,
            nodes: graph.nodes.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AnswerNode;

    fn test_graph() -> DialogueGraph {
        DialogueGraph::new(GraphMeta::new("Test Dialogue"))
    }

    #[test]
    fn empty_graph_has_no_first_node() {
        let graph = test_graph();
        assert!(matches!(graph.first_node(), Err(GraphError::Empty)));
        assert!(graph.reachable().is_empty());
        assert_eq!(graph.max_answer_slots(), 0);
    }

    #[test]
    fn first_node_follows_insertion_order() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("Opening", Sentence::new("Alice", "Hi"));
        editor.create_sentence_node("Reply", Sentence::new("Bob", "Bye"));
        assert_eq!(graph.first_node().unwrap().id, a);
    }

    #[test]
    fn resolve_by_label_or_prefix() {
        let mut graph = test_graph();
        let id = graph
            .connector()
            .create_sentence_node("Opening", Sentence::new("Alice", "Hi"));
        assert_eq!(graph.resolve("opening").unwrap().id, id);
        let prefix = &id.0.to_string()[..6];
        assert_eq!(graph.resolve(prefix).unwrap().id, id);
        assert!(graph.resolve("nobody").is_none());
    }

    #[test]
    fn max_answer_slots_takes_the_largest() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        editor.create_answer_node("Small", AnswerNode::with_answers(["a"]));
        editor.create_answer_node("Large", AnswerNode::with_answers(["a", "b", "c"]));
        editor.create_answer_node("Medium", AnswerNode::with_answers(["a", "b"]));
        assert_eq!(graph.max_answer_slots(), 3);
    }

    #[test]
    fn unreachable_nodes_are_reported() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", Sentence::new("Alice", "Hi"));
        let b = editor.create_sentence_node("B", Sentence::new("Bob", "Hey"));
        let orphan = editor.create_sentence_node("Orphan", Sentence::new("Carl", "..."));
        editor.connect(a, b).unwrap();

        let unreachable: Vec<NodeId> = graph.unreachable().iter().map(|n| n.id).collect();
        assert_eq!(unreachable, vec![orphan]);
    }

    #[test]
    fn json_round_trip_preserves_order_and_edges() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", Sentence::new("Alice", "Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["Yes", "No"]));
        let b = editor.create_sentence_node("B", Sentence::new("Bob", "Bye"));
        editor.connect(a, q).unwrap();
        editor.connect(q, b).unwrap();

        let json = graph.to_json().unwrap();
        let back = DialogueGraph::from_json(&json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.first_node().unwrap().id, a);
        assert_eq!(back.edges(), graph.edges());
        assert!(back.validate().is_empty());
    }

    #[test]
    fn loading_rejects_dangling_references() {
        let mut graph = test_graph();
        let a = graph
            .connector()
            .create_sentence_node("A", Sentence::new("Alice", "Hi"));
        let mut value = serde_json::to_value(&graph).unwrap();
        value["nodes"][0]["child"] = serde_json::to_value(NodeId::new()).unwrap();

        let err = DialogueGraph::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, GraphError::Invalid(_)));
        assert!(err.to_string().contains(&a.to_string()));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dialogue.json");
        let mut graph = test_graph();
        graph
            .connector()
            .create_sentence_node("A", Sentence::new("Alice", "Hi"));
        graph.save(&path).unwrap();

        let loaded = DialogueGraph::load(&path).unwrap();
        assert_eq!(loaded.node_count(), 1);
        assert_eq!(loaded.meta.name, "Test Dialogue");
    }
}
