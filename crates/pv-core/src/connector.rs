//! The single choke point for structural edits.
//!
//! Every edge creation, edge removal, and node deletion goes through
//! [`GraphConnector`], which checks a proposed edit completely before it
//! touches the graph. A rejected edit leaves the graph exactly as it was.

use crate::error::{ConnectionError, GraphError, GraphResult};
use crate::graph::{DialogueGraph, Edge};
use crate::node::{AnswerNode, AnswerSlot, Node, NodeId, NodeKind, Sentence};

/// What an accepted `connect` will do.
enum Plan {
    /// The edge already exists.
    Unchanged(Edge),
    /// Point a sentence's single outgoing edge at the target.
    SentenceChild { replaced: Option<NodeId> },
    /// Bind the target to a free answer slot.
    AnswerSlot(usize),
}

/// Validates and applies edits to a [`DialogueGraph`].
pub struct GraphConnector<'g> {
    graph: &'g mut DialogueGraph,
}

impl<'g> GraphConnector<'g> {
    pub(crate) fn new(graph: &'g mut DialogueGraph) -> Self {
        Self { graph }
    }

    // -----------------------------------------------------------------------
    // Node creation
    // -----------------------------------------------------------------------

    /// Append a new sentence node. Returns its ID.
    pub fn create_sentence_node(&mut self, label: impl Into<String>, sentence: Sentence) -> NodeId {
        self.add_node(Node::sentence(label, sentence))
    }

    /// Append a new answer node. Returns its ID.
    pub fn create_answer_node(&mut self, label: impl Into<String>, answer: AnswerNode) -> NodeId {
        self.add_node(Node::answer(label, answer))
    }

    /// Append a prepared node. Any edges it carries are dropped; edges are
    /// only ever created through [`connect`](Self::connect).
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        match &mut node.kind {
            NodeKind::Sentence(s) => {
                s.parents.clear();
                s.child = None;
            }
            NodeKind::Answer(a) => {
                a.parent = None;
                a.children.clear();
                if a.slots.is_empty() {
                    a.slots.push(None);
                }
            }
        }
        tracing::debug!(node = %node.id, kind = node.kind.name(), "created node");
        let id = self.graph.insert(node);
        self.graph.touch();
        id
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Create an edge from `source` to `target`.
    ///
    /// A sentence source replaces its current outgoing edge. An answer source
    /// binds the target to its first free slot. Connecting an edge that
    /// already exists returns it unchanged.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<Edge, ConnectionError> {
        let plan = match self.plan(source, target) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(%source, %target, %err, "connection rejected");
                return Err(err);
            }
        };

        let edge = match plan {
            Plan::Unchanged(edge) => return Ok(edge),
            Plan::SentenceChild { replaced } => {
                if let Some(old) = replaced {
                    self.detach_parent(old, source);
                }
                if let Some(NodeKind::Sentence(s)) = self.kind_mut(source) {
                    s.child = Some(target);
                }
                self.attach_parent(target, source);
                Edge {
                    source,
                    target,
                    slot: None,
                }
            }
            Plan::AnswerSlot(slot) => {
                if let Some(NodeKind::Answer(a)) = self.kind_mut(source) {
                    a.bind(slot, target);
                }
                self.attach_parent(target, source);
                Edge {
                    source,
                    target,
                    slot: Some(slot),
                }
            }
        };

        tracing::debug!(%edge, "connected");
        self.graph.touch();
        Ok(edge)
    }

    /// Remove an edge in both directions. Returns false if it does not exist.
    ///
    /// For answer edges the slot is looked up from the target when
    /// `edge.slot` is absent or stale.
    pub fn disconnect(&mut self, edge: Edge) -> bool {
        let Some(source) = self.graph.get(edge.source) else {
            return false;
        };

        let slot = match &source.kind {
            NodeKind::Sentence(s) => {
                if s.child != Some(edge.target) {
                    return false;
                }
                None
            }
            NodeKind::Answer(a) => {
                let slot = edge
                    .slot
                    .filter(|i| a.child_at(*i) == Some(edge.target))
                    .or_else(|| a.slot_of(edge.target));
                match slot {
                    Some(slot) => Some(slot),
                    None => return false,
                }
            }
        };

        match (self.kind_mut(edge.source), slot) {
            (Some(NodeKind::Sentence(s)), _) => s.child = None,
            (Some(NodeKind::Answer(a)), Some(slot)) => {
                a.unbind(slot);
            }
            _ => return false,
        }
        self.detach_parent(edge.target, edge.source);

        tracing::debug!(%edge, "disconnected");
        self.graph.touch();
        true
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Delete a node and sever every edge that references it.
    ///
    /// Answer slots bound to the node are cleared, never removed, so slot
    /// counts are unchanged. Fails without touching the graph when the node
    /// does not exist.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        if !self.graph.contains(id) {
            return Err(GraphError::NodeNotFound(id));
        }

        for other in self.graph.ids() {
            if other == id {
                continue;
            }
            match self.kind_mut(other) {
                Some(NodeKind::Sentence(s)) => {
                    if s.child == Some(id) {
                        s.child = None;
                    }
                    s.parents.retain(|p| *p != id);
                }
                Some(NodeKind::Answer(a)) => {
                    if a.parent == Some(id) {
                        a.parent = None;
                    }
                    while let Some(slot) = a.slot_of(id) {
                        a.unbind(slot);
                    }
                }
                None => {}
            }
        }

        let node = self
            .graph
            .remove(id)
            .ok_or(GraphError::NodeNotFound(id))?;
        tracing::debug!(node = %id, label = %node.label, "deleted node");
        self.graph.touch();
        Ok(node)
    }

    // -----------------------------------------------------------------------
    // Answer slots
    // -----------------------------------------------------------------------

    /// Declare a new slot at the end of an answer node. Returns its index.
    pub fn add_answer_slot(&mut self, id: NodeId, slot: Option<AnswerSlot>) -> GraphResult<usize> {
        let answer = self.answer_mut(id)?;
        answer.slots.push(slot);
        let index = answer.slots.len() - 1;
        self.graph.touch();
        Ok(index)
    }

    /// Remove the last slot of an answer node, severing its edge if bound.
    pub fn remove_answer_slot(&mut self, id: NodeId) -> GraphResult<Option<AnswerSlot>> {
        let answer = self.answer_mut(id)?;
        if answer.slots.len() <= 1 {
            return Err(GraphError::LastSlot(id));
        }

        let last = answer.slots.len() - 1;
        let severed = answer.unbind(last);
        let removed = answer.slots.pop().flatten();
        if let Some(child) = severed {
            self.detach_parent(child, id);
        }
        self.graph.touch();
        Ok(removed)
    }

    /// Replace the data of an existing slot.
    pub fn set_slot(&mut self, id: NodeId, index: usize, slot: Option<AnswerSlot>) -> GraphResult<()> {
        let answer = self.answer_mut(id)?;
        let entry = answer
            .slots
            .get_mut(index)
            .ok_or(GraphError::SlotOutOfRange { node: id, index })?;
        *entry = slot;
        self.graph.touch();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn plan(&self, source: NodeId, target: NodeId) -> Result<Plan, ConnectionError> {
        if source == target {
            return Err(ConnectionError::SelfLoop);
        }
        let src = self
            .graph
            .get(source)
            .ok_or(ConnectionError::UnknownNode(source))?;
        let tgt = self
            .graph
            .get(target)
            .ok_or(ConnectionError::UnknownNode(target))?;

        match (&src.kind, &tgt.kind) {
            (NodeKind::Sentence(s), NodeKind::Sentence(t)) => {
                if s.child == Some(target) {
                    return Ok(Plan::Unchanged(Edge {
                        source,
                        target,
                        slot: None,
                    }));
                }
                if t.child == Some(source) {
                    return Err(ConnectionError::Cycle);
                }
                Ok(Plan::SentenceChild { replaced: s.child })
            }
            (NodeKind::Sentence(s), NodeKind::Answer(a)) => {
                if s.child == Some(target) {
                    return Ok(Plan::Unchanged(Edge {
                        source,
                        target,
                        slot: None,
                    }));
                }
                if a.parent.is_some_and(|p| p != source) {
                    return Err(ConnectionError::AlreadyConnected);
                }
                if a.slot_of(source).is_some() {
                    return Err(ConnectionError::Cycle);
                }
                Ok(Plan::SentenceChild { replaced: s.child })
            }
            (NodeKind::Answer(_), NodeKind::Answer(_)) => {
                Err(ConnectionError::InvalidTargetVariant)
            }
            (NodeKind::Answer(a), NodeKind::Sentence(t)) => {
                if let Some(slot) = a.slot_of(target) {
                    return Ok(Plan::Unchanged(Edge {
                        source,
                        target,
                        slot: Some(slot),
                    }));
                }
                let other_answer_parent = t.parents.iter().any(|p| {
                    *p != source && self.graph.get(*p).is_some_and(|n| !n.is_sentence())
                });
                if other_answer_parent {
                    return Err(ConnectionError::AlreadyConnected);
                }
                if t.child == Some(source) {
                    return Err(ConnectionError::Cycle);
                }
                a.next_free_slot()
                    .map(Plan::AnswerSlot)
                    .ok_or(ConnectionError::CapacityExceeded)
            }
        }
    }

    fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.graph.get_mut(id).map(|n| &mut n.kind)
    }

    fn answer_mut(&mut self, id: NodeId) -> GraphResult<&mut AnswerNode> {
        let node = self
            .graph
            .get_mut(id)
            .ok_or(GraphError::NodeNotFound(id))?;
        node.as_answer_mut().ok_or(GraphError::NotAnAnswer(id))
    }

    fn attach_parent(&mut self, child: NodeId, parent: NodeId) {
        match self.kind_mut(child) {
            Some(NodeKind::Sentence(s)) => {
                if !s.parents.contains(&parent) {
                    s.parents.push(parent);
                }
            }
            Some(NodeKind::Answer(a)) => a.parent = Some(parent),
            None => {}
        }
    }

    fn detach_parent(&mut self, child: NodeId, parent: NodeId) {
        match self.kind_mut(child) {
            Some(NodeKind::Sentence(s)) => s.parents.retain(|p| *p != parent),
            Some(NodeKind::Answer(a)) => {
                if a.parent == Some(parent) {
                    a.parent = None;
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::graph::GraphMeta;

    fn test_graph() -> DialogueGraph {
        DialogueGraph::new(GraphMeta::new("Connector Test"))
    }

    fn line(text: &str) -> Sentence {
        Sentence::new("Alice", text)
    }

    fn sentence(graph: &DialogueGraph, id: NodeId) -> &crate::node::SentenceNode {
        graph.get(id).and_then(Node::as_sentence).unwrap()
    }

    fn answer(graph: &DialogueGraph, id: NodeId) -> &AnswerNode {
        graph.get(id).and_then(Node::as_answer).unwrap()
    }

    #[test]
    fn self_loop_rejected() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        assert_eq!(editor.connect(a, a), Err(ConnectionError::SelfLoop));
    }

    #[test]
    fn unknown_node_rejected() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let ghost = NodeId::new();
        assert_eq!(
            editor.connect(a, ghost),
            Err(ConnectionError::UnknownNode(ghost))
        );
    }

    #[test]
    fn sentence_edge_registers_parent() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let b = editor.create_sentence_node("B", line("Bye"));
        let edge = editor.connect(a, b).unwrap();

        assert_eq!(edge.slot, None);
        assert_eq!(sentence(&graph, a).child, Some(b));
        assert_eq!(sentence(&graph, b).parents, vec![a]);
    }

    #[test]
    fn sentence_edge_is_overwritten() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let b = editor.create_sentence_node("B", line("Bye"));
        let c = editor.create_sentence_node("C", line("Later"));
        editor.connect(a, b).unwrap();
        editor.connect(a, c).unwrap();

        assert_eq!(sentence(&graph, a).child, Some(c));
        assert!(sentence(&graph, b).parents.is_empty());
        assert_eq!(sentence(&graph, c).parents, vec![a]);
        assert!(graph.validate().is_empty());
    }

    #[test]
    fn immediate_sentence_cycle_rejected() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let b = editor.create_sentence_node("B", line("Bye"));
        editor.connect(a, b).unwrap();
        assert_eq!(editor.connect(b, a), Err(ConnectionError::Cycle));
        assert_eq!(sentence(&graph, b).child, None);
    }

    #[test]
    fn answer_to_answer_rejected() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let q1 = editor.create_answer_node("Q1", AnswerNode::with_answers(["a"]));
        let q2 = editor.create_answer_node("Q2", AnswerNode::with_answers(["b"]));
        assert_eq!(
            editor.connect(q1, q2),
            Err(ConnectionError::InvalidTargetVariant)
        );
    }

    #[test]
    fn answer_slots_fill_in_order_until_capacity() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["Yes", "No"]));
        let yes = editor.create_sentence_node("Yes", line("Great"));
        let no = editor.create_sentence_node("No", line("Pity"));
        let extra = editor.create_sentence_node("Extra", line("?"));

        assert_eq!(editor.connect(q, yes).unwrap().slot, Some(0));
        assert_eq!(editor.connect(q, no).unwrap().slot, Some(1));
        assert_eq!(
            editor.connect(q, extra),
            Err(ConnectionError::CapacityExceeded)
        );
        assert_eq!(answer(&graph, q).children, vec![Some(yes), Some(no)]);
        assert_eq!(sentence(&graph, yes).parents, vec![q]);
    }

    #[test]
    fn reconnecting_same_slot_is_a_no_op() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["Only"]));
        let a = editor.create_sentence_node("A", line("Hi"));
        let first = editor.connect(q, a).unwrap();
        let second = editor.connect(q, a).unwrap();

        assert_eq!(first, second);
        assert_eq!(answer(&graph, q).children, vec![Some(a)]);
        assert_eq!(sentence(&graph, a).parents, vec![q]);
    }

    #[test]
    fn sentence_reached_from_two_answer_nodes_rejected() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let q1 = editor.create_answer_node("Q1", AnswerNode::with_answers(["a"]));
        let q2 = editor.create_answer_node("Q2", AnswerNode::with_answers(["b"]));
        let s = editor.create_sentence_node("S", line("Hi"));
        editor.connect(q1, s).unwrap();
        assert_eq!(
            editor.connect(q2, s),
            Err(ConnectionError::AlreadyConnected)
        );
    }

    #[test]
    fn answer_to_own_parent_is_a_cycle() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let s = editor.create_sentence_node("S", line("Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["a"]));
        editor.connect(s, q).unwrap();
        assert_eq!(editor.connect(q, s), Err(ConnectionError::Cycle));
    }

    #[test]
    fn answer_node_accepts_a_single_parent() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let s1 = editor.create_sentence_node("S1", line("Hi"));
        let s2 = editor.create_sentence_node("S2", line("Hey"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["a"]));
        editor.connect(s1, q).unwrap();
        assert_eq!(
            editor.connect(s2, q),
            Err(ConnectionError::AlreadyConnected)
        );
        assert_eq!(answer(&graph, q).parent, Some(s1));
        assert_eq!(sentence(&graph, s2).child, None);
    }

    #[test]
    fn moving_sentence_edge_frees_answer_parent() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let s = editor.create_sentence_node("S", line("Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["a"]));
        let t = editor.create_sentence_node("T", line("Hey"));
        editor.connect(s, q).unwrap();
        editor.connect(s, t).unwrap();
        assert_eq!(answer(&graph, q).parent, None);
        assert!(graph.validate().is_empty());
    }

    #[test]
    fn disconnect_clears_slot_in_both_directions() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["a", "b", "c"]));
        let s1 = editor.create_sentence_node("S1", line("1"));
        let s2 = editor.create_sentence_node("S2", line("2"));
        let s3 = editor.create_sentence_node("S3", line("3"));
        editor.connect(q, s1).unwrap();
        let middle = editor.connect(q, s2).unwrap();
        editor.connect(q, s3).unwrap();

        assert!(editor.disconnect(middle));
        assert!(!editor.disconnect(middle));
        assert_eq!(answer(&graph, q).children, vec![Some(s1), None, Some(s3)]);
        assert!(sentence(&graph, s2).parents.is_empty());

        // The freed slot is the next one to be filled.
        let s4 = graph
            .connector()
            .create_sentence_node("S4", line("4"));
        let edge = graph.connector().connect(q, s4).unwrap();
        assert_eq!(edge.slot, Some(1));
    }

    #[test]
    fn disconnect_missing_edge_is_a_no_op() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let b = editor.create_sentence_node("B", line("Bye"));
        let before = graph.clone();
        let missing = Edge {
            source: a,
            target: b,
            slot: None,
        };
        assert!(!graph.connector().disconnect(missing));
        assert_eq!(graph, before);
    }

    #[test]
    fn delete_node_severs_every_reference() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["x", "y"]));
        let b = editor.create_sentence_node("B", line("Bye"));
        let c = editor.create_sentence_node("C", line("Later"));
        editor.connect(a, q).unwrap();
        editor.connect(q, b).unwrap();
        editor.connect(q, c).unwrap();
        editor.connect(b, c).unwrap();

        let removed = editor.delete_node(b).unwrap();
        assert_eq!(removed.label, "B");
        assert!(graph.nodes().all(|n| !n.references(b)));
        assert_eq!(answer(&graph, q).slot_count(), 2);
        assert_eq!(answer(&graph, q).children, vec![None, Some(c)]);
        assert!(graph.validate().is_empty());

        let order: Vec<&str> = graph.nodes().map(|n| n.label.as_str()).collect();
        assert_eq!(order, vec!["A", "Q", "C"]);
    }

    #[test]
    fn delete_unknown_node_leaves_graph_unchanged() {
        let mut graph = test_graph();
        graph.connector().create_sentence_node("A", line("Hi"));
        let before = graph.clone();
        let err = graph.connector().delete_node(NodeId::new()).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(_)));
        assert_eq!(graph, before);
    }

    #[test]
    fn removing_last_slot_severs_its_edge() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["x", "y"]));
        let a = editor.create_sentence_node("A", line("1"));
        let b = editor.create_sentence_node("B", line("2"));
        editor.connect(q, a).unwrap();
        editor.connect(q, b).unwrap();

        let removed = editor.remove_answer_slot(q).unwrap();
        assert_eq!(removed.map(|s| s.text), Some("y".to_string()));
        assert!(matches!(
            editor.remove_answer_slot(q),
            Err(GraphError::LastSlot(_))
        ));
        assert_eq!(answer(&graph, q).children, vec![Some(a)]);
        assert!(sentence(&graph, b).parents.is_empty());
        assert!(graph.validate().is_empty());
    }

    #[test]
    fn slot_editing_requires_an_answer_node() {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", line("Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::default());
        assert!(matches!(
            editor.add_answer_slot(a, None),
            Err(GraphError::NotAnAnswer(_))
        ));
        assert_eq!(editor.add_answer_slot(q, Some(AnswerSlot::new("b"))).unwrap(), 1);
        editor.set_slot(q, 0, Some(AnswerSlot::new("a"))).unwrap();
        assert!(matches!(
            editor.set_slot(q, 5, None),
            Err(GraphError::SlotOutOfRange { index: 5, .. })
        ));
        assert_eq!(answer(&graph, q).active_prefix(), 0);
        assert_eq!(answer(&graph, q).slots[0].as_ref().unwrap().text, "a");
    }

    #[test]
    fn add_node_drops_foreign_edges() {
        let mut graph = test_graph();
        let mut node = Node::sentence("A", line("Hi"));
        if let NodeKind::Sentence(s) = &mut node.kind {
            s.child = Some(NodeId::new());
            s.parents.push(NodeId::new());
        }
        let id = graph.connector().add_node(node);
        assert_eq!(sentence(&graph, id).child, None);
        assert!(sentence(&graph, id).parents.is_empty());
    }

    // -----------------------------------------------------------------------
    // Property tests
    // -----------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Connect(usize, usize),
        Disconnect(usize, usize),
        Delete(usize),
        AddSlot(usize),
        RemoveSlot(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            5 => (0..8usize, 0..8usize).prop_map(|(a, b)| Op::Connect(a, b)),
            2 => (0..8usize, 0..8usize).prop_map(|(a, b)| Op::Disconnect(a, b)),
            1 => (0..8usize).prop_map(Op::Delete),
            1 => (0..8usize).prop_map(Op::AddSlot),
            1 => (0..8usize).prop_map(Op::RemoveSlot),
        ]
    }

    fn build(kinds: &[usize]) -> (DialogueGraph, Vec<NodeId>) {
        let mut graph = test_graph();
        let mut editor = graph.connector();
        let ids = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| match kind {
                0 => editor.create_sentence_node(format!("S{i}"), line("...")),
                n => {
                    let answers: Vec<String> = (0..*n).map(|k| format!("answer {k}")).collect();
                    editor.create_answer_node(format!("Q{i}"), AnswerNode::with_answers(answers))
                }
            })
            .collect();
        (graph, ids)
    }

    proptest! {
        #[test]
        fn edits_preserve_invariants(
            kinds in prop::collection::vec(0..4usize, 8),
            ops in prop::collection::vec(op_strategy(), 0..48),
        ) {
            let (mut graph, ids) = build(&kinds);

            for op in ops {
                let before = graph.clone();
                match op {
                    Op::Connect(a, b) => {
                        if graph.connector().connect(ids[a], ids[b]).is_err() {
                            prop_assert_eq!(&graph, &before);
                        }
                    }
                    Op::Disconnect(a, b) => {
                        let edge = Edge { source: ids[a], target: ids[b], slot: None };
                        if !graph.connector().disconnect(edge) {
                            prop_assert_eq!(&graph, &before);
                        }
                    }
                    Op::Delete(a) => {
                        if graph.connector().delete_node(ids[a]).is_ok() {
                            prop_assert!(graph.nodes().all(|n| !n.references(ids[a])));
                        } else {
                            prop_assert_eq!(&graph, &before);
                        }
                    }
                    Op::AddSlot(a) => {
                        let _ = graph.connector().add_answer_slot(ids[a], Some(AnswerSlot::new("more")));
                    }
                    Op::RemoveSlot(a) => {
                        let _ = graph.connector().remove_answer_slot(ids[a]);
                    }
                }

                let violations = graph.validate();
                prop_assert!(violations.is_empty(), "violations: {:?}", violations);
                for node in graph.nodes() {
                    if let Some(answer) = node.as_answer() {
                        prop_assert!(answer.children.len() <= answer.slots.len());
                    }
                }
            }

            let reloaded = DialogueGraph::from_json(&graph.to_json().unwrap()).unwrap();
            prop_assert_eq!(reloaded, graph);
        }
    }
}
