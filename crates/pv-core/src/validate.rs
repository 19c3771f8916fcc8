//! Structural validation of a dialogue graph.
//!
//! The connector keeps these invariants on every edit; validation exists for
//! graphs that arrive from outside, such as files edited by hand.

use std::collections::HashSet;
use std::fmt;

use crate::graph::DialogueGraph;
use crate::node::{AnswerNode, Node, NodeId, NodeKind, SentenceNode};

/// A broken invariant found on one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The node where the problem was found.
    pub node: NodeId,
    /// A human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}: {}", self.node, self.message)
    }
}

impl DialogueGraph {
    /// Check every structural invariant and return all violations.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for node in self.nodes() {
            let mut report = |message: String| {
                violations.push(Violation {
                    node: node.id,
                    message,
                })
            };
            match &node.kind {
                NodeKind::Sentence(sentence) => {
                    validate_sentence(self, node, sentence, &mut report)
                }
                NodeKind::Answer(answer) => validate_answer(self, node, answer, &mut report),
            }
        }
        violations
    }
}

fn validate_sentence(
    graph: &DialogueGraph,
    node: &Node,
    sentence: &SentenceNode,
    report: &mut impl FnMut(String),
) {
    if let Some(child_id) = sentence.child {
        match graph.get(child_id) {
            None => report(format!("child {child_id} does not exist")),
            Some(_) if child_id == node.id => report("child points to itself".into()),
            Some(child) => {
                if !child.parents().contains(&node.id) {
                    report(format!("child {child_id} does not list this node as parent"));
                }
                let loops_back = match &child.kind {
                    NodeKind::Sentence(s) => s.child == Some(node.id) && node.id < child_id,
                    NodeKind::Answer(a) => a.slot_of(node.id).is_some(),
                };
                if loops_back {
                    report(format!("child {child_id} leads straight back, forming a cycle"));
                }
            }
        }
    }

    let mut seen = HashSet::new();
    let mut answer_parents = 0;
    for &parent_id in &sentence.parents {
        if !seen.insert(parent_id) {
            report(format!("parent {parent_id} listed twice"));
            continue;
        }
        let Some(parent) = graph.get(parent_id) else {
            report(format!("parent {parent_id} does not exist"));
            continue;
        };
        if !parent.children().contains(&node.id) {
            report(format!("parent {parent_id} has no edge to this node"));
        }
        if !parent.is_sentence() {
            answer_parents += 1;
        }
    }
    if answer_parents > 1 {
        report(format!("reached from {answer_parents} different answer nodes"));
    }
}

fn validate_answer(
    graph: &DialogueGraph,
    node: &Node,
    answer: &AnswerNode,
    report: &mut impl FnMut(String),
) {
    if answer.slots.is_empty() {
        report("answer node declares no slots".into());
    }
    if answer.children.len() > answer.slots.len() {
        report(format!(
            "{} children bound but only {} slots declared",
            answer.children.len(),
            answer.slots.len()
        ));
    }

    let mut seen = HashSet::new();
    for (slot, child_id) in answer.bound_children() {
        if !seen.insert(child_id) {
            report(format!("child {child_id} bound to more than one slot"));
            continue;
        }
        match graph.get(child_id) {
            None => report(format!("slot {slot} child {child_id} does not exist")),
            Some(child) => {
                if !child.is_sentence() {
                    report(format!("slot {slot} leads to answer node {child_id}"));
                } else if !child.parents().contains(&node.id) {
                    report(format!(
                        "slot {slot} child {child_id} does not list this node as parent"
                    ));
                }
            }
        }
    }

    if let Some(parent_id) = answer.parent {
        match graph.get(parent_id) {
            None => report(format!("parent {parent_id} does not exist")),
            Some(parent) => {
                if !parent.children().contains(&node.id) {
                    report(format!("parent {parent_id} has no edge to this node"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphMeta;
    use crate::node::Sentence;

    #[test]
    fn connector_built_graph_is_valid() {
        let mut graph = DialogueGraph::new(GraphMeta::new("Valid"));
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", Sentence::new("Alice", "Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["Yes", "No"]));
        let yes = editor.create_sentence_node("Yes", Sentence::new("Bob", "Great"));
        let no = editor.create_sentence_node("No", Sentence::new("Bob", "Pity"));
        editor.connect(a, q).unwrap();
        editor.connect(q, yes).unwrap();
        editor.connect(q, no).unwrap();
        editor.connect(yes, a).unwrap();

        assert!(graph.validate().is_empty());
    }

    #[test]
    fn missing_back_reference_is_reported() {
        let mut graph = DialogueGraph::new(GraphMeta::new("Broken"));
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", Sentence::new("Alice", "Hi"));
        let b = editor.create_sentence_node("B", Sentence::new("Bob", "Hey"));
        editor.connect(a, b).unwrap();

        if let Some(NodeKind::Sentence(s)) = graph.get_mut(b).map(|n| &mut n.kind) {
            s.parents.clear();
        }

        let violations = graph.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].node, a);
        assert!(violations[0].message.contains("does not list this node"));
    }

    #[test]
    fn two_sentence_cycle_is_reported_once() {
        let mut graph = DialogueGraph::new(GraphMeta::new("Loop"));
        let mut editor = graph.connector();
        let a = editor.create_sentence_node("A", Sentence::new("Alice", "Hi"));
        let b = editor.create_sentence_node("B", Sentence::new("Bob", "Hey"));
        editor.connect(a, b).unwrap();

        if let Some(NodeKind::Sentence(s)) = graph.get_mut(b).map(|n| &mut n.kind) {
            s.child = Some(a);
        }
        if let Some(NodeKind::Sentence(s)) = graph.get_mut(a).map(|n| &mut n.kind) {
            s.parents.push(b);
        }

        let cycles: Vec<Violation> = graph
            .validate()
            .into_iter()
            .filter(|v| v.message.contains("cycle"))
            .collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].node, a.min(b));
    }

    #[test]
    fn sentence_answer_cycle_is_reported() {
        let mut graph = DialogueGraph::new(GraphMeta::new("Loop"));
        let mut editor = graph.connector();
        let s = editor.create_sentence_node("S", Sentence::new("Alice", "Hi"));
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["Again"]));
        editor.connect(s, q).unwrap();

        if let Some(answer) = graph.get_mut(q).and_then(Node::as_answer_mut) {
            answer.bind(0, s);
        }
        if let Some(NodeKind::Sentence(sentence)) = graph.get_mut(s).map(|n| &mut n.kind) {
            sentence.parents.push(q);
        }

        let violations = graph.validate();
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].node, s);
        assert!(violations[0].message.contains("cycle"));

        let json = graph.to_json().unwrap();
        assert!(matches!(
            DialogueGraph::from_json(&json),
            Err(crate::error::GraphError::Invalid(_))
        ));
    }

    #[test]
    fn overfull_answer_node_is_reported() {
        let mut graph = DialogueGraph::new(GraphMeta::new("Broken"));
        let mut editor = graph.connector();
        let q = editor.create_answer_node("Q", AnswerNode::with_answers(["Only"]));
        let a = editor.create_sentence_node("A", Sentence::new("Alice", "Hi"));
        editor.connect(q, a).unwrap();

        if let Some(answer) = graph.get_mut(q).and_then(Node::as_answer_mut) {
            answer.slots.clear();
        }

        let messages: Vec<String> = graph.validate().iter().map(|v| v.message.clone()).collect();
        assert!(messages.iter().any(|m| m.contains("declares no slots")));
        assert!(messages.iter().any(|m| m.contains("only 0 slots")));
    }
}
