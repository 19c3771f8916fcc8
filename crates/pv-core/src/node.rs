use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every node in a dialogue graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Generate a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns true if the textual form of this ID starts with `prefix`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.to_string().starts_with(&prefix.to_lowercase())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Authoring-time layout of a node. Ignored at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width of the node box.
    pub width: f32,
    /// Height of the node box.
    pub height: f32,
}

impl Rect {
    /// Create a rect from its position and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentence {
    /// Name of the speaking character.
    pub speaker: String,
    /// Body text, revealed character by character at runtime.
    pub text: String,
    /// Optional portrait asset reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
}

impl Sentence {
    /// Create a sentence spoken by `speaker`.
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            portrait: None,
        }
    }

    /// Attach a portrait reference.
    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }
}

/// The data behind one answer slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnswerSlot {
    /// Text shown on the answer button.
    pub text: String,
    /// Hooks fired when the answer node presenting this slot is entered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<String>,
}

impl AnswerSlot {
    /// Create a slot with the given button text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hooks: Vec::new(),
        }
    }

    /// Add a hook name.
    pub fn with_hook(mut self, hook: impl Into<String>) -> Self {
        self.hooks.push(hook.into());
        self
    }
}

/// A linear dialogue beat with at most one outgoing edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentenceNode {
    /// The line spoken at this node.
    pub sentence: Sentence,
    /// Nodes with an edge into this one, in connection order.
    #[serde(default)]
    pub parents: Vec<NodeId>,
    /// The single outgoing edge, if any.
    #[serde(default)]
    pub child: Option<NodeId>,
}

/// A branch point offering one choice per slot.
///
/// `children[i]` is only reachable by choosing slot `i`. A slot entry of
/// `None` is declared by the author but carries no data yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerNode {
    /// Optional speaker shown alongside the choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Optional portrait shown alongside the choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    /// Ordered answer slots.
    pub slots: Vec<Option<AnswerSlot>>,
    /// The single node addressing this answer node.
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Outgoing edges, index-aligned with `slots`.
    #[serde(default)]
    pub children: Vec<Option<NodeId>>,
}

impl Default for AnswerNode {
    fn default() -> Self {
        Self {
            speaker: None,
            portrait: None,
            slots: vec![None],
            parent: None,
            children: Vec::new(),
        }
    }
}

impl AnswerNode {
    /// Create an answer node offering the given choices.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots: Vec<Option<AnswerSlot>> = answers
            .into_iter()
            .map(|text| Some(AnswerSlot::new(text)))
            .collect();
        Self {
            slots: if slots.is_empty() { vec![None] } else { slots },
            ..Self::default()
        }
    }

    /// Number of declared slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The child bound to slot `index`, if any.
    pub fn child_at(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied().flatten()
    }

    /// Index of the slot bound to `target`, if any.
    pub fn slot_of(&self, target: NodeId) -> Option<usize> {
        self.children.iter().position(|c| *c == Some(target))
    }

    /// First slot index that can receive a new edge.
    pub fn next_free_slot(&self) -> Option<usize> {
        (0..self.slots.len()).find(|i| self.child_at(*i).is_none())
    }

    /// Number of leading slots that are bound and carry data.
    ///
    /// Scanning stops at the first gap, so slots after it are never surfaced.
    pub fn active_prefix(&self) -> usize {
        (0..self.slots.len())
            .take_while(|i| self.child_at(*i).is_some() && self.slots[*i].is_some())
            .count()
    }

    /// Bound children in slot order.
    pub fn bound_children(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|id| (i, id)))
    }

    pub(crate) fn bind(&mut self, index: usize, target: NodeId) {
        if self.children.len() <= index {
            self.children.resize(index + 1, None);
        }
        self.children[index] = Some(target);
    }

    pub(crate) fn unbind(&mut self, index: usize) -> Option<NodeId> {
        let removed = self.children.get_mut(index).and_then(Option::take);
        while self.children.last() == Some(&None) {
            self.children.pop();
        }
        removed
    }
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A line of dialogue.
    Sentence(SentenceNode),
    /// A set of player choices.
    Answer(AnswerNode),
}

impl NodeKind {
    /// Short variant name, used in listings and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sentence(_) => "sentence",
            Self::Answer(_) => "answer",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A vertex in the dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, used for edges and persistence.
    pub id: NodeId,
    /// Human-readable label.
    pub label: String,
    /// Authoring layout.
    #[serde(default)]
    pub rect: Rect,
    /// Hooks fired when the runner enters this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_activated: Vec<String>,
    /// Hooks fired when the runner leaves this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_deactivated: Vec<String>,
    /// Variant payload and edges.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Create a sentence node with a random ID.
    pub fn sentence(label: impl Into<String>, sentence: Sentence) -> Self {
        Self::with_id(
            NodeId::new(),
            label,
            NodeKind::Sentence(SentenceNode {
                sentence,
                ..SentenceNode::default()
            }),
        )
    }

    /// Create an answer node with a random ID.
    pub fn answer(label: impl Into<String>, answer: AnswerNode) -> Self {
        Self::with_id(NodeId::new(), label, NodeKind::Answer(answer))
    }

    /// Create a node with a pre-assigned ID.
    pub fn with_id(id: NodeId, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            label: label.into(),
            rect: Rect::default(),
            on_activated: Vec::new(),
            on_deactivated: Vec::new(),
            kind,
        }
    }

    /// Set the layout rect.
    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Add an activation hook.
    pub fn on_activated(mut self, hook: impl Into<String>) -> Self {
        self.on_activated.push(hook.into());
        self
    }

    /// Add a deactivation hook.
    pub fn on_deactivated(mut self, hook: impl Into<String>) -> Self {
        self.on_deactivated.push(hook.into());
        self
    }

    /// The sentence payload, if this is a sentence node.
    pub fn as_sentence(&self) -> Option<&SentenceNode> {
        match &self.kind {
            NodeKind::Sentence(s) => Some(s),
            NodeKind::Answer(_) => None,
        }
    }

    /// The answer payload, if this is an answer node.
    pub fn as_answer(&self) -> Option<&AnswerNode> {
        match &self.kind {
            NodeKind::Answer(a) => Some(a),
            NodeKind::Sentence(_) => None,
        }
    }

    /// Mutable answer payload, if this is an answer node.
    pub fn as_answer_mut(&mut self) -> Option<&mut AnswerNode> {
        match &mut self.kind {
            NodeKind::Answer(a) => Some(a),
            NodeKind::Sentence(_) => None,
        }
    }

    /// Returns true for sentence nodes.
    pub fn is_sentence(&self) -> bool {
        matches!(self.kind, NodeKind::Sentence(_))
    }

    /// All outgoing edge targets, in slot order for answer nodes.
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Sentence(s) => s.child.into_iter().collect(),
            NodeKind::Answer(a) => a.bound_children().map(|(_, id)| id).collect(),
        }
    }

    /// All incoming edge sources.
    pub fn parents(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Sentence(s) => s.parents.clone(),
            NodeKind::Answer(a) => a.parent.into_iter().collect(),
        }
    }

    /// Returns true if this node holds any edge to or from `other`.
    pub fn references(&self, other: NodeId) -> bool {
        self.children().contains(&other) || self.parents().contains(&other)
    }
}
