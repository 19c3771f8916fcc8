use crate::node::NodeId;

/// Alias for `Result<T, GraphError>`.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur when querying, editing, or loading a dialogue graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The graph has no nodes, so there is nothing to start from.
    #[error("dialogue graph has no nodes")]
    Empty,

    /// The requested node ID does not exist in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A slot operation was addressed to a sentence node.
    #[error("node {0} is not an answer node")]
    NotAnAnswer(NodeId),

    /// The requested slot index is out of range.
    #[error("answer node {node} has no slot {index}")]
    SlotOutOfRange {
        /// The answer node.
        node: NodeId,
        /// The requested slot index.
        index: usize,
    },

    /// An answer node must keep at least one slot.
    #[error("answer node {0} must keep at least one slot")]
    LastSlot(NodeId),

    /// An edge mutation was rejected.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The graph violates one or more structural invariants.
    #[error("invalid dialogue graph: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// The graph file could not be parsed or written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The graph file could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons the connector rejects a proposed edge.
///
/// All of them are recoverable: the graph is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Source and target are the same node.
    #[error("a node cannot connect to itself")]
    SelfLoop,

    /// The edge would close an immediate two-node cycle.
    #[error("connection would form a cycle")]
    Cycle,

    /// Answer nodes may only lead to sentence nodes.
    #[error("answer nodes can only connect to sentence nodes")]
    InvalidTargetVariant,

    /// Every answer slot of the source is already bound.
    #[error("all answer slots are already connected")]
    CapacityExceeded,

    /// The target already has a conflicting parent.
    #[error("target is already connected to another node")]
    AlreadyConnected,

    /// One of the endpoints is not part of the graph.
    #[error("node not found: {0}")]
    UnknownNode(NodeId),
}
