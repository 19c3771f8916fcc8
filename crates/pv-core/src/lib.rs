//! Core types for Palaver: dialogue nodes, the graph that owns them, and the
//! connector that keeps its edges consistent.
//!
//! Graphs are built programmatically through [`GraphConnector`] or loaded
//! from JSON. Playback lives in the `pv-runtime` crate.

/// Edge validation and structural edits.
pub mod connector;
/// Error types used throughout the crate.
pub mod error;
/// Graphviz and Markdown renderings.
pub mod export;
/// The dialogue graph arena and its persistence.
pub mod graph;
/// Node identifiers, payloads, and variants.
pub mod node;
/// Structural invariant checks.
pub mod validate;

/// Re-export the connector.
pub use connector::GraphConnector;
/// Re-export error types.
pub use error::{ConnectionError, GraphError, GraphResult};
/// Re-export graph types.
pub use graph::{DialogueGraph, Edge, GraphMeta};
/// Re-export node types.
pub use node::{AnswerNode, AnswerSlot, Node, NodeId, NodeKind, Rect, Sentence, SentenceNode};
/// Re-export validation results.
pub use validate::Violation;
