//! Generic directed, labeled multigraph.
//!
//! The store knows nothing about what its nodes mean. Node payloads report
//! their own kind label and decide how a repeated insert under the same id
//! is merged; edge payloads report their relationship label. Edges may
//! point at ids that are not (yet) in the node table, and identical edges
//! are kept side by side.

mod store;

pub use store::{GraphEdge, GraphStore};

/// Payload stored on a node.
pub trait NodePayload: Clone {
    /// Kind label used for grouping and scoring (`file`, `dependency`, ...).
    fn kind(&self) -> &str;

    /// Merge an incoming payload inserted under an existing id.
    fn merge(&mut self, incoming: Self) {
        *self = incoming;
    }
}

/// Payload stored on an edge.
pub trait EdgePayload: Clone {
    /// Relationship label (`contains`, `imports`, ...).
    fn kind(&self) -> &str;
}
