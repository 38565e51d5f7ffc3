use thiserror::Error;

use super::ids::NodeId;

/// Errors raised by Domain mutations (spec §4.2, §7).
#[derive(Error, Debug)]
pub enum DomainError {
    /// An id (node or edge) that already exists anywhere in the tree.
    #[error("id `{0}` already exists")]
    DuplicateId(String),

    /// An edge endpoint that doesn't name a known node.
    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(NodeId),

    /// `moveNode` to the node's current parent — swallowed silently by the
    /// orchestrator (§7 AlreadyContainsError).
    #[error("`{id}` already has parent `{parent}`")]
    AlreadyContains { id: NodeId, parent: NodeId },

    /// A requested node or edge id doesn't exist.
    #[error("`{0}` not found")]
    NotFound(String),

    /// `moveNode`/`groupNodes` would move a node into its own subtree.
    #[error("cannot move `{id}` into its own descendant `{new_parent}`")]
    Cycle { id: NodeId, new_parent: NodeId },
}
