//! Error types raised by the engine.
//!
//! Every variant here is fatal for the operation that raised it: node
//! creation, tree loading, structural edits, or a tick whose leaf faulted.
//! Ordinary outcomes travel through [`crate::Status`] and never appear here.

use thiserror::Error;

use crate::node::NodeId;

/// Boxed error produced by a leaf behavior.
pub type BehaviorError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, TreeError>;

/// Aggregate error returned by controller operations.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("leaf {node} faulted while processing")]
    Behavior {
        node: NodeId,
        #[source]
        source: BehaviorError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors raised by the node registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node of type \"{0}\" is not registered")]
    NotRegistered(String),

    #[error("node type \"{0}\" is already registered")]
    Duplicate(String),

    #[error("\"{0}\" cannot be used as a node key")]
    InvalidKey(String),

    #[error("constructor registered as \"{registered}\" produced a \"{produced}\" node")]
    KeyMismatch { registered: String, produced: String },
}

/// Misuse of the tree structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("leaf {0} cannot have children")]
    LeafChildren(NodeId),

    #[error("decorator {0} already has a child")]
    DecoratorOccupied(NodeId),

    #[error("decorator {0} has no child to process")]
    EmptyDecorator(NodeId),

    #[error("node {0} is not part of this tree")]
    NodeNotFound(NodeId),

    #[error("the root node {0} has no parent to detach from")]
    RootDetach(NodeId),

    #[error("cannot reparent onto leaf {0}")]
    LeafParent(NodeId),

    #[error("cannot move {child} below its own descendant {parent}")]
    CyclicParent { child: NodeId, parent: NodeId },
}

/// Malformed serialized tree text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed tree text: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected a <{expected}> document element, found <{found}>")]
    MissingTreeElement { expected: String, found: String },

    #[error("a tree has exactly one root node, found {0}")]
    RootCardinality(usize),

    #[error("<{tag}> is missing required attribute \"{attribute}\"")]
    MissingAttribute { tag: String, attribute: String },

    #[error("<{tag}> has invalid {attribute}=\"{value}\"")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },
}
