//! Resumable behavior tree engine.
//!
//! A tree of nodes is re-evaluated once per tick and resumes mid-execution
//! across ticks without restarting completed work:
//!
//! - **Explicit resumption state**: composites keep a cursor on the child
//!   that returned `Running`; the call stack fully unwinds between ticks
//! - **Deterministic traversal**: children run strictly in sequence, and
//!   shuffled composites draw from an injectable randomness source
//! - **Text assets**: topology and parameters round-trip through an XML
//!   document; volatile state is never persisted
//!
//! # Architecture
//!
//! - [`Status`]: Success, Failure or Running
//! - [`Blackboard`]: shared key-value store for one tree
//! - [`Node`]: core trait for all nodes, driven through [`TickContext`]
//! - Leaves: [`Behavior`] wrapped in a [`LeafNode`]
//! - Decorators: [`Decorator`] with a [`DecoratorKind`]
//! - Composites: [`Composite`] with a [`CompositeKind`]
//! - [`NodeRegistry`]: creates nodes by key
//! - [`TreeController`]: owns the root and blackboard, ticks, persists and edits

pub mod behavior;
pub mod blackboard;
pub mod builder;
pub mod composite;
pub mod config;
pub mod controller;
pub mod decorator;
pub mod error;
pub mod format;
pub mod layout;
pub mod node;
pub mod persist;
pub mod registry;
pub mod status;
pub mod trace;

#[cfg(test)]
mod testing;

// Re-export core types for ergonomic API
pub use behavior::{Behavior, FnBehavior, LeafNode};
pub use blackboard::{Blackboard, Value};
pub use composite::{Composite, CompositeKind};
pub use config::{ConfigError, TreeConfig};
pub use controller::{Hierarchy, HierarchyEntry, TickReport, TreeController};
pub use decorator::{Decorator, DecoratorKind, INFINITE_LOOPS};
pub use error::{BehaviorError, FormatError, RegistryError, Result, StructureError, TreeError};
pub use format::Element;
pub use layout::{Layout, NodeLayout, Position};
pub use node::{BoxedNode, Node, NodeId, NodeKind, TickContext};
pub use registry::NodeRegistry;
pub use status::Status;
pub use trace::StatusTrace;
