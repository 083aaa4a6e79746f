//! Core node abstraction.
//!
//! This module defines the [`Node`] trait implemented by leaves,
//! decorators and composites, the [`TickContext`] threaded through every
//! evaluation, and the tree walking helpers the controller builds its
//! structural edits on.
//!
//! The trait is generic over a host type `H`: the object the tree is
//! attached to. Leaves reach it read-only through [`TickContext::host`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngCore;

use crate::error::{FormatError, Result, StructureError};
use crate::format::Element;
use crate::trace::StatusTrace;
use crate::{Blackboard, Status};

/// Owned, type-erased node.
pub type BoxedNode<H> = Box<dyn Node<H>>;

/// Process-unique identity of a node.
///
/// Allocated when the node is constructed; it does not encode the node's
/// position and stays the same across structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    /// Allocates a new id.
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No children; domain logic lives here.
    Leaf,
    /// At most one child.
    Decorator,
    /// Ordered children evaluated through a resumable cursor.
    Composite,
}

/// A behavior tree node.
///
/// # Lifecycle
///
/// Every tick the controller calls [`initialize`](Node::initialize) on the
/// root and then processes it. Parents forward `initialize` only to the
/// child that will run first, and prime each following child just before
/// reaching it, so a node gets exactly one `initialize` per fresh attempt.
pub trait Node<H>: Send {
    fn id(&self) -> NodeId;

    fn kind(&self) -> NodeKind;

    /// Registry key this node is created and serialized under.
    fn type_key(&self) -> &str;

    /// Name shown when no layout entry overrides it.
    fn display_name(&self) -> &str;

    /// Primes the node for the next [`process`](Node::process) call.
    fn initialize(&mut self, ctx: &mut TickContext<'_, H>);

    /// Evaluates the node once for the current tick.
    ///
    /// Faults are returned as errors and must never be folded into
    /// [`Status::Failure`].
    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> Result<Status>;

    fn add_child(&mut self, child: BoxedNode<H>) -> std::result::Result<(), StructureError>;

    /// Detaches the direct child with the given id, if present.
    fn remove_child(
        &mut self,
        id: NodeId,
    ) -> std::result::Result<Option<BoxedNode<H>>, StructureError>;

    /// Children in evaluation order.
    fn children(&self) -> &[BoxedNode<H>];

    fn children_mut(&mut self) -> &mut [BoxedNode<H>];

    /// Whether the node holds suspended work from an earlier tick.
    fn is_in_progress(&self) -> bool {
        false
    }

    /// Clears this node's volatile state (cursors, counters, orderings).
    fn reset(&mut self) {}

    /// Writes subtype-specific persisted parameters.
    fn write_params(&self, _element: &mut Element) {}

    /// Reads subtype-specific persisted parameters.
    fn read_params(&mut self, _element: &Element) -> std::result::Result<(), FormatError> {
        Ok(())
    }
}

/// Per-tick evaluation context.
///
/// Replaces a back-reference from each node to its controller: everything
/// a node may touch while processing is lent here for the duration of one
/// tick.
pub struct TickContext<'a, H> {
    blackboard: &'a mut Blackboard,
    host: Option<&'a H>,
    rng: &'a mut (dyn RngCore + 'a),
    trace: Option<&'a mut StatusTrace>,
}

impl<'a, H> TickContext<'a, H> {
    pub fn new(
        blackboard: &'a mut Blackboard,
        host: Option<&'a H>,
        rng: &'a mut (dyn RngCore + 'a),
    ) -> Self {
        Self {
            blackboard,
            host,
            rng,
            trace: None,
        }
    }

    /// Records every processed node's status into `trace`.
    pub fn with_trace(mut self, trace: Option<&'a mut StatusTrace>) -> Self {
        self.trace = trace;
        self
    }

    /// Processes `node` and records its status when a trace is attached.
    ///
    /// Parents must evaluate their children through this method rather than
    /// calling [`Node::process`] directly.
    pub fn run(&mut self, node: &mut dyn Node<H>) -> Result<Status> {
        let status = node.process(self)?;
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.record(node.id(), status);
        }
        tracing::trace!(node = %node.id(), key = node.type_key(), ?status, "processed");
        Ok(status)
    }

    pub fn blackboard(&self) -> &Blackboard {
        &*self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut *self.blackboard
    }

    /// The object the tree is attached to, if one has been set.
    pub fn host(&self) -> Option<&'a H> {
        self.host
    }

    pub fn rng(&mut self) -> &mut (dyn RngCore + 'a) {
        &mut *self.rng
    }
}

/// Finds the node with the given id in `node`'s subtree.
pub fn find<H>(node: &dyn Node<H>, id: NodeId) -> Option<&dyn Node<H>> {
    if node.id() == id {
        return Some(node);
    }
    node.children().iter().find_map(|child| find(child.as_ref(), id))
}

pub fn find_mut<H>(node: &mut dyn Node<H>, id: NodeId) -> Option<&mut dyn Node<H>> {
    if node.id() == id {
        return Some(node);
    }
    for child in node.children_mut() {
        if let Some(found) = find_mut(child.as_mut(), id) {
            return Some(found);
        }
    }
    None
}

/// Returns the id of the direct parent of `id` within `node`'s subtree.
pub fn parent_of<H>(node: &dyn Node<H>, id: NodeId) -> Option<NodeId> {
    for child in node.children() {
        if child.id() == id {
            return Some(node.id());
        }
        if let Some(parent) = parent_of(child.as_ref(), id) {
            return Some(parent);
        }
    }
    None
}

/// Clears volatile state on the whole subtree without processing it.
pub fn reset_subtree<H>(node: &mut dyn Node<H>) {
    node.reset();
    for child in node.children_mut() {
        reset_subtree(child.as_mut());
    }
}

/// Calls `visit` on every node of the subtree in pre-order.
pub fn walk<'n, H>(node: &'n dyn Node<H>, visit: &mut impl FnMut(&'n dyn Node<H>)) {
    visit(node);
    for child in node.children() {
        walk(child.as_ref(), visit);
    }
}
