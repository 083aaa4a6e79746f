//! Leaf behaviors.
//!
//! This module defines the [`Behavior`] trait, which is where domain logic
//! lives, and [`LeafNode`], which adapts a behavior into a tree [`Node`].
//! The trait is generic over the host type `H` so leaves can inspect the
//! object the tree is attached to.

use crate::error::{BehaviorError, Result, StructureError, TreeError};
use crate::node::{BoxedNode, Node, NodeId, NodeKind, TickContext};
use crate::Status;

/// Domain logic of a leaf node.
pub trait Behavior<H>: Send {
    /// Called once before each fresh attempt.
    ///
    /// Not called again while the previous attempt is still `Running`.
    fn initialize(&mut self, _ctx: &mut TickContext<'_, H>) {}

    /// Advances the behavior by one tick.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Access to the blackboard and the host. Leaves may read and
    ///   write the blackboard freely; writes are visible to every node
    ///   processed later in the same tick.
    ///
    /// # Returns
    ///
    /// - `Ok(Status::Success)` / `Ok(Status::Failure)` when the attempt is over
    /// - `Ok(Status::Running)` to be processed again next tick
    /// - `Err(_)` for a fault, which aborts the whole tick
    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> std::result::Result<Status, BehaviorError>;

    /// Clears any per-attempt state.
    fn reset(&mut self) {}
}

/// Blanket implementation for boxed behaviors.
impl<H> Behavior<H> for Box<dyn Behavior<H>> {
    #[inline]
    fn initialize(&mut self, ctx: &mut TickContext<'_, H>) {
        (**self).initialize(ctx)
    }

    #[inline]
    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> std::result::Result<Status, BehaviorError> {
        (**self).process(ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Adapts a closure into a [`Behavior`].
pub struct FnBehavior<F>(pub F);

impl<H, F> Behavior<H> for FnBehavior<F>
where
    F: FnMut(&mut TickContext<'_, H>) -> std::result::Result<Status, BehaviorError> + Send,
{
    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> std::result::Result<Status, BehaviorError> {
        (self.0)(ctx)
    }
}

/// Terminal node wrapping a [`Behavior`].
///
/// Leaves own no children: every child operation fails with
/// [`StructureError::LeafChildren`].
pub struct LeafNode<H> {
    id: NodeId,
    key: String,
    name: String,
    behavior: Box<dyn Behavior<H>>,
    running: bool,
}

impl<H> LeafNode<H> {
    /// Creates a leaf registered under `key`, displayed under the same name.
    pub fn new(key: impl Into<String>, behavior: impl Behavior<H> + 'static) -> Self {
        let key = key.into();
        Self {
            id: NodeId::fresh(),
            name: key.clone(),
            key,
            behavior: Box::new(behavior),
            running: false,
        }
    }

    /// Overrides the default display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<H> Node<H> for LeafNode<H> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn type_key(&self) -> &str {
        &self.key
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, ctx: &mut TickContext<'_, H>) {
        if !self.running {
            self.behavior.initialize(ctx);
        }
    }

    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> Result<Status> {
        match self.behavior.process(ctx) {
            Ok(status) => {
                self.running = status.is_running();
                Ok(status)
            }
            Err(source) => {
                self.running = false;
                Err(TreeError::Behavior {
                    node: self.id,
                    source,
                })
            }
        }
    }

    fn add_child(&mut self, _child: BoxedNode<H>) -> std::result::Result<(), StructureError> {
        Err(StructureError::LeafChildren(self.id))
    }

    fn remove_child(
        &mut self,
        _id: NodeId,
    ) -> std::result::Result<Option<BoxedNode<H>>, StructureError> {
        Err(StructureError::LeafChildren(self.id))
    }

    fn children(&self) -> &[BoxedNode<H>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [BoxedNode<H>] {
        &mut []
    }

    fn is_in_progress(&self) -> bool {
        self.running
    }

    fn reset(&mut self) {
        self.running = false;
        self.behavior.reset();
    }
}
