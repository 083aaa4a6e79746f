//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing `Box::new(Composite::with_children(CompositeKind::Sequence, vec![...]))`
//! you can write `sequence(vec![...])`. Trees built this way have no layout
//! entries; serializing them falls back to display names at the origin.

use crate::behavior::{Behavior, FnBehavior, LeafNode};
use crate::composite::{Composite, CompositeKind};
use crate::decorator::{Decorator, DecoratorKind};
use crate::error::BehaviorError;
use crate::node::{BoxedNode, TickContext};
use crate::Status;

/// Creates a sequence node.
#[inline]
pub fn sequence<H: 'static>(children: Vec<BoxedNode<H>>) -> BoxedNode<H> {
    Box::new(Composite::with_children(CompositeKind::Sequence, children))
}

/// Creates a selector node.
#[inline]
pub fn selector<H: 'static>(children: Vec<BoxedNode<H>>) -> BoxedNode<H> {
    Box::new(Composite::with_children(CompositeKind::Selector, children))
}

/// Creates a sequence that visits its children in a fresh random order per pass.
#[inline]
pub fn random_sequence<H: 'static>(children: Vec<BoxedNode<H>>) -> BoxedNode<H> {
    Box::new(Composite::with_children(CompositeKind::RandomSequence, children))
}

/// Creates a selector that visits its children in a fresh random order per pass.
#[inline]
pub fn random_selector<H: 'static>(children: Vec<BoxedNode<H>>) -> BoxedNode<H> {
    Box::new(Composite::with_children(CompositeKind::RandomSelector, children))
}

/// Creates an inverter node.
#[inline]
pub fn inverter<H: 'static>(child: BoxedNode<H>) -> BoxedNode<H> {
    Box::new(Decorator::wrap(DecoratorKind::Inverter, child))
}

/// Creates a succeeder node.
#[inline]
pub fn succeeder<H: 'static>(child: BoxedNode<H>) -> BoxedNode<H> {
    Box::new(Decorator::wrap(DecoratorKind::Succeeder, child))
}

/// Creates a repeater node. Use [`INFINITE_LOOPS`](crate::INFINITE_LOOPS) to repeat forever.
#[inline]
pub fn repeater<H: 'static>(loops: i32, child: BoxedNode<H>) -> BoxedNode<H> {
    Box::new(Decorator::wrap(DecoratorKind::Repeater { loops }, child))
}

/// Creates a node that re-runs its child until the child fails.
#[inline]
pub fn repeat_until_fail<H: 'static>(child: BoxedNode<H>) -> BoxedNode<H> {
    Box::new(Decorator::wrap(DecoratorKind::RepeatUntilFail, child))
}

/// Wraps a behavior in a leaf registered under `key`.
#[inline]
pub fn leaf<H: 'static>(key: &str, behavior: impl Behavior<H> + 'static) -> BoxedNode<H> {
    Box::new(LeafNode::new(key, behavior))
}

/// Wraps a closure in a leaf registered under `key`.
///
/// ```
/// use resumable_bt::{builder, Node, Status};
///
/// let shoot = builder::action::<(), _>("Shoot", |ctx| {
///     ctx.blackboard_mut().set("shots", 1);
///     Ok(Status::Success)
/// });
/// assert_eq!(shoot.type_key(), "Shoot");
/// ```
pub fn action<H, F>(key: &str, f: F) -> BoxedNode<H>
where
    H: 'static,
    F: FnMut(&mut TickContext<'_, H>) -> Result<Status, BehaviorError> + Send + 'static,
{
    leaf(key, FnBehavior(f))
}
