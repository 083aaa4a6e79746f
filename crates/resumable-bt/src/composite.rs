//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of an ordered list of
//! children and are the resumable core of the engine. A composite keeps a
//! cursor on the child that is in progress, so a child that returns
//! `Running` is re-entered on the next tick without re-running the
//! children before it.
//!
//! The four flavours differ only in ordering and in which outcome stops
//! the iteration early:
//!
//! | Kind             | Order    | Stops on  | Exhausted |
//! |------------------|----------|-----------|-----------|
//! | `Sequence`       | natural  | `Failure` | `Success` |
//! | `Selector`       | natural  | `Success` | `Failure` |
//! | `RandomSequence` | shuffled | `Failure` | `Success` |
//! | `RandomSelector` | shuffled | `Success` | `Failure` |

use rand::seq::SliceRandom;

use crate::error::{Result, StructureError};
use crate::node::{BoxedNode, Node, NodeId, NodeKind, TickContext};
use crate::Status;

/// Ordering and termination policy of a [`Composite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    /// AND logic: runs children in order until one fails.
    Sequence,
    /// OR logic: runs children in order until one succeeds.
    Selector,
    /// `Sequence` over a shuffled order.
    RandomSequence,
    /// `Selector` over a shuffled order.
    RandomSelector,
}

impl CompositeKind {
    pub const ALL: [CompositeKind; 4] = [
        CompositeKind::Sequence,
        CompositeKind::RandomSequence,
        CompositeKind::Selector,
        CompositeKind::RandomSelector,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CompositeKind::Sequence => "Sequence",
            CompositeKind::Selector => "Selector",
            CompositeKind::RandomSequence => "RandomSequence",
            CompositeKind::RandomSelector => "RandomSelector",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CompositeKind::Sequence => "Sequence",
            CompositeKind::Selector => "Selector",
            CompositeKind::RandomSequence => "Random Sequence",
            CompositeKind::RandomSelector => "Random Selector",
        }
    }

    pub fn is_shuffled(self) -> bool {
        matches!(
            self,
            CompositeKind::RandomSequence | CompositeKind::RandomSelector
        )
    }

    /// Child outcome that ends the pass early.
    fn terminal(self) -> Status {
        match self {
            CompositeKind::Sequence | CompositeKind::RandomSequence => Status::Failure,
            CompositeKind::Selector | CompositeKind::RandomSelector => Status::Success,
        }
    }

    /// Result of a pass that visited every child.
    fn exhausted(self) -> Status {
        self.terminal().invert()
    }
}

/// Ordered children evaluated through a resumable cursor.
///
/// # State
///
/// - `cursor`: position (in evaluation order) of the child in progress;
///   0 when idle
/// - `active`: set while a child is suspended in `Running`
/// - `order`: index permutation for shuffled kinds, rebuilt on each fresh
///   pass and kept stable while the pass is suspended
///
/// None of this state is persisted.
pub struct Composite<H> {
    id: NodeId,
    kind: CompositeKind,
    children: Vec<BoxedNode<H>>,
    cursor: usize,
    active: bool,
    order: Vec<usize>,
}

impl<H> Composite<H> {
    pub fn new(kind: CompositeKind) -> Self {
        Self::with_children(kind, Vec::new())
    }

    pub fn with_children(kind: CompositeKind, children: Vec<BoxedNode<H>>) -> Self {
        Self {
            id: NodeId::fresh(),
            kind,
            children,
            cursor: 0,
            active: false,
            order: Vec::new(),
        }
    }

    pub fn composite_kind(&self) -> CompositeKind {
        self.kind
    }

    /// Position of the child in progress, 0 when idle.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current evaluation order for shuffled kinds; empty before the first pass.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    fn child_index(&self, position: usize) -> usize {
        if self.kind.is_shuffled() {
            self.order[position]
        } else {
            position
        }
    }

    fn go_idle(&mut self) {
        self.cursor = 0;
        self.active = false;
    }

    fn shuffle_order(&mut self, ctx: &mut TickContext<'_, H>) {
        if self.order.len() != self.children.len() {
            self.order = (0..self.children.len()).collect();
        }
        if self.order.len() > 1 {
            self.order.shuffle(ctx.rng());
        }
    }
}

impl<H> Node<H> for Composite<H> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn type_key(&self) -> &str {
        self.kind.key()
    }

    fn display_name(&self) -> &str {
        self.kind.display_name()
    }

    /// Primes the child that runs first in the upcoming pass.
    ///
    /// While a pass is suspended this is a no-op: the order stays as it was
    /// and the suspended child is not primed a second time.
    fn initialize(&mut self, ctx: &mut TickContext<'_, H>) {
        if self.active {
            return;
        }
        if self.kind.is_shuffled() {
            self.shuffle_order(ctx);
        }
        if !self.children.is_empty() {
            let first = self.child_index(0);
            self.children[first].initialize(ctx);
        }
    }

    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> Result<Status> {
        if self.kind.is_shuffled() && self.order.len() != self.children.len() {
            self.shuffle_order(ctx);
        }
        if self.cursor >= self.children.len() {
            self.go_idle();
        }

        let terminal = self.kind.terminal();
        for position in self.cursor..self.children.len() {
            let idx = self.child_index(position);
            let status = ctx.run(self.children[idx].as_mut())?;

            if status.is_running() {
                self.cursor = position;
                self.active = true;
                return Ok(Status::Running);
            }
            if status == terminal {
                self.go_idle();
                return Ok(status);
            }
            // Prime the next child before it is reached
            if position + 1 < self.children.len() {
                let next = self.child_index(position + 1);
                self.children[next].initialize(ctx);
            }
        }

        self.go_idle();
        Ok(self.kind.exhausted())
    }

    fn add_child(&mut self, child: BoxedNode<H>) -> std::result::Result<(), StructureError> {
        self.children.push(child);
        self.reset();
        Ok(())
    }

    fn remove_child(
        &mut self,
        id: NodeId,
    ) -> std::result::Result<Option<BoxedNode<H>>, StructureError> {
        let Some(position) = self.children.iter().position(|c| c.id() == id) else {
            return Ok(None);
        };
        let removed = self.children.remove(position);
        self.reset();
        Ok(Some(removed))
    }

    fn children(&self) -> &[BoxedNode<H>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [BoxedNode<H>] {
        &mut self.children
    }

    fn is_in_progress(&self) -> bool {
        self.active
    }

    fn reset(&mut self) {
        self.go_idle();
        self.order.clear();
    }
}
