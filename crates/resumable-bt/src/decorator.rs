//! Decorator behavior nodes.
//!
//! Decorators wrap a single child and transform or gate its result. They
//! hold at most one thing in flight, so they need no cursor; only the
//! [`DecoratorKind::Repeater`] keeps a volatile counter.

use crate::error::{FormatError, Result, StructureError};
use crate::format::Element;
use crate::node::{BoxedNode, Node, NodeId, NodeKind, TickContext};
use crate::Status;

/// Loop count meaning "repeat forever".
pub const INFINITE_LOOPS: i32 = -1;

/// What a [`Decorator`] does with its child's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    /// Swaps `Success` and `Failure`; `Running` passes through.
    ///
    /// This is analogous to a logical NOT (!) operation.
    Inverter,
    /// Runs the child and always reports `Success`.
    ///
    /// Useful for optional behaviors that shouldn't fail a sequence.
    Succeeder,
    /// Runs the child once per tick and reports `Running` until it has
    /// been called `loops` times, then `Success`. Negative `loops` never
    /// finishes.
    Repeater { loops: i32 },
    /// Reports `Running` until the child fails, then `Success`.
    RepeatUntilFail,
}

impl DecoratorKind {
    pub const ALL: [DecoratorKind; 4] = [
        DecoratorKind::Inverter,
        DecoratorKind::Succeeder,
        DecoratorKind::Repeater {
            loops: INFINITE_LOOPS,
        },
        DecoratorKind::RepeatUntilFail,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DecoratorKind::Inverter => "Inverter",
            DecoratorKind::Succeeder => "Succeeder",
            DecoratorKind::Repeater { .. } => "Repeater",
            DecoratorKind::RepeatUntilFail => "RepeatUntilFail",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DecoratorKind::Inverter => "Inverter",
            DecoratorKind::Succeeder => "Succeeder",
            DecoratorKind::Repeater { .. } => "Repeater",
            DecoratorKind::RepeatUntilFail => "Repeat Until Fail",
        }
    }
}

/// Single-child node.
pub struct Decorator<H> {
    id: NodeId,
    kind: DecoratorKind,
    child: Option<BoxedNode<H>>,
    counter: i32,
}

impl<H> Decorator<H> {
    pub fn new(kind: DecoratorKind) -> Self {
        Self {
            id: NodeId::fresh(),
            kind,
            child: None,
            counter: 0,
        }
    }

    /// Creates a decorator wrapping the given child.
    pub fn wrap(kind: DecoratorKind, child: BoxedNode<H>) -> Self {
        Self {
            child: Some(child),
            ..Self::new(kind)
        }
    }

    pub fn decorator_kind(&self) -> DecoratorKind {
        self.kind
    }

    /// Configured loop count for repeaters.
    pub fn loops(&self) -> Option<i32> {
        match self.kind {
            DecoratorKind::Repeater { loops } => Some(loops),
            _ => None,
        }
    }

    /// Changes a repeater's loop count and restarts its counter.
    ///
    /// Has no effect on other kinds.
    pub fn set_loops(&mut self, loops: i32) {
        if let DecoratorKind::Repeater { loops: current } = &mut self.kind {
            *current = loops;
            self.counter = 0;
        }
    }

    /// Calls made since the repeater last finished a pass.
    pub fn counter(&self) -> i32 {
        self.counter
    }

    pub fn child(&self) -> Option<&dyn Node<H>> {
        self.child.as_deref()
    }
}

impl<H> Node<H> for Decorator<H> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn type_key(&self) -> &str {
        self.kind.key()
    }

    fn display_name(&self) -> &str {
        self.kind.display_name()
    }

    fn initialize(&mut self, ctx: &mut TickContext<'_, H>) {
        if let Some(child) = self.child.as_mut() {
            child.initialize(ctx);
        }
    }

    fn process(&mut self, ctx: &mut TickContext<'_, H>) -> Result<Status> {
        let child = self
            .child
            .as_mut()
            .ok_or(StructureError::EmptyDecorator(self.id))?;
        let status = ctx.run(child.as_mut())?;

        let status = match self.kind {
            DecoratorKind::Inverter => status.invert(),
            DecoratorKind::Succeeder => Status::Success,
            DecoratorKind::Repeater { loops } if loops < 0 => Status::Running,
            DecoratorKind::Repeater { loops } => {
                self.counter += 1;
                if self.counter >= loops {
                    self.counter = 0;
                    Status::Success
                } else {
                    Status::Running
                }
            }
            DecoratorKind::RepeatUntilFail => {
                if status.is_failure() {
                    Status::Success
                } else {
                    Status::Running
                }
            }
        };
        Ok(status)
    }

    fn add_child(&mut self, child: BoxedNode<H>) -> std::result::Result<(), StructureError> {
        if self.child.is_some() {
            return Err(StructureError::DecoratorOccupied(self.id));
        }
        self.child = Some(child);
        Ok(())
    }

    fn remove_child(
        &mut self,
        id: NodeId,
    ) -> std::result::Result<Option<BoxedNode<H>>, StructureError> {
        if self.child.as_ref().is_some_and(|c| c.id() == id) {
            self.counter = 0;
            return Ok(self.child.take());
        }
        Ok(None)
    }

    fn children(&self) -> &[BoxedNode<H>] {
        self.child.as_slice()
    }

    fn children_mut(&mut self) -> &mut [BoxedNode<H>] {
        self.child.as_mut_slice()
    }

    fn reset(&mut self) {
        self.counter = 0;
    }

    fn write_params(&self, element: &mut Element) {
        if let DecoratorKind::Repeater { loops } = self.kind {
            element.set_attribute("loops", loops);
        }
    }

    fn read_params(&mut self, element: &Element) -> std::result::Result<(), FormatError> {
        if let DecoratorKind::Repeater { .. } = self.kind {
            let loops = element.parse_attribute::<i32>("loops")?;
            self.set_loops(loops);
        }
        Ok(())
    }
}
