//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::behavior::{Behavior, LeafNode};
use crate::error::{BehaviorError, Result};
use crate::node::{BoxedNode, Node, TickContext};
use crate::{Blackboard, Status};

#[derive(Debug, Default)]
struct Counts {
    initialized: usize,
    processed: usize,
}

/// Observes how often a [`Probe`] was initialized and processed.
#[derive(Debug, Clone, Default)]
pub struct ProbeLog(Arc<Mutex<Counts>>);

impl ProbeLog {
    pub fn initialized(&self) -> usize {
        self.0.lock().unwrap().initialized
    }

    pub fn processed(&self) -> usize {
        self.0.lock().unwrap().processed
    }
}

/// Leaf that replays a scripted list of statuses, repeating the last one.
pub struct Probe {
    script: Vec<Status>,
    next: usize,
    log: ProbeLog,
}

impl Probe {
    pub fn script(script: impl IntoIterator<Item = Status>) -> (Self, ProbeLog) {
        let log = ProbeLog::default();
        let probe = Self {
            script: script.into_iter().collect(),
            next: 0,
            log: log.clone(),
        };
        (probe, log)
    }

    pub fn always(status: Status) -> (Self, ProbeLog) {
        Self::script([status])
    }
}

impl<H> Behavior<H> for Probe {
    fn initialize(&mut self, _ctx: &mut TickContext<'_, H>) {
        self.log.0.lock().unwrap().initialized += 1;
    }

    fn process(&mut self, _ctx: &mut TickContext<'_, H>) -> std::result::Result<Status, BehaviorError> {
        self.log.0.lock().unwrap().processed += 1;
        let idx = self.next.min(self.script.len() - 1);
        self.next += 1;
        Ok(self.script[idx])
    }
}

pub fn probe_leaf(script: impl IntoIterator<Item = Status>) -> (BoxedNode<()>, ProbeLog) {
    let (probe, log) = Probe::script(script);
    (Box::new(LeafNode::new("Probe", probe)), log)
}

/// Owns the blackboard and randomness a tick borrows.
pub struct Harness {
    pub board: Blackboard,
    rng: StdRng,
}

impl Harness {
    pub fn new(seed: u64) -> Self {
        Self {
            board: Blackboard::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Initializes and processes `node` once, as the controller does per tick.
    pub fn tick(&mut self, node: &mut dyn Node<()>) -> Result<Status> {
        let mut ctx = TickContext::new(&mut self.board, None, &mut self.rng);
        node.initialize(&mut ctx);
        ctx.run(node)
    }
}

pub fn run_once(node: &mut dyn Node<()>) -> Result<Status> {
    Harness::new(7).tick(node)
}
