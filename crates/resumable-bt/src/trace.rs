//! Optional record of the statuses produced during the latest tick.
//!
//! Visualisation tooling attaches a [`StatusTrace`] to highlight the nodes
//! that ran. The engine itself never reads it back.

use std::collections::HashMap;

use crate::node::{Node, NodeId};
use crate::Status;

#[derive(Debug, Clone, Default)]
pub struct StatusTrace {
    active: HashMap<NodeId, Status>,
}

impl StatusTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: NodeId, status: Status) {
        self.active.insert(id, status);
    }

    /// Last status of `id`, if it ran this tick or sits in a suspended branch.
    pub fn status_of(&self, id: NodeId) -> Option<Status> {
        self.active.get(&id).copied()
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Status)> + '_ {
        self.active.iter().map(|(id, status)| (*id, *status))
    }

    /// Clears entries before a new tick.
    ///
    /// A composite that is still in progress keeps itself and its whole
    /// subtree, so the branch it suspended in stays visible.
    pub fn begin_tick<H>(&mut self, root: &dyn Node<H>) {
        if root.is_in_progress() {
            return;
        }
        self.active.remove(&root.id());
        for child in root.children() {
            self.begin_tick(child.as_ref());
        }
    }

    /// Drops every entry regardless of suspended work.
    pub fn force_clear(&mut self) {
        self.active.clear();
    }

    /// Drops the entries of a subtree that left the tree.
    pub fn forget<H>(&mut self, node: &dyn Node<H>) {
        crate::node::walk(node, &mut |n| {
            self.active.remove(&n.id());
        });
    }
}
