//! Tree controller: owns the root, the blackboard and the per-tree state,
//! and is the single entry point for ticking, persistence and structural
//! edits.
//!
//! # Ticking
//!
//! [`TreeController::tick`] initializes and processes the root exactly
//! once. The engine has no clock of its own; the host decides the cadence.
//!
//! # Structural edits
//!
//! Authoring tools address nodes by [`NodeId`]. Edits that change a
//! parent's child list reset the whole tree to idle, so a pass that was
//! suspended across the edit restarts from the root instead of resuming
//! into a different layout. The same holds after a leaf fault.

use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace, warn};

use crate::config::TreeConfig;
use crate::decorator::{Decorator, DecoratorKind};
use crate::error::{Result, StructureError, TreeError};
use crate::layout::{Layout, Position};
use crate::node::{self, BoxedNode, Node, NodeId, NodeKind, TickContext};
use crate::persist;
use crate::registry::NodeRegistry;
use crate::trace::StatusTrace;
use crate::{Blackboard, Status};

/// Delivered to observers after each tick and after a forced reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Number of completed ticks.
    pub tick: u64,
    /// Root status, or `None` after a reset.
    pub status: Option<Status>,
}

type Observer = Box<dyn FnMut(&TickReport) + Send>;

/// One node of a [`Hierarchy`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyEntry {
    pub id: NodeId,
    pub key: String,
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

/// Parent-to-children snapshot of a tree, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    entries: Vec<HierarchyEntry>,
}

impl Hierarchy {
    fn capture<H>(root: &dyn Node<H>) -> Self {
        let mut entries = Vec::new();
        node::walk(root, &mut |n| {
            entries.push(HierarchyEntry {
                id: n.id(),
                key: n.type_key().to_owned(),
                kind: n.kind(),
                children: n.children().iter().map(|c| c.id()).collect(),
            });
        });
        Self { entries }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.entries.first().map(|e| e.id)
    }

    pub fn get(&self, id: NodeId) -> Option<&HierarchyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or_default()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|e| e.children.contains(&id))
            .map(|e| e.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HierarchyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner and driver of one behavior tree instance.
pub struct TreeController<H> {
    registry: Arc<NodeRegistry<H>>,
    root: BoxedNode<H>,
    blackboard: Blackboard,
    host: Option<H>,
    rng: Box<dyn RngCore + Send>,
    layout: Layout,
    trace: Option<StatusTrace>,
    root_loops: i32,
    tick_count: u64,
    last_status: Option<Status>,
    observers: Vec<Observer>,
}

impl<H: 'static> TreeController<H> {
    /// Creates a controller with the default configuration.
    pub fn new(registry: Arc<NodeRegistry<H>>) -> Self {
        Self::from_config(registry, &TreeConfig::default())
    }

    /// Creates a controller whose root is a childless repeater.
    pub fn from_config(registry: Arc<NodeRegistry<H>>, config: &TreeConfig) -> Self {
        let rng: Box<dyn RngCore + Send> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };
        Self {
            registry,
            root: Self::default_root(config.root_loops),
            blackboard: Blackboard::new(),
            host: None,
            rng,
            layout: Layout::new(),
            trace: config.trace.then(StatusTrace::new),
            root_loops: config.root_loops,
            tick_count: 0,
            last_status: None,
            observers: Vec::new(),
        }
    }

    fn default_root(loops: i32) -> BoxedNode<H> {
        Box::new(Decorator::new(DecoratorKind::Repeater { loops }))
    }

    /// Replaces the randomness source used for shuffling.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn set_host(&mut self, host: H) {
        self.host = Some(host);
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// Mutable access to the host between ticks; leaves only see it shared.
    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    pub fn take_host(&mut self) -> Option<H> {
        self.host.take()
    }

    pub fn registry(&self) -> &NodeRegistry<H> {
        &self.registry
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn root(&self) -> &dyn Node<H> {
        self.root.as_ref()
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id()
    }

    /// Installs a new root, returning the previous one.
    pub fn set_root(&mut self, root: BoxedNode<H>) -> BoxedNode<H> {
        let previous = std::mem::replace(&mut self.root, root);
        self.forget(previous.as_ref());
        self.last_status = None;
        previous
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn trace(&self) -> Option<&StatusTrace> {
        self.trace.as_ref()
    }

    /// Attaches or detaches the status trace.
    pub fn set_tracing(&mut self, enabled: bool) {
        match (enabled, self.trace.is_some()) {
            (true, false) => self.trace = Some(StatusTrace::new()),
            (false, true) => self.trace = None,
            _ => {}
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Root status of the latest tick, `None` before the first tick or after a reset.
    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    /// Registers a callback invoked after every tick and forced reset.
    pub fn subscribe(&mut self, observer: impl FnMut(&TickReport) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Runs one tick: initializes the root, then processes it.
    ///
    /// A leaf fault aborts the tick and is returned unchanged; the next
    /// tick starts a fresh pass.
    pub fn tick(&mut self) -> Result<Status> {
        if let Some(trace) = self.trace.as_mut() {
            trace.begin_tick(self.root.as_ref());
        }

        let mut ctx = TickContext::new(&mut self.blackboard, self.host.as_ref(), &mut *self.rng)
            .with_trace(self.trace.as_mut());
        self.root.initialize(&mut ctx);
        let status = match ctx.run(self.root.as_mut()) {
            Ok(status) => status,
            Err(err) => {
                warn!(tick = self.tick_count + 1, error = %err, "tick aborted");
                self.restart_pass();
                return Err(err);
            }
        };

        self.tick_count += 1;
        self.last_status = Some(status);
        trace!(tick = self.tick_count, ?status, "tick complete");
        self.notify(Some(status));
        Ok(status)
    }

    /// Clears every cursor, counter, shuffle order and running flag in the
    /// tree, plus the status trace, without processing anything.
    pub fn reset(&mut self) {
        node::reset_subtree(self.root.as_mut());
        if let Some(trace) = self.trace.as_mut() {
            trace.force_clear();
        }
        self.last_status = None;
        debug!(root = %self.root.id(), "tree reset");
        self.notify(None);
    }

    /// Drops suspended work everywhere, keeping the trace and observers.
    fn restart_pass(&mut self) {
        node::reset_subtree(self.root.as_mut());
        trace!(root = %self.root.id(), "pass restarted");
    }

    fn notify(&mut self, status: Option<Status>) {
        let report = TickReport {
            tick: self.tick_count,
            status,
        };
        for observer in &mut self.observers {
            observer(&report);
        }
    }

    /// Builds a detached node of type `key` through the registry.
    pub fn create_node(&self, key: &str) -> Result<BoxedNode<H>> {
        Ok(self.registry.create(key)?)
    }

    pub fn find(&self, id: NodeId) -> Option<&dyn Node<H>> {
        node::find(self.root.as_ref(), id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut dyn Node<H>> {
        node::find_mut(self.root.as_mut(), id)
            .ok_or_else(|| TreeError::from(StructureError::NodeNotFound(id)))
    }

    /// Id of the direct parent of `id`; `None` for the root or unknown ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        node::parent_of(self.root.as_ref(), id)
    }

    pub fn nodes_hierarchy(&self) -> Hierarchy {
        Hierarchy::capture(self.root.as_ref())
    }

    /// Appends `node` to the children of `parent`.
    pub fn attach(&mut self, parent: NodeId, node: BoxedNode<H>) -> Result<NodeId> {
        let id = node.id();
        let parent_node = self.node_mut(parent)?;
        if let Err(err) = parent_node.add_child(node) {
            warn!(parent = %parent, error = %err, "attach refused");
            return Err(err.into());
        }
        self.restart_pass();
        debug!(node = %id, parent = %parent, "attached node");
        Ok(id)
    }

    /// Creates a node of type `key` and appends it below `parent`.
    pub fn add_node(&mut self, parent: NodeId, key: &str) -> Result<NodeId> {
        let node = self.create_node(key)?;
        self.attach(parent, node)
    }

    /// Detaches `id` and its subtree from the tree.
    ///
    /// The root cannot be deleted; replace it with [`set_root`](Self::set_root).
    pub fn delete_node(&mut self, id: NodeId) -> Result<BoxedNode<H>> {
        if id == self.root.id() {
            warn!(node = %id, "refusing to delete the root");
            return Err(StructureError::RootDetach(id).into());
        }
        let parent = self
            .parent_of(id)
            .ok_or(StructureError::NodeNotFound(id))?;
        let removed = self.detach(parent, id)?;
        self.forget(removed.as_ref());
        debug!(node = %id, parent = %parent, "deleted node");
        Ok(removed)
    }

    fn detach(&mut self, parent: NodeId, id: NodeId) -> Result<BoxedNode<H>> {
        let parent_node = self.node_mut(parent)?;
        let removed = parent_node
            .remove_child(id)?
            .ok_or(StructureError::NodeNotFound(id))?;
        self.restart_pass();
        Ok(removed)
    }

    /// Moves `child` (with its subtree) below `new_parent`.
    ///
    /// Does nothing when `new_parent` already is the parent. Leaves, full
    /// decorators and the child's own descendants are refused before
    /// anything is detached.
    pub fn set_new_parent(&mut self, child: NodeId, new_parent: NodeId) -> Result<()> {
        if child == self.root.id() {
            warn!(node = %child, "refusing to reparent the root");
            return Err(StructureError::RootDetach(child).into());
        }
        let current = self
            .parent_of(child)
            .ok_or(StructureError::NodeNotFound(child))?;
        if current == new_parent {
            return Ok(());
        }

        let target = self
            .find(new_parent)
            .ok_or(StructureError::NodeNotFound(new_parent))?;
        let refusal = match target.kind() {
            NodeKind::Leaf => Some(StructureError::LeafParent(new_parent)),
            NodeKind::Decorator if !target.children().is_empty() => {
                Some(StructureError::DecoratorOccupied(new_parent))
            }
            _ => None,
        };
        let refusal = refusal.or_else(|| {
            let subtree = self.find(child)?;
            node::find(subtree, new_parent).map(|_| StructureError::CyclicParent {
                child,
                parent: new_parent,
            })
        });
        if let Some(err) = refusal {
            warn!(child = %child, parent = %new_parent, error = %err, "reparent refused");
            return Err(err.into());
        }

        let moved = self.detach(current, child)?;
        let target = self.node_mut(new_parent)?;
        target.add_child(moved)?;
        self.restart_pass();
        debug!(node = %child, from = %current, to = %new_parent, "reparented node");
        Ok(())
    }

    /// Records an authoring-tool move of `id`.
    ///
    /// When the parent is a composite its children are re-sorted by their
    /// x position, left to right; a reordering restarts the pass.
    pub fn on_node_position_changed(&mut self, id: NodeId, position: Position) -> Result<()> {
        let default_name = self
            .find(id)
            .ok_or(StructureError::NodeNotFound(id))?
            .display_name()
            .to_owned();
        self.layout.set_position(id, position, &default_name);

        let Some(parent_id) = self.parent_of(id) else {
            return Ok(());
        };
        let layout = &self.layout;
        let parent = node::find_mut(self.root.as_mut(), parent_id)
            .ok_or(StructureError::NodeNotFound(parent_id))?;
        if parent.kind() != NodeKind::Composite {
            return Ok(());
        }

        let x_of = |n: &BoxedNode<H>| layout.position(n.id()).map_or(0.0, |p| p.x);
        let before: Vec<NodeId> = parent.children().iter().map(|c| c.id()).collect();
        parent
            .children_mut()
            .sort_by(|a, b| x_of(a).total_cmp(&x_of(b)));
        let reordered = parent
            .children()
            .iter()
            .map(|c| c.id())
            .ne(before.iter().copied());
        if reordered {
            self.restart_pass();
            debug!(parent = %parent_id, "children reordered by position");
        }
        Ok(())
    }

    /// Sets the display name persisted for `id`.
    pub fn rename_node(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        if self.find(id).is_none() {
            return Err(StructureError::NodeNotFound(id).into());
        }
        self.layout.set_name(id, name);
        Ok(())
    }

    fn forget(&mut self, subtree: &dyn Node<H>) {
        let layout = &mut self.layout;
        node::walk(subtree, &mut |n| {
            layout.remove(n.id());
        });
        if let Some(trace) = self.trace.as_mut() {
            trace.forget(subtree);
        }
    }

    /// Serializes topology, parameters and layout. Volatile state is omitted.
    pub fn serialize(&self) -> String {
        persist::serialize_tree(self.root.as_ref(), &self.layout)
    }

    /// Replaces the whole tree with the one described by `text`.
    ///
    /// Either the complete tree loads or the controller is left untouched.
    /// An empty `<Tree />` yields the default root.
    pub fn deserialize(&mut self, text: &str) -> Result<()> {
        let loaded = persist::deserialize_tree(text, &self.registry)?;
        self.root = loaded
            .root
            .unwrap_or_else(|| Self::default_root(self.root_loops));
        self.layout = loaded.layout;
        if let Some(trace) = self.trace.as_mut() {
            trace.force_clear();
        }
        self.last_status = None;
        debug!(root = %self.root.id(), "tree loaded");
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.serialize())?;
        debug!(path = %path.display(), "tree saved");
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.deserialize(&text)
    }
}
