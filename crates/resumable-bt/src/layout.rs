//! Presentation side-table: display names and authoring positions.
//!
//! The engine never reads this while ticking. It is persisted with the
//! tree so authoring tools get their layout back after a load.

use std::collections::HashMap;

use crate::node::NodeId;

/// Authoring-tool position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    entries: HashMap<NodeId, NodeLayout>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeLayout> {
        self.entries.get(&id)
    }

    pub fn insert(&mut self, id: NodeId, layout: NodeLayout) {
        self.entries.insert(id, layout);
    }

    pub fn remove(&mut self, id: NodeId) -> Option<NodeLayout> {
        self.entries.remove(&id)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|l| l.name.as_str())
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.get(id).map(|l| l.position)
    }

    /// Renames a node, placing it at the origin when it has no entry yet.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        let name = name.into();
        match self.entries.get_mut(&id) {
            Some(layout) => layout.name = name,
            None => {
                self.entries.insert(
                    id,
                    NodeLayout {
                        name,
                        position: Position::default(),
                    },
                );
            }
        }
    }

    /// Moves a node; `default_name` names the entry when none exists.
    pub fn set_position(&mut self, id: NodeId, position: Position, default_name: &str) {
        self.entries
            .entry(id)
            .and_modify(|l| l.position = position)
            .or_insert_with(|| NodeLayout {
                name: default_name.to_owned(),
                position,
            });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
