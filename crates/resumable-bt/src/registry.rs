//! Name-to-constructor table for creating nodes by key.
//!
//! Deserialization looks up every element tag here, and authoring tools
//! create nodes through it. Hosts build the table once at startup: the
//! built-in composites and decorators plus their own leaf behaviors.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::behavior::{Behavior, LeafNode};
use crate::composite::{Composite, CompositeKind};
use crate::decorator::{Decorator, DecoratorKind};
use crate::error::RegistryError;
use crate::format::is_valid_tag;
use crate::node::BoxedNode;

type Constructor<H> = Arc<dyn Fn() -> BoxedNode<H> + Send + Sync>;

struct Registration<H> {
    constructor: Constructor<H>,
    menu_path: Option<String>,
}

/// Registry of node constructors keyed by type key.
///
/// Keys are unique; registering one twice is a configuration error.
pub struct NodeRegistry<H> {
    registrations: BTreeMap<String, Registration<H>>,
}

impl<H: 'static> NodeRegistry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: BTreeMap::new(),
        }
    }

    /// Creates a registry holding every built-in composite and decorator.
    ///
    /// Built-ins are listed under `Composite/...` and `Decorator/...` in
    /// [`menu_entries`](Self::menu_entries).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in CompositeKind::ALL {
            registry.insert_builtin(
                kind.key(),
                format!("Composite/{}", kind.display_name()),
                Arc::new(move || Box::new(Composite::new(kind)) as BoxedNode<H>),
            );
        }
        for kind in DecoratorKind::ALL {
            registry.insert_builtin(
                kind.key(),
                format!("Decorator/{}", kind.display_name()),
                Arc::new(move || Box::new(Decorator::new(kind)) as BoxedNode<H>),
            );
        }
        registry
    }

    fn insert_builtin(&mut self, key: &str, menu_path: String, constructor: Constructor<H>) {
        self.registrations.insert(
            key.to_owned(),
            Registration {
                constructor,
                menu_path: Some(menu_path),
            },
        );
    }

    /// Associates `key` with a node constructor.
    ///
    /// The constructor must build nodes whose [`type_key`] equals `key`;
    /// [`create`](Self::create) checks this.
    ///
    /// [`type_key`]: crate::Node::type_key
    pub fn register<F>(&mut self, key: &str, constructor: F) -> Result<(), RegistryError>
    where
        F: Fn() -> BoxedNode<H> + Send + Sync + 'static,
    {
        if !is_valid_tag(key) {
            return Err(RegistryError::InvalidKey(key.to_owned()));
        }
        if self.registrations.contains_key(key) {
            return Err(RegistryError::Duplicate(key.to_owned()));
        }
        self.registrations.insert(
            key.to_owned(),
            Registration {
                constructor: Arc::new(constructor),
                menu_path: None,
            },
        );
        debug!(key, "registered node type");
        Ok(())
    }

    /// Registers a leaf behavior under `key`.
    pub fn register_leaf<B, F>(&mut self, key: &str, constructor: F) -> Result<(), RegistryError>
    where
        B: Behavior<H> + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let leaf_key = key.to_owned();
        self.register(key, move || {
            Box::new(LeafNode::new(leaf_key.clone(), constructor())) as BoxedNode<H>
        })
    }

    /// Sets the authoring-menu path shown for `key`, e.g. `"Leaf/Shoot"`.
    pub fn set_menu_path(&mut self, key: &str, menu_path: impl Into<String>) -> Result<(), RegistryError> {
        let registration = self
            .registrations
            .get_mut(key)
            .ok_or_else(|| RegistryError::NotRegistered(key.to_owned()))?;
        registration.menu_path = Some(menu_path.into());
        Ok(())
    }

    /// Builds a new node of type `key`.
    pub fn create(&self, key: &str) -> Result<BoxedNode<H>, RegistryError> {
        let registration = self
            .registrations
            .get(key)
            .ok_or_else(|| RegistryError::NotRegistered(key.to_owned()))?;
        let node = (registration.constructor)();
        if node.type_key() != key {
            return Err(RegistryError::KeyMismatch {
                registered: key.to_owned(),
                produced: node.type_key().to_owned(),
            });
        }
        Ok(node)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registrations.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.registrations.keys().map(String::as_str)
    }

    /// `(key, menu path)` pairs for every type that has a menu path.
    pub fn menu_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.registrations
            .iter()
            .filter_map(|(key, r)| r.menu_path.as_deref().map(|path| (key.as_str(), path)))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl<H: 'static> Default for NodeRegistry<H> {
    fn default() -> Self {
        Self::with_builtins()
    }
}
