//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use resumable_bt::{
    Behavior, BehaviorError, BoxedNode, LeafNode, NodeRegistry, Status, TickContext, TreeConfig,
    TreeController,
};

/// Ordered record of leaf lifecycle calls, e.g. `"init A"`, `"process A"`.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

/// Leaf replaying a status script; the last status repeats forever.
pub struct Scripted {
    label: String,
    script: Vec<Status>,
    next: usize,
    journal: Journal,
}

impl Scripted {
    pub fn new(label: &str, script: &[Status], journal: &Journal) -> Self {
        Self {
            label: label.to_owned(),
            script: script.to_vec(),
            next: 0,
            journal: journal.clone(),
        }
    }
}

impl<H> Behavior<H> for Scripted {
    fn initialize(&mut self, _ctx: &mut TickContext<'_, H>) {
        self.journal.push(format!("init {}", self.label));
    }

    fn process(&mut self, _ctx: &mut TickContext<'_, H>) -> Result<Status, BehaviorError> {
        self.journal.push(format!("process {}", self.label));
        let status = self.script[self.next.min(self.script.len() - 1)];
        self.next += 1;
        Ok(status)
    }
}

pub fn scripted(label: &str, script: &[Status], journal: &Journal) -> BoxedNode<()> {
    Box::new(LeafNode::new(label, Scripted::new(label, script, journal)))
}

/// Built-ins plus `Check` (always succeeds), `Shoot` (always succeeds) and
/// `Wait` (runs for one tick, then succeeds), all journaled.
pub fn registry(journal: &Journal) -> NodeRegistry<()> {
    let mut registry = NodeRegistry::with_builtins();
    for (key, script) in [
        ("Check", &[Status::Success][..]),
        ("Shoot", &[Status::Success][..]),
        ("Wait", &[Status::Running, Status::Success][..]),
    ] {
        let journal = journal.clone();
        registry
            .register_leaf(key, move || Scripted::new(key, script, &journal))
            .unwrap();
    }
    registry
}

pub fn controller(journal: &Journal) -> TreeController<()> {
    let config = TreeConfig {
        seed: Some(11),
        ..TreeConfig::default()
    };
    TreeController::from_config(Arc::new(registry(journal)), &config)
}
