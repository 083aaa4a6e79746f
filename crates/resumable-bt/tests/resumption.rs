mod common;

use common::{Journal, controller, scripted};
use resumable_bt::builder::{random_sequence, repeater, selector, sequence};
use resumable_bt::{
    Behavior, BehaviorError, FnBehavior, LeafNode, Node, Status, TickContext, TreeError,
};

use Status::{Failure, Running, Success};

#[test]
fn sequence_resumes_at_running_child() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    ctl.set_root(sequence(vec![
        scripted("A", &[Success], &journal),
        scripted("B", &[Running, Running, Success], &journal),
        scripted("C", &[Success], &journal),
    ]));

    assert_eq!(ctl.tick().unwrap(), Running);
    assert_eq!(journal.take(), ["init A", "process A", "init B", "process B"]);

    // Suspended pass: no re-initialization, completed work is not redone
    assert_eq!(ctl.tick().unwrap(), Running);
    assert_eq!(journal.take(), ["process B"]);

    assert_eq!(ctl.tick().unwrap(), Success);
    assert_eq!(journal.take(), ["process B", "init C", "process C"]);

    // A fresh pass starts over from the first child
    assert_eq!(ctl.tick().unwrap(), Success);
    assert_eq!(journal.count("process A"), 1);
}

#[test]
fn selector_resumes_and_short_circuits() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    ctl.set_root(selector(vec![
        scripted("A", &[Failure], &journal),
        scripted("B", &[Running, Success], &journal),
        scripted("C", &[Success], &journal),
    ]));

    assert_eq!(ctl.tick().unwrap(), Running);
    assert_eq!(ctl.tick().unwrap(), Success);

    let entries = journal.entries();
    assert_eq!(entries.iter().filter(|e| *e == "process A").count(), 1);
    assert!(!entries.iter().any(|e| e.ends_with(" C")));
}

#[test]
fn nested_composites_resume_innermost_branch() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    ctl.set_root(sequence(vec![
        scripted("A", &[Success], &journal),
        selector(vec![
            scripted("B", &[Failure], &journal),
            scripted("C", &[Running, Success], &journal),
        ]),
        scripted("D", &[Success], &journal),
    ]));

    assert_eq!(ctl.tick().unwrap(), Running);
    journal.take();

    assert_eq!(ctl.tick().unwrap(), Success);
    assert_eq!(journal.take(), ["process C", "init D", "process D"]);
}

#[test]
fn repeater_succeeds_on_every_third_call() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    ctl.set_root(repeater(3, scripted("A", &[Success], &journal)));

    let statuses: Vec<_> = (0..4).map(|_| ctl.tick().unwrap()).collect();

    assert_eq!(statuses, [Running, Running, Success, Running]);
    assert_eq!(journal.count("process A"), 4);
}

#[test]
fn random_sequence_visits_each_child_once_per_pass() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    let labels = ["A", "B", "C", "D", "E"];
    ctl.set_root(random_sequence(
        labels.iter().map(|l| scripted(l, &[Success], &journal)).collect(),
    ));

    for _ in 0..3 {
        assert_eq!(ctl.tick().unwrap(), Success);
        let mut processed: Vec<_> = journal
            .take()
            .into_iter()
            .filter_map(|e| e.strip_prefix("process ").map(str::to_owned))
            .collect();
        processed.sort();
        assert_eq!(processed, labels);
    }
}

#[test]
fn random_order_is_reproducible_with_the_same_seed() {
    let run = || {
        let journal = Journal::default();
        let mut ctl = controller(&journal);
        ctl.set_root(random_sequence(
            ["A", "B", "C", "D", "E", "F"]
                .iter()
                .map(|l| scripted(l, &[Success], &journal))
                .collect(),
        ));
        for _ in 0..4 {
            ctl.tick().unwrap();
        }
        journal.entries()
    };

    assert_eq!(run(), run());
}

#[test]
fn random_sequence_keeps_order_while_suspended() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    ctl.set_root(random_sequence(vec![
        scripted("A", &[Running, Running, Success], &journal),
        scripted("B", &[Running, Running, Success], &journal),
        scripted("C", &[Running, Running, Success], &journal),
    ]));

    assert_eq!(ctl.tick().unwrap(), Running);
    let first = journal.take();
    // The first child in shuffled order is primed before it is processed
    let label = first[0].strip_prefix("init ").unwrap().to_owned();
    assert_eq!(first, [format!("init {label}"), format!("process {label}")]);

    assert_eq!(ctl.tick().unwrap(), Running);
    assert_eq!(journal.take(), [format!("process {label}")]);
}

#[test]
fn leaf_fault_aborts_the_tick() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    let faulty = LeafNode::new(
        "Faulty",
        FnBehavior(|_: &mut TickContext<'_, ()>| -> Result<Status, BehaviorError> {
            Err("sensor offline".into())
        }),
    );
    ctl.set_root(selector(vec![
        Box::new(faulty),
        scripted("Fallback", &[Success], &journal),
    ]));

    let err = ctl.tick().unwrap_err();

    assert!(matches!(err, TreeError::Behavior { .. }));
    assert_eq!(ctl.tick_count(), 0);
    assert_eq!(ctl.last_status(), None);
    // Faults are never treated as failure, so the selector did not fall back
    assert_eq!(journal.count("process Fallback"), 0);
}

/// Runs on its first call, faults on its second, then succeeds.
struct JamsOnce {
    calls: u32,
    journal: Journal,
}

impl Behavior<()> for JamsOnce {
    fn initialize(&mut self, _ctx: &mut TickContext<'_, ()>) {
        self.journal.push("init Jam".to_owned());
    }

    fn process(&mut self, _ctx: &mut TickContext<'_, ()>) -> Result<Status, BehaviorError> {
        self.journal.push("process Jam".to_owned());
        self.calls += 1;
        match self.calls {
            1 => Ok(Running),
            2 => Err("feeder jammed".into()),
            _ => Ok(Success),
        }
    }
}

#[test]
fn tick_after_a_fault_starts_a_fresh_pass() {
    let journal = Journal::default();
    let mut ctl = controller(&journal);
    let jam = JamsOnce {
        calls: 0,
        journal: journal.clone(),
    };
    ctl.set_root(sequence(vec![
        scripted("A", &[Success], &journal),
        Box::new(LeafNode::new("Jam", jam)),
    ]));

    assert_eq!(ctl.tick().unwrap(), Running);
    assert!(ctl.tick().is_err());
    assert!(!ctl.root().is_in_progress());

    journal.take();
    assert_eq!(ctl.tick().unwrap(), Success);
    assert_eq!(
        journal.take(),
        ["init A", "process A", "init Jam", "process Jam"]
    );
}
