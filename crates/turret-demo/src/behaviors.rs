//! Turret leaf behaviors.
//!
//! Leaves only read the [`Arena`]; everything they produce goes to the
//! blackboard under the keys below.

use rand::Rng;
use resumable_bt::{Behavior, BehaviorError, NodeRegistry, RegistryError, Status, TickContext};
use tracing::{debug, info};

use crate::arena::{Arena, angle_delta};

/// Last known player position (`Vec3`), present while the player is in range.
pub const TARGET: &str = "target";
/// Current turret heading in degrees (`Float`).
pub const HEADING: &str = "heading";
/// Number of shots fired (`Int`).
pub const SHOTS: &str = "shots";

fn arena<'a>(ctx: &TickContext<'a, Arena>) -> Result<&'a Arena, BehaviorError> {
    ctx.host().ok_or_else(|| "no arena attached to the turret tree".into())
}

fn heading(ctx: &TickContext<'_, Arena>) -> f32 {
    ctx.blackboard().get_float(HEADING).unwrap_or(0.0) as f32
}

/// Succeeds while the player is within detection range.
pub struct IsPlayerAround;

impl Behavior<Arena> for IsPlayerAround {
    fn process(&mut self, ctx: &mut TickContext<'_, Arena>) -> Result<Status, BehaviorError> {
        let arena = arena(ctx)?;
        if arena.player_in_range() {
            ctx.blackboard_mut().set(TARGET, arena.player);
            Ok(Status::Success)
        } else {
            ctx.blackboard_mut().remove(TARGET);
            Ok(Status::Failure)
        }
    }
}

/// Turns toward the target at a bounded rate; runs until aligned.
pub struct RotateTowardsPlayer {
    /// Degrees per tick.
    pub turn_rate: f32,
    /// Degrees off target still counted as aligned.
    pub tolerance: f32,
    turns: u32,
}

impl Default for RotateTowardsPlayer {
    fn default() -> Self {
        Self {
            turn_rate: 30.0,
            tolerance: 2.0,
            turns: 0,
        }
    }
}

impl Behavior<Arena> for RotateTowardsPlayer {
    fn initialize(&mut self, _ctx: &mut TickContext<'_, Arena>) {
        self.turns = 0;
    }

    fn process(&mut self, ctx: &mut TickContext<'_, Arena>) -> Result<Status, BehaviorError> {
        let arena = arena(ctx)?;
        let Some(target) = ctx.blackboard().get_vec3(TARGET) else {
            return Ok(Status::Failure);
        };

        let current = heading(ctx);
        let delta = angle_delta(current, arena.bearing_to(target));
        let step = delta.clamp(-self.turn_rate, self.turn_rate);
        ctx.blackboard_mut().set(HEADING, f64::from(current + step));
        self.turns += 1;

        if (delta - step).abs() <= self.tolerance {
            debug!(turns = self.turns, "turret aligned");
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.turns = 0;
    }
}

/// Fires one shot at the target.
pub struct Shoot;

impl Behavior<Arena> for Shoot {
    fn process(&mut self, ctx: &mut TickContext<'_, Arena>) -> Result<Status, BehaviorError> {
        let shots = ctx.blackboard().get_int(SHOTS).unwrap_or(0) + 1;
        ctx.blackboard_mut().set(SHOTS, shots);
        info!(shots, heading = heading(ctx), "turret fired");
        Ok(Status::Success)
    }
}

/// Sweeps the turret by a random angle while idle.
pub struct Scan {
    pub sweep: f32,
}

impl Default for Scan {
    fn default() -> Self {
        Self { sweep: 45.0 }
    }
}

impl Behavior<Arena> for Scan {
    fn process(&mut self, ctx: &mut TickContext<'_, Arena>) -> Result<Status, BehaviorError> {
        let turn = ctx.rng().gen_range(-self.sweep..=self.sweep);
        let next = angle_delta(0.0, heading(ctx) + turn);
        ctx.blackboard_mut().set(HEADING, f64::from(next));
        Ok(Status::Success)
    }
}

/// Registers the turret leaves, listed under `Leaf/...` in authoring menus.
pub fn register(registry: &mut NodeRegistry<Arena>) -> Result<(), RegistryError> {
    registry.register_leaf("IsPlayerAround", || IsPlayerAround)?;
    registry.register_leaf("RotateTowardsPlayer", RotateTowardsPlayer::default)?;
    registry.register_leaf("Shoot", || Shoot)?;
    registry.register_leaf("Scan", Scan::default)?;
    for key in ["IsPlayerAround", "RotateTowardsPlayer", "Shoot", "Scan"] {
        registry.set_menu_path(key, format!("Leaf/{key}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use resumable_bt::Blackboard;

    use super::*;

    struct Bench {
        board: Blackboard,
        arena: Arena,
        rng: StdRng,
    }

    impl Bench {
        fn new(player: [f32; 3]) -> Self {
            let mut arena = Arena::new(10.0);
            arena.player = player;
            Self {
                board: Blackboard::new(),
                arena,
                rng: StdRng::seed_from_u64(5),
            }
        }

        fn run(&mut self, behavior: &mut impl Behavior<Arena>) -> Status {
            let mut ctx = TickContext::new(&mut self.board, Some(&self.arena), &mut self.rng);
            behavior.initialize(&mut ctx);
            behavior.process(&mut ctx).unwrap()
        }
    }

    #[test]
    fn detection_writes_target() {
        let mut bench = Bench::new([3.0, 0.0, 4.0]);
        assert_eq!(bench.run(&mut IsPlayerAround), Status::Success);
        assert_eq!(bench.board.get_vec3(TARGET), Some([3.0, 0.0, 4.0]));

        bench.arena.player = [30.0, 0.0, 0.0];
        assert_eq!(bench.run(&mut IsPlayerAround), Status::Failure);
        assert!(!bench.board.contains(TARGET));
    }

    #[test]
    fn rotation_runs_until_aligned() {
        let mut bench = Bench::new([5.0, 0.0, 0.0]);
        bench.board.set(TARGET, [5.0_f32, 0.0, 0.0]);
        let mut rotate = RotateTowardsPlayer::default();

        let statuses: Vec<_> = (0..3).map(|_| bench.run(&mut rotate)).collect();

        assert_eq!(statuses, [Status::Running, Status::Running, Status::Success]);
        let heading = bench.board.get_float(HEADING).unwrap();
        assert!((heading - 90.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_without_target_fails() {
        let mut bench = Bench::new([5.0, 0.0, 0.0]);
        assert_eq!(bench.run(&mut RotateTowardsPlayer::default()), Status::Failure);
    }

    #[test]
    fn shooting_counts_shots() {
        let mut bench = Bench::new([0.0; 3]);
        bench.run(&mut Shoot);
        bench.run(&mut Shoot);
        assert_eq!(bench.board.get_int(SHOTS), Some(2));
    }

    #[test]
    fn missing_arena_is_a_fault() {
        let mut board = Blackboard::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TickContext::<Arena>::new(&mut board, None, &mut rng);

        assert!(IsPlayerAround.process(&mut ctx).is_err());
    }
}
