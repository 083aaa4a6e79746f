//! Host state the turret tree reads while ticking.

use rand::Rng;

/// Half extent of the square the player wanders in.
const BOUNDS: f32 = 20.0;
const STRIDE: f32 = 1.5;

/// A turret fixed at the origin and a player wandering around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub turret: [f32; 3],
    pub player: [f32; 3],
    pub detection_radius: f32,
}

impl Arena {
    pub fn new(detection_radius: f32) -> Self {
        Self {
            turret: [0.0; 3],
            player: [BOUNDS, 0.0, BOUNDS],
            detection_radius,
        }
    }

    /// Horizontal distance from the turret to `point`.
    pub fn distance_to(&self, point: [f32; 3]) -> f32 {
        let dx = point[0] - self.turret[0];
        let dz = point[2] - self.turret[2];
        dx.hypot(dz)
    }

    /// Heading in degrees from the turret to `point`, in `(-180, 180]`.
    pub fn bearing_to(&self, point: [f32; 3]) -> f32 {
        let dx = point[0] - self.turret[0];
        let dz = point[2] - self.turret[2];
        dx.atan2(dz).to_degrees()
    }

    pub fn player_in_range(&self) -> bool {
        self.distance_to(self.player) <= self.detection_radius
    }

    /// Moves the player one random stride on the ground plane.
    pub fn step(&mut self, rng: &mut impl Rng) {
        for axis in [0, 2] {
            let moved = self.player[axis] + rng.gen_range(-STRIDE..=STRIDE);
            self.player[axis] = moved.clamp(-BOUNDS, BOUNDS);
        }
    }
}

/// Signed smallest rotation from `from` to `to`, in degrees.
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn bearing_and_distance() {
        let arena = Arena::new(10.0);

        assert_eq!(arena.distance_to([3.0, 7.0, 4.0]), 5.0);
        assert_eq!(arena.bearing_to([0.0, 0.0, 5.0]), 0.0);
        assert!((arena.bearing_to([5.0, 0.0, 0.0]) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn angle_delta_takes_the_short_way() {
        assert_eq!(angle_delta(170.0, -170.0), 20.0);
        assert_eq!(angle_delta(-170.0, 170.0), -20.0);
        assert_eq!(angle_delta(0.0, 90.0), 90.0);
    }

    #[test]
    fn player_stays_in_bounds() {
        let mut arena = Arena::new(10.0);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            arena.step(&mut rng);
            assert!(arena.player[0].abs() <= BOUNDS);
            assert!(arena.player[2].abs() <= BOUNDS);
        }
    }
}
