use rand::Rng;
use strum::VariantArray;

use crate::env::Environment;

/// Observation bounds of the position axis
pub const POSITION_BOUNDS: (f64, f64) = (-1.2, 0.5);

/// Observation bounds of the velocity axis
pub const VELOCITY_BOUNDS: (f64, f64) = (-0.07, 0.07);

/// Actions for the [`MountainCar`] environment, representing full throttle
/// backward, coasting, and full throttle forward
#[derive(VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Pedal {
    Reverse,
    Coast,
    Forward,
}

impl Pedal {
    fn force(self) -> f64 {
        match self {
            Self::Reverse => -1.0,
            Self::Coast => 0.0,
            Self::Forward => 1.0,
        }
    }
}

/// The classic mountain car control task
///
/// An underpowered car in a valley must rock back and forth to build enough
/// momentum to reach the goal on the right hill. Reward is -1 per step until
/// the goal position is reached. One instance is one episode.
#[derive(Debug, Clone)]
pub struct MountainCar {
    position: f64,
    velocity: f64,
}

impl MountainCar {
    /// Start an episode at rest from a randomized position in `[-0.6, -0.4)`
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            position: rng.gen_range(-0.6..-0.4),
            velocity: 0.0,
        }
    }

    /// Start from an exact state, mainly for tests and value sampling
    pub fn at(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

impl Environment for MountainCar {
    type State = (f64, f64);
    type Action = Pedal;

    fn state(&self) -> Self::State {
        (self.position, self.velocity)
    }

    fn actions(&self) -> Vec<Self::Action> {
        Pedal::VARIANTS.to_vec()
    }

    fn step(&mut self, action: Self::Action) -> f64 {
        assert!(!self.is_terminal(), "step called on a terminal environment");

        self.velocity += 0.001 * action.force() - 0.0025 * (3.0 * self.position).cos();
        self.velocity = self.velocity.clamp(VELOCITY_BOUNDS.0, VELOCITY_BOUNDS.1);

        self.position += self.velocity;
        if self.position <= POSITION_BOUNDS.0 {
            // inelastic collision with the left wall
            self.position = POSITION_BOUNDS.0;
            self.velocity = 0.0;
        }

        if self.position >= POSITION_BOUNDS.1 {
            self.position = POSITION_BOUNDS.1;
            0.0
        } else {
            -1.0
        }
    }

    fn is_terminal(&self) -> bool {
        self.position >= POSITION_BOUNDS.1
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn starts_at_rest_in_the_valley() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let env = MountainCar::new(&mut rng);
            let (position, velocity) = env.state();
            assert!((-0.6..-0.4).contains(&position));
            assert_eq!(velocity, 0.0);
            assert!(!env.is_terminal());
        }
    }

    #[test]
    fn throttle_moves_the_car() {
        let mut env = MountainCar::at(-0.5, 0.0);
        assert_eq!(env.step(Pedal::Forward), -1.0);
        let (_, velocity) = env.state();
        assert!(velocity > 0.0, "forward throttle beats gravity near the valley floor");
    }

    #[test]
    fn left_wall_stops_the_car() {
        let mut env = MountainCar::at(-1.19, -0.07);
        env.step(Pedal::Reverse);
        assert_eq!(env.state(), (-1.2, 0.0), "inelastic collision");
    }

    #[test]
    fn reaching_the_goal_terminates_with_zero_reward() {
        let mut env = MountainCar::at(0.49, 0.07);
        assert_eq!(env.step(Pedal::Forward), 0.0);
        assert!(env.is_terminal());
        assert_eq!(env.state().0, POSITION_BOUNDS.1);
    }

    #[test]
    fn velocity_stays_bounded() {
        let mut env = MountainCar::at(-0.5, 0.069);
        for _ in 0..20 {
            if env.is_terminal() {
                break;
            }
            env.step(Pedal::Forward);
            let (_, velocity) = env.state();
            assert!((VELOCITY_BOUNDS.0..=VELOCITY_BOUNDS.1).contains(&velocity));
        }
    }
}
