use rand::Rng;

use crate::{
    decay::{self, Decay},
    error::{check_positive_upto, ConfigError},
};

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy exploration policy with a time-decaying epsilon threshold
///
/// The random source is threaded in explicitly so a seeded generator makes
/// the whole exploration sequence reproducible.
#[derive(Debug)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Invoke epsilon greedy policy for the current episode
    pub fn choose<R: Rng>(&self, rng: &mut R, episode: u32) -> Choice {
        let epsilon = self.epsilon.evaluate(episode as f64);
        if rng.gen::<f64>() > epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}

impl EpsilonGreedy<decay::Constant> {
    /// Initialize epsilon greedy policy with a fixed exploration rate in `(0, 1]`
    ///
    /// A rate of zero would make the exploration branch unreachable, so it is
    /// rejected at construction.
    pub fn constant(epsilon: f64) -> Result<Self, ConfigError> {
        check_positive_upto("epsilon", epsilon, 1.0)?;
        Ok(Self::new(decay::Constant::new(epsilon)))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn epsilon_one_always_explores() {
        let policy = EpsilonGreedy::constant(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for episode in 0..100 {
            assert_eq!(policy.choose(&mut rng, episode), Choice::Explore);
        }
    }

    #[test]
    fn epsilon_zero_is_rejected() {
        assert!(EpsilonGreedy::constant(0.0).is_err());
        assert!(EpsilonGreedy::constant(1.5).is_err());
        assert!(EpsilonGreedy::constant(-0.1).is_err());
    }

    #[test]
    fn seeded_choices_are_reproducible() {
        let policy = EpsilonGreedy::constant(0.5).unwrap();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..32).map(|t| policy.choose(&mut rng, t)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
