use std::hash::Hash;

use rand::rngs::StdRng;

use crate::{
    approx::WeightTable,
    decay::{self, Decay},
    env::Environment,
    error::{check_interval, check_positive_upto, ConfigError},
    exploration::EpsilonGreedy,
    tiles::{FeatureEncoder, Features},
};

/// Configuration for the [`QLearning`] agent
pub struct QLearningConfig<D: Decay = decay::Constant> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f64,
    pub gamma: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.05).unwrap(),
            alpha: 0.0125,
            gamma: 1.0,
        }
    }
}

/// Off-policy TD control over a linear approximator
///
/// The behavior policy may explore, but the bootstrap target always uses the
/// greedy value of the next observation, independent of the action the
/// behavior policy goes on to take.
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
/// - `X` - The [`FeatureEncoder`] mapping states to sparse features
/// - `D` - The [`Decay`] strategy for the exploration rate
#[derive(Debug)]
pub struct QLearning<E, X, D = decay::Constant>
where
    E: Environment,
    E::Action: Eq + Hash,
    X: FeatureEncoder<E::State>,
    D: Decay,
{
    weights: WeightTable<E::Action>,
    encoder: X,
    exploration: EpsilonGreedy<D>,
    alpha: f64, // learning rate
    gamma: f64, // discount factor
    episode: u32,
    rng: StdRng,
}

impl<E, X, D> QLearning<E, X, D>
where
    E: Environment,
    E::Action: Eq + Hash,
    X: FeatureEncoder<E::State>,
    D: Decay,
{
    /// Initialize a new `QLearning` agent
    ///
    /// The weight table must match the encoder's feature length. The random
    /// generator is owned by the agent; seed it for reproducible runs.
    pub fn new(
        config: QLearningConfig<D>,
        encoder: X,
        weights: WeightTable<E::Action>,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        check_positive_upto("alpha", config.alpha, 1.0)?;
        check_interval("gamma", config.gamma, 0.0, 1.0)?;
        if weights.num_features() != encoder.num_features() {
            return Err(ConfigError::MismatchedLengths {
                expected: encoder.num_features(),
                found: weights.num_features(),
            });
        }
        Ok(Self {
            weights,
            encoder,
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
            rng,
        })
    }

    pub fn weights(&self) -> &WeightTable<E::Action> {
        &self.weights
    }

    pub fn into_weights(self) -> WeightTable<E::Action> {
        self.weights
    }

    fn act(&mut self, features: &Features, actions: &[E::Action]) -> E::Action {
        self.weights
            .epsilon_greedy(&mut self.rng, &self.exploration, self.episode, features, actions)
    }

    /// Run one episode on a fresh environment instance
    pub fn go(&mut self, mut env: E) {
        let mut features = self.encoder.encode(&env.state());

        while !env.is_terminal() {
            let action = self.act(&features, &env.actions());
            let reward = env.step(action);
            let estimate = self.weights.value(&features, action);

            if env.is_terminal() {
                self.weights
                    .bump(action, &features, self.alpha * (reward - estimate));
                break;
            }

            let next_features = self.encoder.encode(&env.state());
            let target =
                reward + self.gamma * self.weights.max_value(&next_features, &env.actions());
            self.weights
                .bump(action, &features, self.alpha * (target - estimate));

            features = next_features;
        }

        self.episode += 1;
    }
}
