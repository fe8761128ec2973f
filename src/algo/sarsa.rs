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

/// Configuration for the [`Sarsa`] agent
pub struct SarsaConfig<D: Decay = decay::Constant> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f64,
    pub gamma: f64,
}

impl Default for SarsaConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.05).unwrap(),
            alpha: 0.0125,
            gamma: 1.0,
        }
    }
}

/// On-policy TD control over a linear approximator
///
/// The bootstrap target uses the value of the action the behavior policy
/// actually selects for the next observation. That action is fixed once and
/// reused as the action taken in the following iteration.
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
/// - `X` - The [`FeatureEncoder`] mapping states to sparse features
/// - `D` - The [`Decay`] strategy for the exploration rate
pub struct Sarsa<E, X, D = decay::Constant>
where
    E: Environment,
    E::Action: Eq + Hash,
    X: FeatureEncoder<E::State>,
    D: Decay,
{
    weights: WeightTable<E::Action>,
    encoder: X,
    exploration: EpsilonGreedy<D>,
    alpha: f64,
    gamma: f64,
    episode: u32,
    rng: StdRng,
}

impl<E, X, D> Sarsa<E, X, D>
where
    E: Environment,
    E::Action: Eq + Hash,
    X: FeatureEncoder<E::State>,
    D: Decay,
{
    /// Initialize a new `Sarsa` agent
    pub fn new(
        config: SarsaConfig<D>,
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
        let mut action = self.act(&features, &env.actions());

        while !env.is_terminal() {
            let reward = env.step(action);
            let estimate = self.weights.value(&features, action);

            if env.is_terminal() {
                self.weights
                    .bump(action, &features, self.alpha * (reward - estimate));
                break;
            }

            let next_features = self.encoder.encode(&env.state());
            let next_action = self.act(&next_features, &env.actions());
            let target = reward + self.gamma * self.weights.value(&next_features, next_action);
            self.weights
                .bump(action, &features, self.alpha * (target - estimate));

            features = next_features;
            action = next_action;
        }

        self.episode += 1;
    }
}
