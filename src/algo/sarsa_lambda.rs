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

/// Configuration for the [`SarsaLambda`] agent
pub struct SarsaLambdaConfig<D: Decay = decay::Constant> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f64,
    pub gamma: f64,
    pub lambda: f64,
}

impl Default for SarsaLambdaConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.05).unwrap(),
            alpha: 0.0125,
            gamma: 1.0,
            lambda: 0.6,
        }
    }
}

/// On-policy TD control with accumulating eligibility traces
///
/// One trace accumulator per feature dimension, scoped to a single episode.
/// Each step runs in a fixed order: the TD error against the current
/// estimate, a trace bump at the active features, the bootstrap term, a dense
/// weight update scaled by the traces, and finally the trace decay. Swapping
/// that order changes credit assignment.
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
/// - `X` - The [`FeatureEncoder`] mapping states to sparse features
/// - `D` - The [`Decay`] strategy for the exploration rate
pub struct SarsaLambda<E, X, D = decay::Constant>
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
    lambda: f64, // trace decay
    episode: u32,
    rng: StdRng,
}

impl<E, X, D> SarsaLambda<E, X, D>
where
    E: Environment,
    E::Action: Eq + Hash,
    X: FeatureEncoder<E::State>,
    D: Decay,
{
    /// Initialize a new `SarsaLambda` agent
    pub fn new(
        config: SarsaLambdaConfig<D>,
        encoder: X,
        weights: WeightTable<E::Action>,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        check_positive_upto("alpha", config.alpha, 1.0)?;
        check_interval("gamma", config.gamma, 0.0, 1.0)?;
        check_interval("lambda", config.lambda, 0.0, 1.0)?;
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
            lambda: config.lambda,
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
        let mut traces = vec![0.0; self.weights.num_features()];

        while !env.is_terminal() {
            let reward = env.step(action);
            let mut delta = reward - self.weights.value(&features, action);

            // accumulating traces: no upper clamp, a revisited feature can
            // transiently exceed 1
            for &i in features.active() {
                traces[i] += 1.0;
            }

            if env.is_terminal() {
                self.weights
                    .apply_traces(action, &traces, self.alpha * delta);
                break;
            }

            let next_features = self.encoder.encode(&env.state());
            let next_action = self.act(&next_features, &env.actions());
            delta += self.gamma * self.weights.value(&next_features, next_action);

            self.weights
                .apply_traces(action, &traces, self.alpha * delta);
            for z in traces.iter_mut() {
                *z *= self.gamma * self.lambda;
            }

            features = next_features;
            action = next_action;
        }

        self.episode += 1;
    }
}
