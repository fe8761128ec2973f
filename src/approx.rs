use std::{collections::HashMap, hash::Hash};

use rand::{seq::SliceRandom, Rng};

use crate::{
    decay::Decay,
    error::ConfigError,
    exploration::{Choice, EpsilonGreedy},
    tiles::Features,
};

/// Per-action dense weight vectors over a shared feature space
///
/// Exactly one task owns and mutates a table at a time; every other task
/// reads it through a deep copy produced by [`Clone`]. Publishing a clone is
/// the only synchronization the training pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable<A>
where
    A: Copy + Eq + Hash,
{
    weights: HashMap<A, Vec<f64>>,
    num_features: usize,
}

impl<A> WeightTable<A>
where
    A: Copy + Eq + Hash,
{
    /// Initialize a zeroed vector for each action
    pub fn zeros(actions: &[A], num_features: usize) -> Result<Self, ConfigError> {
        if actions.is_empty() {
            return Err(ConfigError::Zero { name: "actions" });
        }
        if num_features == 0 {
            return Err(ConfigError::Zero { name: "num_features" });
        }
        Ok(Self {
            weights: actions
                .iter()
                .map(|&a| (a, vec![0.0; num_features]))
                .collect(),
            num_features,
        })
    }

    /// Construct a table from existing vectors, e.g. to resume training
    ///
    /// Fails unless every action's vector shares one nonzero length.
    pub fn from_vectors(weights: HashMap<A, Vec<f64>>) -> Result<Self, ConfigError> {
        let Some(num_features) = weights.values().next().map(Vec::len) else {
            return Err(ConfigError::Zero { name: "actions" });
        };
        if num_features == 0 {
            return Err(ConfigError::Zero { name: "num_features" });
        }
        for v in weights.values() {
            if v.len() != num_features {
                return Err(ConfigError::MismatchedLengths {
                    expected: num_features,
                    found: v.len(),
                });
            }
        }
        Ok(Self {
            weights,
            num_features,
        })
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// The dense weight vector for an action
    ///
    /// **Panics** on an action the table was not built with; that is an
    /// interface precondition violation.
    pub fn vector(&self, action: A) -> &[f64] {
        self.weights
            .get(&action)
            .expect("action was registered when the table was built")
    }

    /// Estimated value of `action` at the given features
    ///
    /// Runs in time proportional to the number of active features.
    pub fn value(&self, features: &Features, action: A) -> f64 {
        debug_assert_eq!(features.len(), self.num_features);
        let ws = self.vector(action);
        features.active().iter().map(|&i| ws[i]).sum()
    }

    /// Maximum estimated value over a non-empty candidate action set
    pub fn max_value(&self, features: &Features, actions: &[A]) -> f64 {
        let (first, rest) = actions
            .split_first()
            .expect("There is always at least one action available");
        rest.iter().fold(self.value(features, *first), |max, &a| {
            max.max(self.value(features, a))
        })
    }

    /// The action with the highest estimated value
    ///
    /// The candidate set is scanned in a random order and the first strict
    /// maximum wins, so ties do not always break toward the same action.
    pub fn greedy<R: Rng>(&self, rng: &mut R, features: &Features, actions: &[A]) -> A {
        let mut order = actions.to_vec();
        order.shuffle(rng);

        let (first, rest) = order
            .split_first()
            .expect("There is always at least one action available");
        let mut best = *first;
        let mut best_value = self.value(features, best);
        for &a in rest {
            let value = self.value(features, a);
            if value > best_value {
                best = a;
                best_value = value;
            }
        }
        best
    }

    /// Epsilon greedy action selection: explore uniformly at random, or
    /// defer to [`greedy`](Self::greedy)
    pub fn epsilon_greedy<R: Rng, D: Decay>(
        &self,
        rng: &mut R,
        policy: &EpsilonGreedy<D>,
        episode: u32,
        features: &Features,
        actions: &[A],
    ) -> A {
        match policy.choose(rng, episode) {
            Choice::Explore => *actions
                .choose(rng)
                .expect("There is always at least one action available"),
            Choice::Exploit => self.greedy(rng, features, actions),
        }
    }

    /// Add `step` to the action's weight at every active feature
    pub fn bump(&mut self, action: A, features: &Features, step: f64) {
        debug_assert_eq!(features.len(), self.num_features);
        let ws = self
            .weights
            .get_mut(&action)
            .expect("action was registered when the table was built");
        for &i in features.active() {
            ws[i] += step;
        }
    }

    /// Add `scale * traces[i]` to the action's weight at every feature
    pub fn apply_traces(&mut self, action: A, traces: &[f64], scale: f64) {
        debug_assert_eq!(traces.len(), self.num_features);
        let ws = self
            .weights
            .get_mut(&action)
            .expect("action was registered when the table was built");
        for (w, z) in ws.iter_mut().zip(traces) {
            *w += scale * z;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::tiles::{FeatureEncoder, TileCoder};

    use super::*;

    #[test]
    fn value_sums_active_weights() {
        // hand-built 2-tiling, resolution-2 encoder; (0.5, 0.5) activates
        // indices 4 and 13
        let coder = TileCoder::new(2, 2, (0.0, 1.0), (0.0, 1.0)).unwrap();
        let features = coder.encode(&(0.5, 0.5));
        assert_eq!(features.active(), [4, 13]);

        let mut vectors = HashMap::new();
        let mut ws = vec![0.0; coder.num_features()];
        ws[4] = 1.5;
        ws[13] = -0.25;
        ws[7] = 100.0; // inactive, must not contribute
        vectors.insert(0usize, ws);
        let table = WeightTable::from_vectors(vectors).unwrap();

        assert_eq!(table.value(&features, 0), 1.25);
    }

    #[test]
    fn zeroed_table_values_are_zero() {
        let coder = TileCoder::new(1, 1, (-1.2, 0.5), (-0.07, 0.07)).unwrap();
        let table = WeightTable::zeros(&[0usize, 1, 2], coder.num_features()).unwrap();
        for obs in [(-1.2, -0.07), (-0.3, 0.0), (0.5, 0.07)] {
            let features = coder.encode(&obs);
            for a in 0..3 {
                assert_eq!(table.value(&features, a), 0.0);
            }
            assert_eq!(table.max_value(&features, &[0, 1, 2]), 0.0);
        }
    }

    #[test]
    fn snapshot_is_independent_of_later_updates() {
        let table = WeightTable::zeros(&[0usize, 1], 4).unwrap();
        let features = Features::new(vec![2], 4);

        let mut live = table;
        let snapshot = live.clone();
        live.bump(0, &features, -3.0);

        assert_eq!(live.value(&features, 0), -3.0);
        assert_eq!(snapshot.value(&features, 0), 0.0, "snapshot is unchanged");
    }

    #[test]
    fn greedy_prefers_strictly_better_action() {
        let mut vectors = HashMap::new();
        vectors.insert(0usize, vec![0.0, 1.0]);
        vectors.insert(1usize, vec![0.0, 2.0]);
        let table = WeightTable::from_vectors(vectors).unwrap();
        let features = Features::new(vec![1], 2);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(table.greedy(&mut rng, &features, &[0, 1]), 1);
        }
    }

    #[test]
    fn greedy_tie_break_is_randomized() {
        let table = WeightTable::zeros(&[0usize, 1], 2).unwrap();
        let features = Features::new(vec![0], 2);

        let mut rng = StdRng::seed_from_u64(5);
        let picks = (0..100)
            .map(|_| table.greedy(&mut rng, &features, &[0, 1]))
            .collect::<HashSet<_>>();
        assert_eq!(picks.len(), 2, "both tied actions get selected");
    }

    #[test]
    fn from_vectors_rejects_mismatched_lengths() {
        let mut vectors = HashMap::new();
        vectors.insert(0usize, vec![0.0; 4]);
        vectors.insert(1usize, vec![0.0; 3]);
        assert!(matches!(
            WeightTable::from_vectors(vectors).unwrap_err(),
            ConfigError::MismatchedLengths { .. }
        ));

        assert!(WeightTable::<usize>::from_vectors(HashMap::new()).is_err());
        assert!(WeightTable::zeros(&[0usize], 0).is_err());
        assert!(WeightTable::<usize>::zeros(&[], 4).is_err());
    }
}
