/// Off-policy TD control
pub mod q_learning;
/// On-policy TD control
pub mod sarsa;
/// On-policy TD control with eligibility traces
pub mod sarsa_lambda;

pub use q_learning::{QLearning, QLearningConfig};
pub use sarsa::{Sarsa, SarsaConfig};
pub use sarsa_lambda::{SarsaLambda, SarsaLambdaConfig};

#[cfg(test)]
pub(crate) mod tests {
    use crate::tiles::{FeatureEncoder, Features};

    /// Encoder that activates the same single feature for every state, which
    /// makes weight updates easy to compute by hand
    #[derive(Debug)]
    pub struct ConstEncoder;

    impl<S> FeatureEncoder<S> for ConstEncoder {
        fn encode(&self, _state: &S) -> Features {
            Features::new(vec![0], 1)
        }

        fn num_features(&self) -> usize {
            1
        }
    }
}
