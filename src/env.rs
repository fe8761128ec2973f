/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one
/// agent and a finite action space. A fresh instance stands for one episode:
/// construct it at a randomized initial state and step it until terminal.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// Get the current state
    fn state(&self) -> Self::State;

    /// Get the available actions for the current state
    ///
    /// The returned vec must never be empty, instead specify an action that
    /// represents doing nothing if necessary. The order is fixed; tie-break
    /// randomization belongs to action selection, not to the environment.
    fn actions(&self) -> Vec<Self::Action>;

    /// Update the environment in response to an action taken by an agent,
    /// producing the associated reward
    ///
    /// **Panics** if called after the environment has reached a terminal
    /// state. That is an interface precondition violation, not a recoverable
    /// condition.
    fn step(&mut self, action: Self::Action) -> f64;

    /// Determine if the state is terminal
    fn is_terminal(&self) -> bool;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A deterministic pseudo-environment: reward -1 per step, terminal after
    /// a fixed number of steps regardless of the action taken. The state never
    /// changes, which makes hand-computing weight updates easy.
    #[derive(Debug)]
    pub struct Countdown {
        steps_left: u32,
        actions: usize,
    }

    impl Countdown {
        pub fn new(horizon: u32, actions: usize) -> Self {
            assert!(actions > 0, "There is always at least one action available");
            Self {
                steps_left: horizon,
                actions,
            }
        }
    }

    impl Environment for Countdown {
        type State = (f64, f64);
        type Action = usize;

        fn state(&self) -> Self::State {
            (0.0, 0.0)
        }

        fn actions(&self) -> Vec<Self::Action> {
            (0..self.actions).collect()
        }

        fn step(&mut self, _action: Self::Action) -> f64 {
            assert!(!self.is_terminal(), "step called on a terminal environment");
            self.steps_left -= 1;
            -1.0
        }

        fn is_terminal(&self) -> bool {
            self.steps_left == 0
        }
    }

    #[test]
    fn countdown_terminates() {
        let mut env = Countdown::new(3, 1);
        let mut steps = 0;
        while !env.is_terminal() {
            assert_eq!(env.step(0), -1.0);
            steps += 1;
        }
        assert_eq!(steps, 3, "terminal after the fixed horizon");
    }

    #[test]
    #[should_panic(expected = "terminal environment")]
    fn countdown_rejects_step_after_terminal() {
        let mut env = Countdown::new(1, 1);
        env.step(0);
        env.step(0);
    }
}
