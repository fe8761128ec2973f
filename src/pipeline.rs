use std::{
    hash::Hash,
    sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError},
    thread::{self, JoinHandle},
};

use log::{debug, info};

use crate::{
    algo::SarsaLambda,
    approx::WeightTable,
    decay::Decay,
    env::Environment,
    error::ConfigError,
    tiles::{FeatureEncoder, TileCoder},
};

/// Configuration for [`spawn_trainer`]
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Episodes run between snapshot publications
    pub episodes_per_batch: u32,
    /// Total training episode budget
    pub total_episodes: u32,
}

impl TrainerConfig {
    pub fn new(episodes_per_batch: u32, total_episodes: u32) -> Result<Self, ConfigError> {
        if episodes_per_batch == 0 {
            return Err(ConfigError::Zero {
                name: "episodes_per_batch",
            });
        }
        if total_episodes == 0 {
            return Err(ConfigError::Zero {
                name: "total_episodes",
            });
        }
        Ok(Self {
            episodes_per_batch,
            total_episodes,
        })
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes_per_batch: 1,
            total_episodes: 100_000,
        }
    }
}

/// Run a [`SarsaLambda`] agent on a background thread, publishing a deep
/// copy of its weight table after every batch
///
/// The channel is an unbuffered rendezvous: the trainer blocks until the
/// consumer accepts each snapshot, so training throughput is capped by how
/// fast the consumer takes them. The trainer owns the only mutable table; a
/// consumer only ever sees finished, independent copies. Exactly one
/// consumer may own the receiving end.
///
/// The thread stops when the episode budget is exhausted or the receiver is
/// dropped, and returns the agent with its final weights.
pub fn spawn_trainer<E, X, D, F>(
    mut agent: SarsaLambda<E, X, D>,
    mut make_env: F,
    config: TrainerConfig,
) -> (
    JoinHandle<SarsaLambda<E, X, D>>,
    Receiver<WeightTable<E::Action>>,
)
where
    E: Environment + 'static,
    E::Action: Copy + Eq + Hash + Send,
    X: FeatureEncoder<E::State> + Send + 'static,
    D: Decay + Send + 'static,
    F: FnMut() -> E + Send + 'static,
{
    let (tx, rx) = sync_channel(0);

    let handle = thread::spawn(move || {
        info!("training for {} episodes", config.total_episodes);

        let mut remaining = config.total_episodes;
        while remaining > 0 {
            let batch = config.episodes_per_batch.min(remaining);
            remaining -= batch;

            for _ in 0..batch {
                agent.go(make_env());
            }

            // rendezvous: blocks until the consumer accepts the snapshot
            if tx.send(agent.weights().clone()).is_err() {
                debug!("snapshot receiver dropped, stopping after {remaining} unplayed episodes");
                break;
            }
            debug!("batch published, {remaining} episodes remaining");
        }

        info!("training finished");
        agent
    });

    (handle, rx)
}

/// A coarse cost-to-go heatmap derived from a weight snapshot
///
/// Row-major over a `width` x `height` grid of observations spanning the
/// encoder's bounds, values normalized to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostGrid {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
}

/// Sample the negated greedy value over a fixed observation grid
///
/// Each cell is evaluated at its center. When any sampled cost is positive
/// the grid is normalized by the maximum.
pub fn cost_to_go<A>(
    weights: &WeightTable<A>,
    coder: &TileCoder,
    actions: &[A],
    width: usize,
    height: usize,
) -> CostGrid
where
    A: Copy + Eq + Hash,
{
    assert!(width > 0 && height > 0, "cost grid must have at least one cell");

    let (x_lo, x_hi) = coder.x_bounds();
    let (y_lo, y_hi) = coder.y_bounds();
    let x_step = (x_hi - x_lo) / width as f64;
    let y_step = (y_hi - y_lo) / height as f64;

    let mut values = Vec::with_capacity(width * height);
    let mut max_cost = 0.0f64;
    for row in 0..height {
        let y = y_lo + (row as f64 + 0.5) * y_step;
        for col in 0..width {
            let x = x_lo + (col as f64 + 0.5) * x_step;
            let features = coder.encode(&(x, y));
            let cost = -weights.max_value(&features, actions);
            max_cost = max_cost.max(cost);
            values.push(cost);
        }
    }

    if max_cost > 0.0 {
        for v in values.iter_mut() {
            *v /= max_cost;
        }
    }

    CostGrid {
        width,
        height,
        values,
    }
}

/// Derive a cost-to-go grid from a snapshot on a one-shot background thread
/// and publish it through a rendezvous of its own
pub fn spawn_cost_map<A>(
    snapshot: WeightTable<A>,
    coder: TileCoder,
    actions: Vec<A>,
    width: usize,
    height: usize,
    tx: SyncSender<CostGrid>,
) -> JoinHandle<()>
where
    A: Copy + Eq + Hash + Send + 'static,
{
    thread::spawn(move || {
        let grid = cost_to_go(&snapshot, &coder, &actions, width, height);
        // the consumer may be gone already; the grid is then simply dropped
        let _ = tx.send(grid);
    })
}

/// Consumer-side holder of the most recently published value
///
/// `poll` never blocks. When nothing new has arrived, or the producer is
/// gone, the previously held value stays current; staleness is expected.
pub struct LatestFeed<T> {
    rx: Receiver<T>,
    latest: T,
}

impl<T> LatestFeed<T> {
    pub fn new(rx: Receiver<T>, initial: T) -> Self {
        Self { rx, latest: initial }
    }

    /// Accept a newly published value if one is waiting
    ///
    /// **Returns** whether the held value was replaced
    pub fn poll(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(value) => {
                self.latest = value;
                true
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }

    pub fn latest(&self) -> &T {
        &self.latest
    }
}
