use std::{sync::mpsc::sync_channel, thread, time::Duration};

use rand::{rngs::StdRng, SeedableRng};
use strum::VariantArray;
use tile_rl::{
    algo::{SarsaLambda, SarsaLambdaConfig},
    approx::WeightTable,
    decay,
    env::Environment,
    exploration::EpsilonGreedy,
    gym::{MountainCar, Pedal, POSITION_BOUNDS, VELOCITY_BOUNDS},
    pipeline::{self, CostGrid, LatestFeed, TrainerConfig},
    tiles::{FeatureEncoder, TileCoder},
};

const NUM_TILINGS: usize = 8;
const RESOLUTION: usize = 8;
const COST_W: usize = 32;
const COST_H: usize = 16;

fn main() {
    let coder = TileCoder::new(NUM_TILINGS, RESOLUTION, POSITION_BOUNDS, VELOCITY_BOUNDS).unwrap();
    let actions = Pedal::VARIANTS.to_vec();
    let weights = WeightTable::zeros(&actions, coder.num_features()).unwrap();

    let agent = SarsaLambda::new(
        SarsaLambdaConfig {
            exploration: EpsilonGreedy::constant(0.05).unwrap(),
            alpha: 0.1 / NUM_TILINGS as f64,
            gamma: 1.0,
            lambda: 0.6,
        },
        coder.clone(),
        weights.clone(),
        StdRng::seed_from_u64(1),
    )
    .unwrap();

    let mut env_rng = StdRng::seed_from_u64(2);
    let config = TrainerConfig::new(50, 20_000).unwrap();
    let (handle, snapshot_rx) =
        pipeline::spawn_trainer(agent, move || MountainCar::new(&mut env_rng), config);

    let (cost_tx, cost_rx) = sync_channel(0);
    let mut snapshots = LatestFeed::new(snapshot_rx, weights);
    let mut costs = LatestFeed::new(
        cost_rx,
        CostGrid {
            width: COST_W,
            height: COST_H,
            values: vec![0.0; COST_W * COST_H],
        },
    );

    // explore a lot while the early snapshots are still rough
    let policy = EpsilonGreedy::new(decay::Exponential::new(0.05, 0.5, 0.01).unwrap());
    let mut rng = StdRng::seed_from_u64(3);
    let mut car = MountainCar::new(&mut rng);
    let mut episodes = 0u32;
    let mut frame = 0u32;

    loop {
        if snapshots.poll() {
            // a fresh snapshot arrived: refresh the heatmap from it
            pipeline::spawn_cost_map(
                snapshots.latest().clone(),
                coder.clone(),
                actions.clone(),
                COST_W,
                COST_H,
                cost_tx.clone(),
            );
        }
        costs.poll();

        if car.is_terminal() {
            episodes += 1;
            car = MountainCar::new(&mut rng);
        }
        let features = coder.encode(&car.state());
        let action =
            snapshots
                .latest()
                .epsilon_greedy(&mut rng, &policy, episodes, &features, &car.actions());
        car.step(action);

        frame += 1;
        if frame % 500 == 0 {
            let (position, velocity) = car.state();
            println!(
                "frame {frame:>6} | finished live episodes {episodes:>4} | x {position:+.3} dx {velocity:+.4}"
            );
        }

        if handle.is_finished() {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }

    let agent = handle.join().expect("training thread panicked");
    let grid = pipeline::cost_to_go(agent.weights(), &coder, &actions, COST_W, COST_H);
    render(&grid);
    println!("done: {episodes} live episodes finished while training ran");
}

fn render(grid: &CostGrid) {
    // darker shades mean more steps to the goal
    const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];
    println!("cost to go (position →, velocity ↓):");
    for row in (0..grid.height).rev() {
        let line: String = (0..grid.width)
            .map(|col| {
                let v = grid.values[row * grid.width + col];
                SHADES[((v * (SHADES.len() - 1) as f64).round() as usize).min(SHADES.len() - 1)]
            })
            .collect();
        println!("|{line}|");
    }
}
