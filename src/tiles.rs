use crate::error::ConfigError;

/// A sparse boolean feature vector
///
/// Only the active indices are stored. Tile coding activates exactly one
/// index per tiling block, so `active` has one entry per tiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    active: Vec<usize>,
    len: usize,
}

impl Features {
    pub fn new(active: Vec<usize>, len: usize) -> Self {
        debug_assert!(active.iter().all(|&i| i < len));
        Self { active, len }
    }

    /// Indices of the active bits, in tiling order
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Length of the full boolean vector this encodes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Maps an environment state to sparse features of a fixed length
pub trait FeatureEncoder<S> {
    fn encode(&self, state: &S) -> Features;

    /// Length of the produced feature vectors
    fn num_features(&self) -> usize;
}

/// Tile coding over a bounded two-dimensional continuous state
///
/// `tilings` offset grids are layered over the state space, each with
/// `resolution + 1` tiles per axis. Every encoding activates exactly one tile
/// per grid. Successive grids are shifted by a cumulative `1/tilings` of a
/// tile width on both axes.
#[derive(Debug, Clone)]
pub struct TileCoder {
    tilings: usize,
    resolution: usize,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
}

impl TileCoder {
    pub fn new(
        tilings: usize,
        resolution: usize,
        x_bounds: (f64, f64),
        y_bounds: (f64, f64),
    ) -> Result<Self, ConfigError> {
        if tilings == 0 {
            return Err(ConfigError::Zero { name: "tilings" });
        }
        if resolution == 0 {
            return Err(ConfigError::Zero { name: "resolution" });
        }
        for (name, (lo, hi)) in [("x_bounds", x_bounds), ("y_bounds", y_bounds)] {
            if !(lo < hi) {
                return Err(ConfigError::EmptyRange { name, lo, hi });
            }
        }
        Ok(Self {
            tilings,
            resolution,
            x_bounds,
            y_bounds,
        })
    }

    pub fn tilings(&self) -> usize {
        self.tilings
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        self.x_bounds
    }

    pub fn y_bounds(&self) -> (f64, f64) {
        self.y_bounds
    }
}

impl FeatureEncoder<(f64, f64)> for TileCoder {
    fn encode(&self, &(x, y): &(f64, f64)) -> Features {
        let res = self.resolution;
        let stride = res + 1;
        let tiles_per_tiling = stride * stride;
        let tile_w = 1.0 / res as f64;
        let offset = tile_w / self.tilings as f64;

        let mut nx = (x - self.x_bounds.0) / (self.x_bounds.1 - self.x_bounds.0);
        let mut ny = (y - self.y_bounds.0) / (self.y_bounds.1 - self.y_bounds.0);

        let mut active = Vec::with_capacity(self.tilings);
        for t in 0..self.tilings {
            // `as usize` saturates at zero for inputs below the lower bound;
            // the min clamps inputs at or beyond the top edge into the last tile
            let col = ((nx * res as f64) as usize).min(res);
            let row = ((ny * res as f64) as usize).min(res);
            active.push(tiles_per_tiling * t + row * stride + col);

            nx += offset;
            ny += offset;
        }

        Features::new(active, self.num_features())
    }

    fn num_features(&self) -> usize {
        self.tilings * (self.resolution + 1) * (self.resolution + 1)
    }
}
