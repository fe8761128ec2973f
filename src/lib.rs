/// Implemented TD control algorithms
pub mod algo;

/// Linear function approximation over sparse features
pub mod approx;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Configuration errors
pub mod error;

/// Exploration policies
pub mod exploration;

/// Control tasks
pub mod gym;

/// Asynchronous training pipeline
pub mod pipeline;

/// Tile coding feature construction
pub mod tiles;
