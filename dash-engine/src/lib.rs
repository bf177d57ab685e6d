mod cache;
pub use cache::OptimumCache;
mod engine;
pub use engine::Engine;
mod scoring;
pub use scoring::{compute_standings, score};

pub use dash_structs::{
    config::{EngineConfig, SolverLimits},
    core::*,
};
