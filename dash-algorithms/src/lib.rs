use ahash::RandomState;
use dash_challenges::{Method, Optimum};

pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, RandomState>;

pub use dash_structs::config::SolverLimits;

/// A reference solver for one problem. `METHOD` is what every result it
/// returns reports, so a heuristic can never pass itself off as exact.
pub trait SolverTrait {
    type C;
    type S;
    const METHOD: Method;

    fn solve_challenge(challenge: &Self::C) -> anyhow::Result<Optimum<Self::S>>;
}

#[cfg(feature = "shortest_path")]
pub mod shortest_path;
#[cfg(feature = "travelling_salesman")]
pub mod travelling_salesman;
#[cfg(feature = "vehicle_routing")]
pub mod vehicle_routing;
#[cfg(feature = "transportation")]
pub mod transportation;
