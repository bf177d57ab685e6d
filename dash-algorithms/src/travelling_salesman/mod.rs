pub mod held_karp;
pub mod two_opt;

use crate::{SolverLimits, SolverTrait};
use dash_structs::config::MAX_EXACT_TOUR_NODES;
use anyhow::Result;
use dash_challenges::{travelling_salesman::*, Optimum};
use log::info;

/// Held-Karp is used while the node count, start included, stays within the
/// limit. Limits above `MAX_EXACT_TOUR_NODES` are clamped to it.
pub fn uses_exact(challenge: &Challenge, limits: &SolverLimits) -> bool {
    challenge.num_nodes() <= limits.exact_tour_max_nodes.min(MAX_EXACT_TOUR_NODES)
}

pub fn solve(challenge: &Challenge, limits: &SolverLimits) -> Result<Optimum<Solution>> {
    if uses_exact(challenge, limits) {
        held_karp::Solver::solve_challenge(challenge)
    } else {
        info!(
            "tour over {} nodes exceeds exact limit {}, falling back to nearest neighbour with 2-opt",
            challenge.num_nodes(),
            limits.exact_tour_max_nodes
        );
        two_opt::Solver::solve_challenge(challenge)
    }
}
