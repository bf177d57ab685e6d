pub mod dijkstra;

use crate::SolverTrait;
use anyhow::Result;
use dash_challenges::{shortest_path::*, Optimum};

/// Reference optimum for a shortest-path round. Dijkstra is exact at every size.
pub fn solve(challenge: &Challenge) -> Result<Optimum<Solution>> {
    dijkstra::Solver::solve_challenge(challenge)
}
