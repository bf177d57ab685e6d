pub mod successive_shortest_path;

use crate::SolverTrait;
use anyhow::Result;
use dash_challenges::{transportation::*, Optimum};

/// Reference optimum for transportation and transshipment rounds alike.
pub fn solve(challenge: &Challenge) -> Result<Optimum<Solution>> {
    successive_shortest_path::Solver::solve_challenge(challenge)
}
