pub mod set_partition;
pub mod sweep;

use crate::{SolverLimits, SolverTrait};
use dash_structs::config::MAX_EXACT_ROUTING_CUSTOMERS;
use anyhow::Result;
use dash_challenges::{vehicle_routing::*, Method, Optimum, TOLERANCE};
use log::info;

/// The set-partition search runs while the customer count stays within the
/// limit. Limits above `MAX_EXACT_ROUTING_CUSTOMERS` are clamped to it.
pub fn uses_exact(challenge: &Challenge, limits: &SolverLimits) -> bool {
    challenge.num_customers()
        <= limits
            .exact_routing_max_customers
            .min(MAX_EXACT_ROUTING_CUSTOMERS)
}

/// Why no vehicle can serve the instance, if some customer alone overloads it.
pub fn oversized_customer(challenge: &Challenge) -> Option<String> {
    challenge
        .customers
        .iter()
        .find(|&&c| challenge.demands[c] > challenge.capacity + TOLERANCE)
        .map(|&c| {
            format!(
                "Customer {} demands {} which exceeds vehicle capacity {}",
                challenge.nodes.id(c),
                challenge.demands[c],
                challenge.capacity
            )
        })
}

pub fn solve(challenge: &Challenge, limits: &SolverLimits) -> Result<Optimum<Solution>> {
    if uses_exact(challenge, limits) {
        set_partition::Solver::solve_challenge(challenge)
    } else {
        info!(
            "routing over {} customers exceeds exact limit {}, falling back to sweep",
            challenge.num_customers(),
            limits.exact_routing_max_customers
        );
        sweep::Solver::solve_challenge(challenge)
    }
}

fn from_routes(challenge: &Challenge, routes: &[Vec<usize>], method: Method) -> Optimum<Solution> {
    let cost = routes.iter().map(|r| challenge.route_length(r)).sum();
    Optimum::new(cost, challenge.to_solution(routes), method)
}

fn infeasible(challenge: &Challenge, method: Method, reason: String) -> Optimum<Solution> {
    Optimum::infeasible(challenge.to_solution(&[]), method, reason)
}
