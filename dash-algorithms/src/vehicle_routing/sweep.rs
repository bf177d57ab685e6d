use super::{from_routes, infeasible, oversized_customer};
use crate::SolverTrait;
use anyhow::Result;
use dash_challenges::{vehicle_routing::*, Method, Optimum, TOLERANCE};

pub struct Solver;

impl SolverTrait for Solver {
    type C = Challenge;
    type S = Solution;
    const METHOD: Method = Method::Heuristic;

    fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
        solve_challenge(challenge)
    }
}

pub fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
    if let Some(reason) = oversized_customer(challenge) {
        return Ok(infeasible(challenge, Method::Heuristic, reason));
    }
    let routes = sweep_routes(challenge);
    Ok(from_routes(challenge, &routes, Method::Heuristic))
}

/// Customers ordered by polar angle around the depot, cut into runs that fit
/// the capacity. Each run is returned closed at the depot.
pub fn sweep_routes(challenge: &Challenge) -> Vec<Vec<usize>> {
    let depot = challenge.nodes.get(challenge.depot).position;
    let mut order: Vec<(f64, f64, usize)> = challenge
        .customers
        .iter()
        .map(|&c| {
            let p = challenge.nodes.get(c).position;
            (p.polar_angle_from(&depot), challenge.distance(challenge.depot, c), c)
        })
        .collect();
    order.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then_with(|| a.1.total_cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut routes = Vec::new();
    let mut run = vec![challenge.depot];
    let mut load = 0.0;
    for (_, _, c) in order {
        let demand = challenge.demands[c];
        if run.len() > 1 && load + demand > challenge.capacity + TOLERANCE {
            run.push(challenge.depot);
            routes.push(std::mem::replace(&mut run, vec![challenge.depot]));
            load = 0.0;
        }
        run.push(c);
        load += demand;
    }
    if run.len() > 1 {
        run.push(challenge.depot);
        routes.push(run);
    }
    routes
}
