use super::{from_routes, infeasible, oversized_customer};
use crate::{travelling_salesman::held_karp, HashMap, SolverTrait};
use anyhow::{anyhow, Result};
use dash_challenges::{vehicle_routing::*, Method, Optimum, TOLERANCE};
use dash_structs::config::MAX_EXACT_ROUTING_CUSTOMERS;
use logging_timer::time;

pub struct Solver;

impl SolverTrait for Solver {
    type C = Challenge;
    type S = Solution;
    const METHOD: Method = Method::Exact;

    fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
        solve_challenge(challenge)
    }
}

struct SubsetTour {
    cost: f64,
    tour: Vec<usize>,
}

#[time]
pub fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
    if let Some(reason) = oversized_customer(challenge) {
        return Ok(infeasible(challenge, Method::Exact, reason));
    }
    let customers = &challenge.customers;
    let k = customers.len();
    if k == 0 {
        return Ok(from_routes(challenge, &[], Method::Exact));
    }
    if k > MAX_EXACT_ROUTING_CUSTOMERS {
        return Err(anyhow!(
            "Cannot partition {} customers exactly, at most {} are allowed",
            k,
            MAX_EXACT_ROUTING_CUSTOMERS
        ));
    }
    let full: u32 = (1 << k) - 1;

    let mut feasible: HashMap<u32, SubsetTour> = HashMap::default();
    for mask in 1..=full {
        let members: Vec<usize> = (0..k)
            .filter(|&b| mask & (1 << b) != 0)
            .map(|b| customers[b])
            .collect();
        if challenge.load(&members) > challenge.capacity + TOLERANCE {
            continue;
        }
        let tour = held_karp::closed_tour(&challenge.distance_matrix, challenge.depot, &members)?;
        let cost = challenge.route_length(&tour);
        feasible.insert(mask, SubsetTour { cost, tour });
    }

    // dp[covered]: cheapest set of disjoint feasible tours serving exactly `covered`.
    // Each step serves the lowest uncovered customer, which keeps every partition
    // reachable exactly once.
    let size = full as usize + 1;
    let mut dp = vec![f64::INFINITY; size];
    let mut choice = vec![0u32; size];
    dp[0] = 0.0;
    for covered in 0..full {
        let base = dp[covered as usize];
        if base.is_infinite() {
            continue;
        }
        let rest = full & !covered;
        let lowest = rest & rest.wrapping_neg();
        let mut subset = rest;
        while subset != 0 {
            if subset & lowest != 0 {
                if let Some(t) = feasible.get(&subset) {
                    let next = (covered | subset) as usize;
                    let candidate = base + t.cost;
                    if candidate < dp[next] {
                        dp[next] = candidate;
                        choice[next] = subset;
                    }
                }
            }
            subset = (subset - 1) & rest;
        }
    }
    if dp[full as usize].is_infinite() {
        return Ok(infeasible(
            challenge,
            Method::Exact,
            "No combination of routes serves every customer".to_string(),
        ));
    }

    let mut routes = Vec::new();
    let mut covered = full;
    while covered != 0 {
        let subset = choice[covered as usize];
        let t = feasible
            .get(&subset)
            .ok_or_else(|| anyhow!("Set partition lost the tour for subset {:#b}", subset))?;
        routes.push(t.tour.clone());
        covered &= !subset;
    }
    routes.reverse();
    Ok(from_routes(challenge, &routes, Method::Exact))
}
