use crate::SolverTrait;
use anyhow::{anyhow, Result};
use dash_challenges::{travelling_salesman::*, Method, Optimum};
use dash_structs::config::MAX_EXACT_TOUR_NODES;
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

#[time]
pub fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
    let stops: Vec<usize> = (0..challenge.num_nodes())
        .filter(|&i| i != challenge.start)
        .collect();
    let tour = closed_tour(&challenge.distance_matrix, challenge.start, &stops)?;
    Ok(Optimum::new(
        challenge.route_length(&tour),
        challenge.to_solution(&tour),
        Method::Exact,
    ))
}

/// Optimal closed tour `start, .., start` through every index in `stops`.
/// `stops` must not contain `start`; cost grows as O(m^2 2^m) in its length,
/// so more than `MAX_EXACT_TOUR_NODES - 1` stops is refused.
pub fn closed_tour(distance_matrix: &[Vec<f64>], start: usize, stops: &[usize]) -> Result<Vec<usize>> {
    let m = stops.len();
    if m == 0 {
        return Ok(vec![start, start]);
    }
    if m >= MAX_EXACT_TOUR_NODES {
        return Err(anyhow!(
            "Cannot run Held-Karp over {} stops, at most {} are allowed",
            m,
            MAX_EXACT_TOUR_NODES - 1
        ));
    }
    let d = |a: usize, b: usize| distance_matrix[a][b];
    let full = (1usize << m) - 1;

    // dp[mask * m + j]: cheapest path from start through `mask`, ending at stops[j]
    let mut dp = vec![f64::INFINITY; (full + 1) * m];
    let mut parent = vec![usize::MAX; (full + 1) * m];
    for j in 0..m {
        dp[(1 << j) * m + j] = d(start, stops[j]);
    }
    for mask in 1..=full {
        for j in 0..m {
            let cost = dp[mask * m + j];
            if mask & (1 << j) == 0 || cost.is_infinite() {
                continue;
            }
            for k in 0..m {
                if mask & (1 << k) != 0 {
                    continue;
                }
                let next = mask | (1 << k);
                let candidate = cost + d(stops[j], stops[k]);
                if candidate < dp[next * m + k] {
                    dp[next * m + k] = candidate;
                    parent[next * m + k] = j;
                }
            }
        }
    }

    let mut last = 0;
    let mut best = f64::INFINITY;
    for j in 0..m {
        let candidate = dp[full * m + j] + d(stops[j], start);
        if candidate < best {
            best = candidate;
            last = j;
        }
    }
    if best.is_infinite() {
        return Err(anyhow!("Held-Karp found no finite tour"));
    }

    let mut order = Vec::with_capacity(m);
    let mut mask = full;
    let mut j = last;
    loop {
        order.push(stops[j]);
        let p = parent[mask * m + j];
        mask &= !(1 << j);
        if mask == 0 {
            break;
        }
        if p == usize::MAX {
            return Err(anyhow!("Held-Karp reconstruction lost its parent pointer"));
        }
        j = p;
    }
    order.reverse();

    let mut tour = Vec::with_capacity(m + 2);
    tour.push(start);
    tour.extend(order);
    tour.push(start);
    Ok(tour)
}
