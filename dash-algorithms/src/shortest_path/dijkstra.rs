use crate::SolverTrait;
use anyhow::Result;
use dash_challenges::{shortest_path::*, Method, Optimum};
use std::{cmp::Ordering, collections::BinaryHeap};

pub struct Solver;

impl SolverTrait for Solver {
    type C = Challenge;
    type S = Solution;
    const METHOD: Method = Method::Exact;

    fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
        solve_challenge(challenge)
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

// Reversed so the max-heap pops the cheapest frontier entry, lower index first on ties.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
    let n = challenge.num_nodes();
    let (start, end) = (challenge.start, challenge.end);
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut frontier = BinaryHeap::new();

    dist[start] = 0.0;
    frontier.push(State {
        cost: 0.0,
        node: start,
    });
    while let Some(State { cost, node }) = frontier.pop() {
        if node == end {
            break;
        }
        if cost > dist[node] {
            continue;
        }
        for &(next, weight) in challenge.neighbours(node) {
            let candidate = cost + weight;
            if candidate < dist[next] {
                dist[next] = candidate;
                prev[next] = Some(node);
                frontier.push(State {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    if dist[end].is_infinite() {
        return Ok(Optimum::infeasible(
            Solution::new(Vec::new()),
            Method::Exact,
            format!(
                "{} is unreachable from {}",
                challenge.nodes.id(end),
                challenge.nodes.id(start)
            ),
        ));
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(p) = prev[current] {
        path.push(p);
        current = p;
    }
    path.reverse();
    Ok(Optimum::new(
        dist[end],
        Solution::new(challenge.nodes.ids(&path)),
        Method::Exact,
    ))
}
