use crate::SolverTrait;
use anyhow::Result;
use dash_challenges::{travelling_salesman::*, Method, Optimum};

/// Strict improvement a 2-opt move must achieve to be applied.
pub const MIN_GAIN: f64 = 1e-6;

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
    let mut tour = nearest_neighbour(&challenge.distance_matrix, challenge.start);
    improve(&challenge.distance_matrix, &mut tour);
    Ok(Optimum::new(
        challenge.route_length(&tour),
        challenge.to_solution(&tour),
        Method::Heuristic,
    ))
}

/// Greedy closed tour from `start`, always moving to the closest unvisited node.
pub fn nearest_neighbour(distance_matrix: &[Vec<f64>], start: usize) -> Vec<usize> {
    let n = distance_matrix.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n + 1);
    visited[start] = true;
    tour.push(start);

    let mut current = start;
    for _ in 1..n {
        let mut next = None;
        let mut best = f64::INFINITY;
        for (j, &d) in distance_matrix[current].iter().enumerate() {
            if !visited[j] && d < best {
                best = d;
                next = Some(j);
            }
        }
        let Some(next) = next else {
            break;
        };
        visited[next] = true;
        tour.push(next);
        current = next;
    }
    tour.push(start);
    tour
}

/// First-improvement 2-opt over a closed tour, repeated until no move gains more
/// than `MIN_GAIN`. The endpoints stay fixed.
pub fn improve(distance_matrix: &[Vec<f64>], tour: &mut [usize]) {
    let d = |a: usize, b: usize| distance_matrix[a][b];
    let len = tour.len();
    if len < 5 {
        return;
    }
    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..len - 2 {
            for k in i + 1..len - 1 {
                let delta = d(tour[i - 1], tour[k]) + d(tour[i], tour[k + 1])
                    - d(tour[i - 1], tour[i])
                    - d(tour[k], tour[k + 1]);
                if delta < -MIN_GAIN {
                    tour[i..=k].reverse();
                    improved = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(points: &[(f64, f64)]) -> Vec<Vec<f64>> {
        points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| (a.0 - b.0).hypot(a.1 - b.1))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_nearest_neighbour_closes_tour() {
        let d = matrix(&[(0.0, 0.0), (5.0, 0.0), (1.0, 0.0), (3.0, 0.0)]);
        assert_eq!(nearest_neighbour(&d, 0), vec![0, 2, 3, 1, 0]);
    }

    #[test]
    fn test_improve_removes_crossing() {
        let d = matrix(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut tour = vec![0, 2, 1, 3, 0];
        improve(&d, &mut tour);
        let len: f64 = tour.windows(2).map(|w| d[w[0]][w[1]]).sum();
        assert!((len - 4.0).abs() < 1e-9);
        assert_eq!(tour[0], 0);
        assert_eq!(tour[4], 0);
    }
}
