use crate::{Evaluation, Node, NodeTable, ScenarioError, ScenarioResult, TOLERANCE};
use dash_utils::DistanceMetric;
use log::debug;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Demand assumed for a customer that declares none.
pub const DEFAULT_DEMAND: f64 = 1.0;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_customers: usize,
    pub capacity: f64,
}

/// Capacitated routing scenario: a depot plus customers on the Euclidean plane.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Scenario {
    pub nodes: Vec<Node>,
    pub depot: String,
    pub capacity: f64,
}

/// Flattened route set, e.g. `S A B S C S`. Every depot visit closes a sub-route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub route: Vec<String>,
}

impl Solution {
    pub fn new(route: Vec<String>) -> Self {
        Self { route }
    }

    /// Customer runs between consecutive depot visits. Empty runs are dropped.
    pub fn routes(&self, depot: &str) -> Vec<Vec<String>> {
        self.route
            .split(|id| id == depot)
            .filter(|run| !run.is_empty())
            .map(|run| run.to_vec())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub distance: f64,
    pub load_after: f64,
}

#[derive(Debug, Clone)]
pub struct Challenge {
    pub nodes: NodeTable,
    pub depot: usize,
    pub capacity: f64,
    pub customers: Vec<usize>,
    pub demands: Vec<f64>,
    pub distance_matrix: Vec<Vec<f64>>,
}

impl Challenge {
    pub fn new(scenario: &Scenario) -> ScenarioResult<Self> {
        if !scenario.capacity.is_finite() || scenario.capacity <= 0.0 {
            return Err(ScenarioError::InvalidCapacity {
                capacity: scenario.capacity,
            });
        }
        let nodes = NodeTable::new(scenario.nodes.clone())?;
        let depot = nodes
            .index_of(&scenario.depot)
            .ok_or_else(|| ScenarioError::MissingStart {
                id: scenario.depot.clone(),
            })?;

        let mut demands = vec![0.0; nodes.len()];
        let mut customers = Vec::with_capacity(nodes.len() - 1);
        for (i, node) in nodes.iter().enumerate() {
            if i == depot {
                continue;
            }
            let demand = node.demand.unwrap_or(DEFAULT_DEMAND);
            if !demand.is_finite() || demand < 0.0 {
                return Err(ScenarioError::InvalidDemand {
                    id: node.id.clone(),
                    demand,
                });
            }
            demands[i] = demand;
            customers.push(i);
        }
        let distance_matrix = nodes.distance_matrix(DistanceMetric::Euclidean);

        Ok(Self {
            nodes,
            depot,
            capacity: scenario.capacity,
            customers,
            demands,
            distance_matrix,
        })
    }

    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.distance_matrix[a][b]
    }

    pub fn route_length(&self, route: &[usize]) -> f64 {
        route
            .windows(2)
            .map(|w| self.distance_matrix[w[0]][w[1]])
            .sum()
    }

    pub fn load(&self, route: &[usize]) -> f64 {
        route.iter().map(|&i| self.demands[i]).sum()
    }

    /// Concatenates closed sub-routes, eliding the repeated depot between them.
    pub fn to_solution(&self, routes: &[Vec<usize>]) -> Solution {
        let mut flat: Vec<usize> = Vec::new();
        for route in routes {
            let skip = match (flat.last(), route.first()) {
                (Some(&a), Some(&b)) if a == self.depot && b == self.depot => 1,
                _ => 0,
            };
            flat.extend_from_slice(&route[skip..]);
        }
        if flat.is_empty() {
            flat.push(self.depot);
        }
        Solution {
            route: self.nodes.ids(&flat),
        }
    }

    pub fn evaluate_solution(&self, solution: &Solution) -> Evaluation {
        let route = &solution.route;
        let depot_id = self.nodes.id(self.depot);
        let mut violations = Vec::new();
        if route.first().map(String::as_str) != Some(depot_id)
            || route.last().map(String::as_str) != Some(depot_id)
        {
            violations.push(format!("Routes must start and end at depot {}", depot_id));
        }

        let mut visits: HashMap<&str, usize> = HashMap::new();
        let mut indices = Vec::with_capacity(route.len());
        for id in route {
            match self.nodes.index_of(id) {
                Some(i) => {
                    indices.push(i);
                    if i != self.depot {
                        *visits.entry(id.as_str()).or_default() += 1;
                    }
                }
                None => violations.push(format!("Unknown node {}", id)),
            }
        }
        for &c in &self.customers {
            let id = self.nodes.id(c);
            match visits.get(id).copied().unwrap_or_default() {
                0 => violations.push(format!("Customer {} is not served", id)),
                1 => {}
                n => violations.push(format!("Customer {} is served {} times", id, n)),
            }
        }
        for (k, run) in indices
            .split(|&i| i == self.depot)
            .filter(|run| !run.is_empty())
            .enumerate()
        {
            let load = self.load(run);
            if load > self.capacity + TOLERANCE {
                violations.push(format!(
                    "Route {} carries {} which exceeds capacity {}",
                    k + 1,
                    load,
                    self.capacity
                ));
            }
        }

        Evaluation {
            cost: self.route_length(&indices),
            violations,
        }
    }

    /// Per-leg distance and vehicle load for display. Unknown ids are skipped.
    pub fn legs(&self, solution: &Solution) -> Vec<Leg> {
        let indices: Vec<usize> = solution
            .route
            .iter()
            .filter_map(|id| self.nodes.index_of(id))
            .collect();
        let mut load = 0.0;
        indices
            .windows(2)
            .map(|w| {
                load = if w[1] == self.depot {
                    0.0
                } else {
                    load + self.demands[w[1]]
                };
                Leg {
                    from: self.nodes.id(w[0]).to_string(),
                    to: self.nodes.id(w[1]).to_string(),
                    distance: self.distance(w[0], w[1]),
                    load_after: load,
                }
            })
            .collect()
    }
}

impl Scenario {
    /// Depot `S` near the top-left corner, customers `C1..` with demands 1..=4.
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Self {
        const BOX_W: f64 = 1200.0;
        const BOX_H: f64 = 640.0;
        const PAD: f64 = 60.0;
        const MIN_DIST: f64 = 60.0;

        let mut rng = SmallRng::from_seed(seed.clone());
        let num_customers = difficulty.num_customers.clamp(1, 30);
        let depot = Node::new("S", PAD, PAD + 60.0).with_label("Depot");

        let mut points: Vec<(f64, f64)> = Vec::with_capacity(num_customers);
        let mut attempts = 0;
        while points.len() < num_customers && attempts < 6000 {
            attempts += 1;
            let x = rng.gen_range(PAD..BOX_W - PAD);
            let y = rng.gen_range(PAD..BOX_H - PAD);
            let clear = |px: f64, py: f64| (x - px).hypot(y - py) >= MIN_DIST;
            if clear(depot.position.x, depot.position.y)
                && points.iter().all(|&(px, py)| clear(px, py))
            {
                points.push((x, y));
            }
        }
        if points.len() < num_customers {
            debug!("relaxing node spacing after {} attempts", attempts);
        }
        while points.len() < num_customers {
            points.push((rng.gen_range(PAD..BOX_W - PAD), rng.gen_range(PAD..BOX_H - PAD)));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut nodes = vec![depot];
        for (i, (x, y)) in points.into_iter().enumerate() {
            let id = format!("C{}", i + 1);
            let demand = rng.gen_range(1..=4) as f64;
            nodes.push(
                Node::new(id.clone(), x.round(), y.round())
                    .with_label(id)
                    .with_demand(demand),
            );
        }
        Scenario {
            nodes,
            depot: "S".to_string(),
            capacity: difficulty.capacity,
        }
    }
}
