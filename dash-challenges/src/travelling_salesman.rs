use crate::{Evaluation, Node, NodeTable, ScenarioError, ScenarioResult};
use dash_utils::DistanceMetric;
use log::debug;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_nodes: usize,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct PickingDifficulty {
    pub rows: usize,
    pub cols: usize,
    pub picks: usize,
}

/// Closed-tour scenario over an implicit complete graph. Open tours use the
/// Euclidean metric, warehouse picking the Manhattan one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Scenario {
    pub nodes: Vec<Node>,
    pub start: String,
    #[serde(default)]
    pub metric: DistanceMetric,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub route: Vec<String>,
}

impl Solution {
    pub fn new(route: Vec<String>) -> Self {
        Self { route }
    }
}

#[derive(Debug, Clone)]
pub struct Challenge {
    pub nodes: NodeTable,
    pub start: usize,
    pub metric: DistanceMetric,
    pub distance_matrix: Vec<Vec<f64>>,
}

impl Challenge {
    pub fn new(scenario: &Scenario) -> ScenarioResult<Self> {
        let nodes = NodeTable::new(scenario.nodes.clone())?;
        let start = nodes
            .index_of(&scenario.start)
            .ok_or_else(|| ScenarioError::MissingStart {
                id: scenario.start.clone(),
            })?;
        let distance_matrix = nodes.distance_matrix(scenario.metric);
        Ok(Self {
            nodes,
            start,
            metric: scenario.metric,
            distance_matrix,
        })
    }

    /// Number of nodes including the start.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.distance_matrix[a][b]
    }

    /// Length of a node-index sequence, summed leg by leg.
    pub fn route_length(&self, route: &[usize]) -> f64 {
        route
            .windows(2)
            .map(|w| self.distance_matrix[w[0]][w[1]])
            .sum()
    }

    pub fn to_solution(&self, route: &[usize]) -> Solution {
        Solution {
            route: self.nodes.ids(route),
        }
    }

    pub fn evaluate_solution(&self, solution: &Solution) -> Evaluation {
        let route = &solution.route;
        let start_id = self.nodes.id(self.start);
        let mut violations = Vec::new();
        if route.len() < 2 {
            violations.push(format!("Tour must start and end at {}", start_id));
            return Evaluation {
                cost: f64::INFINITY,
                violations,
            };
        }
        if route[0] != start_id || route[route.len() - 1] != start_id {
            violations.push(format!("Tour must start and end at {}", start_id));
        }

        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(route.len());
        for id in route {
            match self.nodes.index_of(id) {
                Some(i) => indices.push(i),
                None => {
                    violations.push(format!("Unknown node {}", id));
                    continue;
                }
            }
            if id != start_id && !seen.insert(id.as_str()) {
                violations.push(format!("Node {} is visited more than once", id));
            }
        }
        if route[1..route.len() - 1].iter().any(|id| id == start_id) {
            violations.push(format!("Tour returns to {} before visiting every node", start_id));
        }
        for node in self.nodes.iter() {
            if node.id != start_id && !seen.contains(node.id.as_str()) {
                violations.push(format!("Node {} is not visited", node.id));
            }
        }

        Evaluation {
            cost: self.route_length(&indices),
            violations,
        }
    }
}

impl Scenario {
    /// Euclidean tour: start `S` near the top-left corner plus `num_nodes - 1` stops.
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Self {
        const BOX_W: f64 = 1200.0;
        const BOX_H: f64 = 640.0;
        const PAD: f64 = 60.0;
        const MIN_DIST: f64 = 70.0;

        let mut rng = SmallRng::from_seed(seed.clone());
        let n = difficulty.num_nodes.clamp(3, 18);
        let s = Node::new("S", PAD, PAD + 60.0).with_label("S");

        let mut points: Vec<(f64, f64)> = Vec::with_capacity(n - 1);
        let mut attempts = 0;
        while points.len() < n - 1 && attempts < 5000 {
            attempts += 1;
            let x = rng.gen_range(PAD..BOX_W - PAD);
            let y = rng.gen_range(PAD..BOX_H - PAD);
            let clear = |px: f64, py: f64| (x - px).hypot(y - py) >= MIN_DIST;
            if clear(s.position.x, s.position.y) && points.iter().all(|&(px, py)| clear(px, py)) {
                points.push((x, y));
            }
        }
        if points.len() < n - 1 {
            debug!("relaxing node spacing after {} attempts", attempts);
        }
        while points.len() < n - 1 {
            points.push((rng.gen_range(PAD..BOX_W - PAD), rng.gen_range(PAD..BOX_H - PAD)));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut nodes = vec![s];
        for (i, (x, y)) in points.into_iter().enumerate() {
            let id = format!("N{}", i + 1);
            nodes.push(Node::new(id.clone(), x.round(), y.round()).with_label(id));
        }
        Scenario {
            nodes,
            start: "S".to_string(),
            metric: DistanceMetric::Euclidean,
        }
    }

    /// Warehouse picking on a jittered grid, travelled with the Manhattan metric.
    pub fn generate_picking_instance(seed: &[u8; 32], difficulty: &PickingDifficulty) -> Self {
        const CELL: f64 = 50.0;
        const PAD: f64 = 80.0;

        let mut rng = SmallRng::from_seed(seed.clone());
        let rows = difficulty.rows.clamp(3, 12);
        let cols = difficulty.cols.clamp(4, 18);

        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let x = PAD + c as f64 * CELL + rng.gen_range(-3.0..3.0);
                let y = PAD + r as f64 * CELL + rng.gen_range(-3.0..3.0);
                cells.push((x, y));
            }
        }
        let picks = difficulty.picks.min(cells.len());
        let chosen = rand::seq::index::sample(&mut rng, cells.len(), picks);

        let mut nodes = vec![Node::new("S", PAD, PAD).with_label("Dock")];
        for (i, k) in chosen.into_iter().enumerate() {
            let (x, y) = cells[k];
            let id = format!("P{}", i + 1);
            nodes.push(Node::new(id.clone(), x.round(), y.round()).with_label(id));
        }
        Scenario {
            nodes,
            start: "S".to_string(),
            metric: DistanceMetric::Manhattan,
        }
    }
}
