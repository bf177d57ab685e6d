use crate::{
    resolver::{resolve_edges, Edge, Metric, MetricVector, Mode, Modifier, Objective, ResolvedEdge},
    Evaluation, Node, NodeTable, ScenarioError, ScenarioResult,
};
use dash_utils::euclidean;
use log::debug;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_nodes: usize,
    pub density: usize,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            num_nodes: 12,
            density: 2,
        }
    }
}

/// Shortest-path scenario as authored: explicit directed edges with raw metrics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Scenario {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub base_metric: Metric,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub path: Vec<String>,
}

impl Solution {
    pub fn new(path: Vec<String>) -> Self {
        Self { path }
    }
}

/// A scenario resolved under one objective. Immutable once built.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub nodes: NodeTable,
    pub edges: Vec<ResolvedEdge>,
    pub start: usize,
    pub end: usize,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl Challenge {
    pub fn new(scenario: &Scenario, objective: &Objective) -> ScenarioResult<Self> {
        let nodes = NodeTable::new(scenario.nodes.clone())?;
        let start = nodes
            .index_of(&scenario.start)
            .ok_or_else(|| ScenarioError::MissingStart {
                id: scenario.start.clone(),
            })?;
        let end = nodes.require(&scenario.end, "the scenario end")?;
        let edges = resolve_edges(
            &scenario.edges,
            scenario.base_metric,
            objective,
            &scenario.modifiers,
        )?;

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            let context = format!("edge {} -> {}", edge.from, edge.to);
            let u = nodes.require(&edge.from, &context)?;
            let v = nodes.require(&edge.to, &context)?;
            adjacency[u].push((v, edge.weight));
        }

        Ok(Self {
            nodes,
            edges,
            start,
            end,
            adjacency,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Outgoing `(node, weight)` pairs of `u`, parallel edges included.
    pub fn neighbours(&self, u: usize) -> &[(usize, f64)] {
        &self.adjacency[u]
    }

    /// Cheapest direct edge `u -> v`, if any.
    pub fn weight(&self, u: usize, v: usize) -> Option<f64> {
        self.adjacency[u]
            .iter()
            .filter(|&&(to, _)| to == v)
            .map(|&(_, w)| w)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn evaluate_solution(&self, solution: &Solution) -> Evaluation {
        let path = &solution.path;
        let mut violations = Vec::new();
        if path.is_empty() {
            violations.push("Path is empty".to_string());
            return Evaluation {
                cost: f64::INFINITY,
                violations,
            };
        }
        let start_id = self.nodes.id(self.start);
        let end_id = self.nodes.id(self.end);
        if path[0] != start_id {
            violations.push(format!(
                "Path must start at {} but starts at {}",
                start_id, path[0]
            ));
        }
        if path[path.len() - 1] != end_id {
            violations.push(format!(
                "Path must end at {} but ends at {}",
                end_id,
                path[path.len() - 1]
            ));
        }
        for id in path {
            if self.nodes.index_of(id).is_none() {
                violations.push(format!("Unknown node {}", id));
            }
        }

        let mut cost = 0.0;
        for step in path.windows(2) {
            let (Some(u), Some(v)) = (self.nodes.index_of(&step[0]), self.nodes.index_of(&step[1]))
            else {
                continue;
            };
            match self.weight(u, v) {
                Some(w) => cost += w,
                None => violations.push(format!("No edge {} -> {}", step[0], step[1])),
            }
        }
        Evaluation { cost, violations }
    }
}

impl Scenario {
    /// Layered network from a start `S` on the left to a target `T` on the right.
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Self {
        const BOX_W: f64 = 1200.0;
        const BOX_H: f64 = 640.0;
        const PAD: f64 = 60.0;
        const MIN_DIST: f64 = 76.0;
        const MAX_ATTEMPTS: usize = 6000;
        let (x0, x1, y0, y1) = (PAD, BOX_W - PAD, PAD, BOX_H - PAD);

        let mut rng = SmallRng::from_seed(seed.clone());
        let n = difficulty.num_nodes.clamp(6, 30);
        let density = difficulty.density.clamp(1, 3);

        let s = Node::new("S", x0, y0 + 80.0).with_label("Start");
        let t = Node::new("T", x1, y1 - 80.0).with_label("Target");

        let mut points: Vec<(f64, f64)> = Vec::with_capacity(n - 2);
        let mut attempts = 0;
        while points.len() < n - 2 && attempts < MAX_ATTEMPTS {
            attempts += 1;
            let x = rng.gen_range(x0..x1);
            let y = rng.gen_range(y0..y1);
            let clear = |px: f64, py: f64| (x - px).hypot(y - py) >= MIN_DIST;
            if clear(s.position.x, s.position.y)
                && clear(t.position.x, t.position.y)
                && points.iter().all(|&(px, py)| clear(px, py))
            {
                points.push((x, y));
            }
        }
        if points.len() < n - 2 {
            debug!("relaxing node spacing after {} attempts", attempts);
        }
        while points.len() < n - 2 {
            points.push((rng.gen_range(x0..x1), rng.gen_range(y0..y1)));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut nodes = vec![s];
        for (i, (x, y)) in points.into_iter().enumerate() {
            let id = format!("N{}", i + 1);
            nodes.push(Node::new(id.clone(), x.round(), y.round()).with_label(id));
        }
        nodes.push(t);

        let modes = [Mode::Road, Mode::Rail, Mode::Air];
        let leg = |a: &Node, b: &Node, mode: Mode| {
            let distance = euclidean(&a.position, &b.position) / 10.0;
            Edge::new(a.id.clone(), b.id.clone(), MetricVector::from_distance(distance, mode))
                .with_mode(mode)
        };
        let last = nodes.len() - 1;
        let mut edges: Vec<Edge> = Vec::new();
        for i in 0..last {
            for _ in 0..=density {
                let j = last.min(i + 1 + rng.gen_range(0..=2 + density));
                if edges
                    .iter()
                    .any(|e| e.from == nodes[i].id && e.to == nodes[j].id)
                {
                    continue;
                }
                let mode = modes[rng.gen_range(0..modes.len())];
                edges.push(leg(&nodes[i], &nodes[j], mode));
            }
        }

        if !edges.iter().any(|e| e.from == "S") {
            edges.push(leg(&nodes[0], &nodes[1], Mode::Road));
        }
        if !edges.iter().any(|e| e.to == "T") {
            edges.push(leg(&nodes[last - 1], &nodes[last], Mode::Road));
        }

        Scenario {
            nodes,
            edges,
            start: "S".to_string(),
            end: "T".to_string(),
            base_metric: Metric::Time,
            modifiers: Vec::new(),
        }
    }
}
