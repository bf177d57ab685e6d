use crate::{HashMap, SolverTrait};
use anyhow::{anyhow, Result};
use dash_challenges::{transportation::*, Method, Optimum, TOLERANCE};
use logging_timer::time;
use std::{cmp::Ordering, collections::BTreeMap, collections::BinaryHeap};

pub struct Solver;

impl SolverTrait for Solver {
    type C = Challenge;
    type S = Solution;
    const METHOD: Method = Method::Exact;

    fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
        solve_challenge(challenge)
    }
}

struct ResidualEdge {
    to: usize,
    capacity: f64,
    flow: f64,
    cost: f64,
}

impl ResidualEdge {
    fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

/// Residual network. Edge `e ^ 1` is the reverse of edge `e`.
struct Network {
    edges: Vec<ResidualEdge>,
    adjacency: Vec<Vec<usize>>,
}

impl Network {
    fn new(num_nodes: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); num_nodes],
        }
    }

    fn add_node(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    fn add_edge(&mut self, from: usize, to: usize, capacity: f64, cost: f64) -> usize {
        let id = self.edges.len();
        self.edges.push(ResidualEdge {
            to,
            capacity,
            flow: 0.0,
            cost,
        });
        self.edges.push(ResidualEdge {
            to: from,
            capacity: 0.0,
            flow: 0.0,
            cost: -cost,
        });
        self.adjacency[from].push(id);
        self.adjacency[to].push(id + 1);
        id
    }

    fn push(&mut self, edge: usize, amount: f64) {
        self.edges[edge].flow += amount;
        self.edges[edge ^ 1].flow -= amount;
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

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

/// Dijkstra over reduced costs. Returns distances and the edge used to reach each node.
fn shortest_paths(network: &Network, potential: &[f64], source: usize) -> (Vec<f64>, Vec<Option<usize>>) {
    let n = network.adjacency.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut via = vec![None; n];
    let mut frontier = BinaryHeap::new();
    dist[source] = 0.0;
    frontier.push(State {
        cost: 0.0,
        node: source,
    });
    while let Some(State { cost, node }) = frontier.pop() {
        if cost > dist[node] {
            continue;
        }
        for &e in &network.adjacency[node] {
            let edge = &network.edges[e];
            if edge.residual() <= TOLERANCE {
                continue;
            }
            // potentials keep reduced costs non-negative up to rounding
            let reduced = (edge.cost + potential[node] - potential[edge.to]).max(0.0);
            let candidate = cost + reduced;
            if candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                via[edge.to] = Some(e);
                frontier.push(State {
                    cost: candidate,
                    node: edge.to,
                });
            }
        }
    }
    (dist, via)
}

#[time]
pub fn solve_challenge(challenge: &Challenge) -> Result<Optimum<Solution>> {
    let instance = &challenge.instance;
    if !instance.is_balanced() {
        return Ok(Optimum::infeasible(
            Solution::default(),
            Method::Exact,
            format!(
                "Unbalanced: supply={} != demand={}",
                instance.total_supply(),
                instance.total_demand()
            ),
        ));
    }

    // every entity enters and leaves through the same node, except a capped hub
    // which is split into an inbound and an outbound node
    let mut network = Network::new(0);
    let source = network.add_node();
    let sink = network.add_node();
    let mut inbound: HashMap<&str, usize> = HashMap::default();
    let mut outbound: HashMap<&str, usize> = HashMap::default();
    for t in instance.supplies.iter().chain(instance.demands.iter()) {
        let v = network.add_node();
        inbound.insert(t.id.as_str(), v);
        outbound.insert(t.id.as_str(), v);
    }
    for hub in &instance.hubs {
        let v = network.add_node();
        inbound.insert(hub.id.as_str(), v);
        match hub.capacity {
            Some(cap) => {
                let out = network.add_node();
                network.add_edge(v, out, cap, 0.0);
                outbound.insert(hub.id.as_str(), out);
            }
            None => {
                outbound.insert(hub.id.as_str(), v);
            }
        }
    }
    for s in &instance.supplies {
        network.add_edge(source, outbound[s.id.as_str()], s.quantity, 0.0);
    }
    for d in &instance.demands {
        network.add_edge(inbound[d.id.as_str()], sink, d.quantity, 0.0);
    }
    let mut arc_edges = Vec::with_capacity(instance.arcs.len());
    for arc in &instance.arcs {
        let (Some(&u), Some(&v)) = (outbound.get(arc.from.as_str()), inbound.get(arc.to.as_str()))
        else {
            return Err(anyhow!("Arc {} joins undeclared nodes", arc.key()));
        };
        let capacity = arc.capacity.unwrap_or(f64::INFINITY);
        arc_edges.push(network.add_edge(u, v, capacity, arc.cost));
    }

    let required = instance.total_demand();
    let mut potential = vec![0.0; network.adjacency.len()];
    let mut pushed = 0.0;
    while pushed < required - TOLERANCE {
        let (dist, via) = shortest_paths(&network, &potential, source);
        if dist[sink].is_infinite() {
            break;
        }
        for (p, d) in potential.iter_mut().zip(&dist) {
            if d.is_finite() {
                *p += d;
            }
        }

        let mut path = Vec::new();
        let mut bottleneck = required - pushed;
        let mut node = sink;
        while node != source {
            let e = via[node].ok_or_else(|| anyhow!("Augmenting path broke at node {}", node))?;
            bottleneck = bottleneck.min(network.edges[e].residual());
            path.push(e);
            node = network.edges[e ^ 1].to;
        }
        for e in path {
            network.push(e, bottleneck);
        }
        pushed += bottleneck;
    }

    let mut flows = BTreeMap::new();
    for (arc, &e) in instance.arcs.iter().zip(&arc_edges) {
        let flow = network.edges[e].flow;
        if flow > TOLERANCE {
            flows.insert(arc.key(), flow);
        }
    }
    let solution = Solution::new(flows);
    if pushed < required - TOLERANCE {
        return Ok(Optimum::infeasible(
            solution,
            Method::Exact,
            "Could not push all demand.",
        ));
    }
    let cost = solution
        .flows
        .iter()
        .filter_map(|(key, q)| challenge.arc(key).map(|arc| q * arc.cost))
        .sum();
    Ok(Optimum::new(cost, solution, Method::Exact))
}
