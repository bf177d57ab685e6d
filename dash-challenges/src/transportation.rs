//! Transportation and transshipment instances and the shipment-plan checker.

use crate::{Evaluation, ScenarioError, ScenarioResult, TOLERANCE};
use rand::{rngs::SmallRng, seq::index::sample, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_supplies: usize,
    pub num_demands: usize,
}

/// A supply or demand node with its declared quantity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Terminal {
    pub id: String,
    pub quantity: f64,
}

impl Terminal {
    pub fn new(id: impl Into<String>, quantity: f64) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hub {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowArc {
    pub from: String,
    pub to: String,
    pub cost: f64,
    /// `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
}

impl FlowArc {
    pub fn new(from: impl Into<String>, to: impl Into<String>, cost: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cost,
            capacity: None,
        }
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn key(&self) -> String {
        arc_key(&self.from, &self.to)
    }
}

pub fn arc_key(from: &str, to: &str) -> String {
    format!("{}>{}", from, to)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FlowInstance {
    pub supplies: Vec<Terminal>,
    pub demands: Vec<Terminal>,
    #[serde(default)]
    pub hubs: Vec<Hub>,
    pub arcs: Vec<FlowArc>,
}

impl FlowInstance {
    /// Classic transportation table: one unbounded arc per `"S>D"` cost entry.
    pub fn transportation(
        supplies: Vec<Terminal>,
        demands: Vec<Terminal>,
        costs: &BTreeMap<String, f64>,
    ) -> Self {
        let mut arcs = Vec::new();
        for s in &supplies {
            for d in &demands {
                if let Some(&cost) = costs.get(&arc_key(&s.id, &d.id)) {
                    arcs.push(FlowArc::new(s.id.clone(), d.id.clone(), cost));
                }
            }
        }
        Self {
            supplies,
            demands,
            hubs: Vec::new(),
            arcs,
        }
    }

    pub fn total_supply(&self) -> f64 {
        self.supplies.iter().map(|s| s.quantity).sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.demands.iter().map(|d| d.quantity).sum()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total_supply() - self.total_demand()).abs() <= TOLERANCE
    }

    pub fn is_transshipment(&self) -> bool {
        !self.hubs.is_empty()
    }

    /// Balanced transportation table with integer costs in 1..=9.
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Self {
        let mut rng = SmallRng::from_seed(seed.clone());
        let num_supplies = difficulty.num_supplies.clamp(1, 8);
        let num_demands = difficulty.num_demands.clamp(1, 8);

        let demands: Vec<Terminal> = (0..num_demands)
            .map(|i| Terminal::new(format!("D{}", i + 1), rng.gen_range(10..=40) as f64))
            .collect();
        let total: i64 = demands.iter().map(|d| d.quantity as i64).sum();

        // split the total demand into num_supplies positive parts at distinct cuts
        let mut cuts: Vec<i64> = sample(&mut rng, total as usize - 1, num_supplies - 1)
            .into_iter()
            .map(|i| i as i64 + 1)
            .collect();
        cuts.sort_unstable();
        let mut bounds = vec![0];
        bounds.extend(cuts);
        bounds.push(total);
        let supplies: Vec<Terminal> = bounds
            .windows(2)
            .enumerate()
            .map(|(i, w)| Terminal::new(format!("S{}", i + 1), (w[1] - w[0]) as f64))
            .collect();

        let mut costs = BTreeMap::new();
        for s in &supplies {
            for d in &demands {
                costs.insert(arc_key(&s.id, &d.id), rng.gen_range(1..=9) as f64);
            }
        }
        Self::transportation(supplies, demands, &costs)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Supply,
    Demand,
    Hub,
}

/// A validated flow instance. Ids are unique across roles and every arc joins
/// declared nodes.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub instance: FlowInstance,
    roles: HashMap<String, Role>,
    arcs: HashMap<String, usize>,
}

impl Challenge {
    pub fn new(instance: &FlowInstance) -> ScenarioResult<Self> {
        let mut roles = HashMap::new();
        let terminals = instance
            .supplies
            .iter()
            .map(|t| (t, Role::Supply))
            .chain(instance.demands.iter().map(|t| (t, Role::Demand)));
        for (terminal, role) in terminals {
            if !terminal.quantity.is_finite() || terminal.quantity < 0.0 {
                return Err(ScenarioError::InvalidQuantity {
                    id: terminal.id.clone(),
                    quantity: terminal.quantity,
                });
            }
            if roles.insert(terminal.id.clone(), role).is_some() {
                return Err(ScenarioError::DuplicateNode {
                    id: terminal.id.clone(),
                });
            }
        }
        for hub in &instance.hubs {
            if let Some(cap) = hub.capacity {
                if cap.is_nan() || cap < 0.0 {
                    return Err(ScenarioError::InvalidQuantity {
                        id: hub.id.clone(),
                        quantity: cap,
                    });
                }
            }
            if roles.insert(hub.id.clone(), Role::Hub).is_some() {
                return Err(ScenarioError::DuplicateNode { id: hub.id.clone() });
            }
        }

        let mut arcs = HashMap::new();
        for (i, arc) in instance.arcs.iter().enumerate() {
            let key = arc.key();
            for id in [&arc.from, &arc.to] {
                if !roles.contains_key(id) {
                    return Err(ScenarioError::UnknownNode {
                        id: id.clone(),
                        context: format!("arc {}", key),
                    });
                }
            }
            if !arc.cost.is_finite() || arc.cost < 0.0 {
                return Err(ScenarioError::InvalidArc {
                    key,
                    reason: format!("cost {} must be a non-negative finite number", arc.cost),
                });
            }
            if let Some(cap) = arc.capacity {
                if cap.is_nan() || cap < 0.0 {
                    return Err(ScenarioError::InvalidArc {
                        key,
                        reason: format!("capacity {} must be non-negative", cap),
                    });
                }
            }
            if arcs.insert(key.clone(), i).is_some() {
                return Err(ScenarioError::DuplicateArc { key });
            }
        }

        Ok(Self {
            instance: instance.clone(),
            roles,
            arcs,
        })
    }

    pub fn role(&self, id: &str) -> Option<Role> {
        self.roles.get(id).copied()
    }

    pub fn arc(&self, key: &str) -> Option<&FlowArc> {
        self.arcs.get(key).map(|&i| &self.instance.arcs[i])
    }

    pub fn evaluate_solution(&self, solution: &Solution) -> Evaluation {
        let mut violations = Vec::new();
        let mut cost = 0.0;
        let mut inflow: HashMap<&str, f64> = HashMap::new();
        let mut outflow: HashMap<&str, f64> = HashMap::new();

        for (key, &quantity) in &solution.flows {
            if !quantity.is_finite() || quantity < 0.0 {
                violations.push(format!("Arc {}: quantity {} is not a non-negative number", key, quantity));
                continue;
            }
            let Some(arc) = self.arc(key) else {
                if quantity > 0.0 {
                    violations.push(format!("Arc {} not allowed.", key));
                }
                continue;
            };
            if let Some(cap) = arc.capacity {
                if quantity > cap + TOLERANCE {
                    violations.push(format!(
                        "Arc {}: flow {} exceeds capacity {}",
                        key, quantity, cap
                    ));
                }
            }
            cost += quantity * arc.cost;
            *outflow.entry(arc.from.as_str()).or_default() += quantity;
            *inflow.entry(arc.to.as_str()).or_default() += quantity;
        }

        let flow = |map: &HashMap<&str, f64>, id: &str| map.get(id).copied().unwrap_or_default();
        for s in &self.instance.supplies {
            let sent = flow(&outflow, &s.id) - flow(&inflow, &s.id);
            if (sent - s.quantity).abs() > TOLERANCE {
                violations.push(format!("Supply {}: sent {} != {}", s.id, sent, s.quantity));
            }
        }
        for d in &self.instance.demands {
            let received = flow(&inflow, &d.id) - flow(&outflow, &d.id);
            if (received - d.quantity).abs() > TOLERANCE {
                violations.push(format!(
                    "Demand {}: received {} != {}",
                    d.id, received, d.quantity
                ));
            }
        }
        for hub in &self.instance.hubs {
            let received = flow(&inflow, &hub.id);
            let sent = flow(&outflow, &hub.id);
            if (received - sent).abs() > TOLERANCE {
                violations.push(format!(
                    "Hub {}: received {} but sent {}",
                    hub.id, received, sent
                ));
            }
            if let Some(cap) = hub.capacity {
                if received > cap + TOLERANCE {
                    violations.push(format!(
                        "Hub {}: throughput {} exceeds cap {}",
                        hub.id, received, cap
                    ));
                }
            }
        }

        Evaluation { cost, violations }
    }
}

/// Shipment plan keyed by `"from>to"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Solution {
    pub flows: BTreeMap<String, f64>,
}

impl Solution {
    pub fn new(flows: BTreeMap<String, f64>) -> Self {
        Self { flows }
    }

    fn total_where<F>(&self, keep: F) -> f64
    where
        F: Fn(&str, &str) -> bool,
    {
        self.flows
            .iter()
            .filter_map(|(key, q)| key.split_once('>').map(|(u, v)| (u, v, q)))
            .filter(|(u, v, _)| keep(u, v))
            .map(|(_, _, q)| q)
            .sum()
    }

    pub fn flow_into(&self, id: &str) -> f64 {
        self.total_where(|_, v| v == id)
    }

    pub fn flow_out_of(&self, id: &str) -> f64 {
        self.total_where(|u, _| u == id)
    }
}
