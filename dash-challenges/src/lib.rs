use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::*;
pub mod graph;
pub use graph::*;
pub mod resolver;

#[cfg(feature = "shortest_path")]
pub mod shortest_path;
#[cfg(feature = "travelling_salesman")]
pub mod travelling_salesman;
#[cfg(feature = "vehicle_routing")]
pub mod vehicle_routing;
#[cfg(feature = "transportation")]
pub mod transportation;

/// Absolute slack used when comparing accumulated costs and quantities.
pub const TOLERANCE: f64 = 1e-6;

/// How a reported optimum was produced. Only `Exact` results may be called optimal.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Exact,
    Heuristic,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Exact => write!(f, "exact"),
            Method::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Reference result for a scenario. An unreachable or infeasible instance has an
/// infinite cost and a reason a learner can read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Optimum<S> {
    #[serde(with = "cost_serde")]
    pub cost: f64,
    pub solution: S,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infeasible_reason: Option<String>,
}

impl<S> Optimum<S> {
    pub fn new(cost: f64, solution: S, method: Method) -> Self {
        Self {
            cost,
            solution,
            method,
            infeasible_reason: None,
        }
    }

    pub fn infeasible(solution: S, method: Method, reason: impl Into<String>) -> Self {
        Self {
            cost: f64::INFINITY,
            solution,
            method,
            infeasible_reason: Some(reason.into()),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.infeasible_reason.is_none() && self.cost.is_finite()
    }

    pub fn is_optimal(&self) -> bool {
        self.method == Method::Exact && self.is_feasible()
    }
}

/// Outcome of grading a candidate. Every broken constraint is listed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    #[serde(with = "cost_serde")]
    pub cost: f64,
    pub violations: Vec<String>,
}

impl Evaluation {
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty() && self.cost.is_finite()
    }

    /// Strict verdict: the cost when feasible, otherwise every violation joined.
    pub fn verify(&self) -> Result<f64> {
        if !self.violations.is_empty() {
            return Err(anyhow!("Invalid solution: {}", self.violations.join("; ")));
        }
        if !self.cost.is_finite() {
            return Err(anyhow!("Invalid solution: cost is not finite"));
        }
        Ok(self.cost)
    }
}

/// Serializes a non-finite cost as `null` and reads `null` back as infinity.
pub mod cost_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(cost: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if cost.is_finite() {
            serializer.serialize_some(cost)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
