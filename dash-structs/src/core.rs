use crate::serializable_struct_with_getters;
use anyhow::{anyhow, Result};
use dash_challenges::{
    cost_serde, resolver::Objective, shortest_path, transportation, travelling_salesman,
    vehicle_routing, Evaluation, Method,
};
use dash_utils::{fingerprint, DistanceMetric};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    ShortestPath,
    Tour,
    Picking,
    Routing,
    Transportation,
    Transshipment,
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemKind::ShortestPath => write!(f, "shortest_path"),
            ProblemKind::Tour => write!(f, "tour"),
            ProblemKind::Picking => write!(f, "picking"),
            ProblemKind::Routing => write!(f, "routing"),
            ProblemKind::Transportation => write!(f, "transportation"),
            ProblemKind::Transshipment => write!(f, "transshipment"),
        }
    }
}

/// The frozen problem of one round, as handed over by the round collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundPayload {
    ShortestPath {
        scenario: shortest_path::Scenario,
        #[serde(default)]
        objective: Objective,
    },
    Tour {
        scenario: travelling_salesman::Scenario,
    },
    Routing {
        scenario: vehicle_routing::Scenario,
    },
    Flow {
        instance: transportation::FlowInstance,
    },
}

impl RoundPayload {
    pub fn kind(&self) -> ProblemKind {
        match self {
            RoundPayload::ShortestPath { .. } => ProblemKind::ShortestPath,
            RoundPayload::Tour { scenario } => match scenario.metric {
                DistanceMetric::Manhattan => ProblemKind::Picking,
                DistanceMetric::Euclidean => ProblemKind::Tour,
            },
            RoundPayload::Routing { .. } => ProblemKind::Routing,
            RoundPayload::Flow { instance } if instance.is_transshipment() => {
                ProblemKind::Transshipment
            }
            RoundPayload::Flow { .. } => ProblemKind::Transportation,
        }
    }

    /// Identity of the scenario together with its objective parameters.
    pub fn fingerprint(&self) -> Result<String> {
        fingerprint(self).map_err(|e| anyhow!("Failed to fingerprint {} round: {}", self.kind(), e))
    }
}

/// A learner's candidate, shaped by the problem it answers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "solution", rename_all = "snake_case")]
pub enum Candidate {
    Path(shortest_path::Solution),
    Tour(travelling_salesman::Solution),
    Routes(vehicle_routing::Solution),
    Shipments(transportation::Solution),
}

impl Candidate {
    /// Problem kinds this candidate can answer.
    pub fn answers(&self, kind: ProblemKind) -> bool {
        matches!(
            (self, kind),
            (Candidate::Path(_), ProblemKind::ShortestPath)
                | (Candidate::Tour(_), ProblemKind::Tour | ProblemKind::Picking)
                | (Candidate::Routes(_), ProblemKind::Routing)
                | (
                    Candidate::Shipments(_),
                    ProblemKind::Transportation | ProblemKind::Transshipment
                )
        )
    }
}

/// Type-erased reference optimum kept per round.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferenceOptimum {
    pub kind: ProblemKind,
    #[serde(with = "cost_serde")]
    pub cost: f64,
    pub method: Method,
    pub candidate: Candidate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infeasible_reason: Option<String>,
}

impl ReferenceOptimum {
    pub fn is_feasible(&self) -> bool {
        self.infeasible_reason.is_none() && self.cost.is_finite()
    }
}

serializable_struct_with_getters! {
    Submission {
        name: String,
        elapsed_secs: f64,
        candidate: Candidate,
    }
}
serializable_struct_with_getters! {
    GradedSubmission {
        name: String,
        elapsed_secs: f64,
        #[serde(with = "cost_serde")]
        cost: f64,
        violations: Vec<String>,
        score: u32,
        optimum_cost: Option<f64>,
    }
}
serializable_struct_with_getters! {
    Standing {
        rank: usize,
        name: String,
        score: u32,
        elapsed_secs: f64,
        points: u32,
    }
}

impl Submission {
    pub fn new(name: impl Into<String>, elapsed_secs: f64, candidate: Candidate) -> Self {
        Self {
            name: name.into(),
            elapsed_secs,
            candidate,
        }
    }
}

impl GradedSubmission {
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty() && self.cost.is_finite()
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            cost: self.cost,
            violations: self.violations.clone(),
        }
    }
}
