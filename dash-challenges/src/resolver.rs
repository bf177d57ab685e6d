//! Weighted-graph resolver.
//!
//! Turns authored edge data (a bare number or a partial metric vector) into the
//! single strictly positive scalar that solvers and the evaluator work with.

use crate::{ScenarioError, ScenarioResult};
use serde::{Deserialize, Serialize};

/// Floor applied to every effective weight.
pub const MIN_EFFECTIVE_WEIGHT: f64 = 0.1;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Time,
    Cost,
    Co2,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Time, Metric::Cost, Metric::Co2];
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Time => write!(f, "time"),
            Metric::Cost => write!(f, "cost"),
            Metric::Co2 => write!(f, "co2"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Road,
    Rail,
    Air,
    Other,
}

impl Mode {
    /// Per-unit-distance conversion factor for `metric`.
    pub fn factor(&self, metric: Metric) -> f64 {
        let (time, cost, co2) = match self {
            Mode::Road => (1.0, 85.0, 1.2),
            Mode::Rail => (0.85, 60.0, 0.7),
            Mode::Air => (0.4, 140.0, 2.1),
            Mode::Other => (1.0, 90.0, 1.0),
        };
        match metric {
            Metric::Time => time,
            Metric::Cost => cost,
            Metric::Co2 => co2,
        }
    }

    fn minimum(metric: Metric) -> f64 {
        match metric {
            Metric::Time => 2.0,
            Metric::Cost => 50.0,
            Metric::Co2 => 5.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct MetricVector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
}

impl MetricVector {
    pub fn new(time: f64, cost: f64, co2: f64) -> Self {
        Self {
            time: Some(time),
            cost: Some(cost),
            co2: Some(co2),
        }
    }

    /// Classroom metrics for a leg of length `distance` travelled by `mode`.
    pub fn from_distance(distance: f64, mode: Mode) -> Self {
        let derive = |metric: Metric| {
            (distance * mode.factor(metric))
                .round()
                .max(Mode::minimum(metric))
        };
        Self::new(
            derive(Metric::Time),
            derive(Metric::Cost),
            derive(Metric::Co2),
        )
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Time => self.time,
            Metric::Cost => self.cost,
            Metric::Co2 => self.co2,
        }
    }

    fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Time => self.time = Some(value),
            Metric::Cost => self.cost = Some(value),
            Metric::Co2 => self.co2 = Some(value),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(untagged)]
pub enum EdgeWeight {
    Scalar(f64),
    Vector(MetricVector),
}

impl From<f64> for EdgeWeight {
    fn from(w: f64) -> Self {
        EdgeWeight::Scalar(w)
    }
}

impl From<MetricVector> for EdgeWeight {
    fn from(m: MetricVector) -> Self {
        EdgeWeight::Vector(m)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight: EdgeWeight,
    #[serde(default)]
    pub mode: Mode,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: impl Into<EdgeWeight>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: weight.into(),
            mode: Mode::default(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    fn invalid(&self, reason: impl Into<String>) -> ScenarioError {
        ScenarioError::InvalidEdgeWeight {
            from: self.from.clone(),
            to: self.to.clone(),
            reason: reason.into(),
        }
    }

    /// Complete metric vector for this edge. A scalar is read in `base`; absent
    /// metrics are derived from a present one through the mode's factors.
    pub fn metrics(&self, base: Metric) -> ScenarioResult<MetricVector> {
        let mut metrics = match self.weight {
            EdgeWeight::Scalar(w) => {
                let mut m = MetricVector::default();
                m.set(base, w);
                m
            }
            EdgeWeight::Vector(m) => m,
        };
        for metric in Metric::ALL {
            if let Some(value) = metrics.get(metric) {
                if !value.is_finite() || value < 0.0 {
                    return Err(self.invalid(format!("{} is {}", metric, value)));
                }
            }
        }
        let reference = std::iter::once(base)
            .chain(Metric::ALL)
            .find(|&m| metrics.get(m).is_some())
            .ok_or_else(|| self.invalid("no metric given"))?;
        let reference_value = metrics.get(reference).unwrap_or_default();
        let derived =
            MetricVector::from_distance(reference_value / self.mode.factor(reference), self.mode);
        for metric in Metric::ALL {
            if metrics.get(metric).is_none() {
                metrics.set(metric, derived.get(metric).unwrap_or_default());
            }
        }
        Ok(metrics)
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Objective {
    Single { metric: Metric },
    Dual { a: Metric, b: Metric, alpha: f64 },
}

impl Default for Objective {
    fn default() -> Self {
        Objective::Single {
            metric: Metric::Time,
        }
    }
}

impl Objective {
    pub fn single(metric: Metric) -> Self {
        Objective::Single { metric }
    }

    pub fn dual(a: Metric, b: Metric, alpha: f64) -> ScenarioResult<Self> {
        let objective = Objective::Dual { a, b, alpha };
        objective.validate()?;
        Ok(objective)
    }

    pub fn validate(&self) -> ScenarioResult<()> {
        match *self {
            Objective::Dual { alpha, .. } if !(0.0..=1.0).contains(&alpha) => {
                Err(ScenarioError::InvalidBlendWeight { alpha })
            }
            _ => Ok(()),
        }
    }

    pub fn value(&self, metrics: &MetricVector) -> f64 {
        match *self {
            Objective::Single { metric } => metrics.get(metric).unwrap_or_default(),
            Objective::Dual { a, b, alpha } => {
                alpha * metrics.get(a).unwrap_or_default()
                    + (1.0 - alpha) * metrics.get(b).unwrap_or_default()
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierScope {
    All,
    Edge { from: String, to: String },
    Mode { mode: Mode },
    FromAny { ids: Vec<String> },
}

/// Scenario-wide multiplicative adjustment, e.g. congestion or a rail discount.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Modifier {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub factor: f64,
    pub applies_to: ModifierScope,
}

impl Modifier {
    pub fn new(id: impl Into<String>, factor: f64, applies_to: ModifierScope) -> Self {
        Self {
            id: id.into(),
            label: None,
            factor,
            applies_to,
        }
    }

    pub fn validate(&self) -> ScenarioResult<()> {
        if self.factor.is_finite() && self.factor > 0.0 {
            Ok(())
        } else {
            Err(ScenarioError::InvalidModifier {
                id: self.id.clone(),
                factor: self.factor,
            })
        }
    }

    pub fn factor_for(&self, edge: &Edge) -> f64 {
        let applies = match &self.applies_to {
            ModifierScope::All => true,
            ModifierScope::Edge { from, to } => edge.from == *from && edge.to == *to,
            ModifierScope::Mode { mode } => edge.mode == *mode,
            ModifierScope::FromAny { ids } => ids.contains(&edge.from),
        };
        if applies {
            self.factor
        } else {
            1.0
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResolvedEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub mode: Mode,
}

/// Effective weight of one edge under `objective` and `modifiers`.
pub fn effective_weight(
    edge: &Edge,
    base: Metric,
    objective: &Objective,
    modifiers: &[Modifier],
) -> ScenarioResult<f64> {
    let mut weight = objective.value(&edge.metrics(base)?);
    if !modifiers.is_empty() {
        let factor: f64 = modifiers.iter().map(|m| m.factor_for(edge)).product();
        weight = (weight * factor * 10.0).round() / 10.0;
    }
    Ok(weight.max(MIN_EFFECTIVE_WEIGHT))
}

pub fn resolve_edges(
    edges: &[Edge],
    base: Metric,
    objective: &Objective,
    modifiers: &[Modifier],
) -> ScenarioResult<Vec<ResolvedEdge>> {
    objective.validate()?;
    for modifier in modifiers {
        modifier.validate()?;
    }
    edges
        .iter()
        .map(|edge| {
            Ok(ResolvedEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                weight: effective_weight(edge, base, objective, modifiers)?,
                mode: edge.mode,
            })
        })
        .collect()
}
