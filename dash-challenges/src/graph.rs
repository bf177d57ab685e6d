use crate::{ScenarioError, ScenarioResult};
use dash_utils::{DistanceMetric, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    #[serde(flatten)]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Point::new(x, y),
            label: None,
            demand: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Validated node set: ids are unique and every coordinate is finite.
/// Node indices follow declaration order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Node>", into = "Vec<Node>")]
pub struct NodeTable {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeTable {
    pub fn new(nodes: Vec<Node>) -> ScenarioResult<Self> {
        if nodes.is_empty() {
            return Err(ScenarioError::EmptyNodeSet);
        }
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if !node.position.is_finite() {
                return Err(ScenarioError::NonFiniteCoordinate {
                    id: node.id.clone(),
                });
            }
            if index.insert(node.id.clone(), i).is_some() {
                return Err(ScenarioError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }
        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Looks up `id`, reporting `context` when it is missing.
    pub fn require(&self, id: &str, context: &str) -> ScenarioResult<usize> {
        self.index_of(id).ok_or_else(|| ScenarioError::UnknownNode {
            id: id.to_string(),
            context: context.to_string(),
        })
    }

    pub fn id(&self, idx: usize) -> &str {
        &self.nodes[idx].id
    }

    pub fn ids(&self, order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| self.nodes[i].id.clone()).collect()
    }

    pub fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    pub fn distance_matrix(&self, metric: DistanceMetric) -> Vec<Vec<f64>> {
        metric.matrix(&self.positions())
    }
}

impl TryFrom<Vec<Node>> for NodeTable {
    type Error = ScenarioError;

    fn try_from(nodes: Vec<Node>) -> Result<Self, Self::Error> {
        NodeTable::new(nodes)
    }
}

impl From<NodeTable> for Vec<Node> {
    fn from(table: NodeTable) -> Self {
        table.nodes
    }
}
