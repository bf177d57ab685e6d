/// Malformed scenario input. These are rejected at the boundary, before any
/// solver runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    DuplicateArc {
        key: String,
    },
    DuplicateNode {
        id: String,
    },
    EmptyNodeSet,
    InvalidArc {
        key: String,
        reason: String,
    },
    InvalidBlendWeight {
        alpha: f64,
    },
    InvalidCapacity {
        capacity: f64,
    },
    InvalidDemand {
        id: String,
        demand: f64,
    },
    InvalidEdgeWeight {
        from: String,
        to: String,
        reason: String,
    },
    InvalidModifier {
        id: String,
        factor: f64,
    },
    InvalidQuantity {
        id: String,
        quantity: f64,
    },
    MissingStart {
        id: String,
    },
    NonFiniteCoordinate {
        id: String,
    },
    UnknownNode {
        id: String,
        context: String,
    },
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::DuplicateArc { key } => {
                write!(f, "Arc '{}' is declared more than once", key)
            }
            ScenarioError::DuplicateNode { id } => {
                write!(f, "Node id '{}' is declared more than once", id)
            }
            ScenarioError::EmptyNodeSet => write!(f, "Scenario has no nodes"),
            ScenarioError::InvalidArc { key, reason } => {
                write!(f, "Arc '{}' is invalid: {}", key, reason)
            }
            ScenarioError::InvalidBlendWeight { alpha } => write!(
                f,
                "Blend weight alpha '{}' must lie within [0, 1]",
                alpha
            ),
            ScenarioError::InvalidCapacity { capacity } => write!(
                f,
                "Vehicle capacity '{}' must be a positive finite number",
                capacity
            ),
            ScenarioError::InvalidDemand { id, demand } => write!(
                f,
                "Demand '{}' of node '{}' must be a non-negative finite number",
                demand, id
            ),
            ScenarioError::InvalidEdgeWeight { from, to, reason } => {
                write!(f, "Edge '{}' -> '{}' has an invalid weight: {}", from, to, reason)
            }
            ScenarioError::InvalidModifier { id, factor } => write!(
                f,
                "Modifier '{}' has factor '{}', expected a positive finite number",
                id, factor
            ),
            ScenarioError::InvalidQuantity { id, quantity } => write!(
                f,
                "Quantity '{}' of node '{}' must be a non-negative finite number",
                quantity, id
            ),
            ScenarioError::MissingStart { id } => {
                write!(f, "Start node '{}' is not part of the scenario", id)
            }
            ScenarioError::NonFiniteCoordinate { id } => {
                write!(f, "Node '{}' has a non-finite coordinate", id)
            }
            ScenarioError::UnknownNode { id, context } => {
                write!(f, "Unknown node '{}' referenced by {}", id, context)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

pub type ScenarioResult<T> = std::result::Result<T, ScenarioError>;
