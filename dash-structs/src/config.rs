use crate::serializable_struct_with_getters;
use anyhow::{anyhow, Result};
use dash_utils::dejsonify;
use serde::{Deserialize, Serialize};

serializable_struct_with_getters! {
    EngineConfig {
        #[serde(default)]
        limits: SolverLimits,
        #[serde(default)]
        scoring: ScoringConfig,
        #[serde(default)]
        standings: StandingsConfig,
        #[serde(default = "default_cache_optima")]
        cache_optima: bool,
    }
}
serializable_struct_with_getters! {
    SolverLimits {
        /// Largest tour, start node included, still solved by Held-Karp.
        #[serde(default = "default_exact_tour_max_nodes")]
        exact_tour_max_nodes: usize,
        #[serde(default = "default_exact_routing_max_customers")]
        exact_routing_max_customers: usize,
    }
}
serializable_struct_with_getters! {
    ScoringConfig {
        #[serde(default = "default_max_score")]
        max_score: f64,
    }
}
serializable_struct_with_getters! {
    StandingsConfig {
        #[serde(default = "default_first_place_points")]
        first_place_points: u32,
    }
}

/// Largest tour, start node included, any configuration may solve exactly.
pub const MAX_EXACT_TOUR_NODES: usize = 20;
/// Largest customer count any configuration may partition exactly.
pub const MAX_EXACT_ROUTING_CUSTOMERS: usize = 16;

fn default_cache_optima() -> bool {
    true
}
fn default_exact_tour_max_nodes() -> usize {
    12
}
fn default_exact_routing_max_customers() -> usize {
    10
}
fn default_max_score() -> f64 {
    1000.0
}
fn default_first_place_points() -> u32 {
    24
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: SolverLimits::default(),
            scoring: ScoringConfig::default(),
            standings: StandingsConfig::default(),
            cache_optima: default_cache_optima(),
        }
    }
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            exact_tour_max_nodes: default_exact_tour_max_nodes(),
            exact_routing_max_customers: default_exact_routing_max_customers(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_score: default_max_score(),
        }
    }
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self {
            first_place_points: default_first_place_points(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            dejsonify(json).map_err(|e| anyhow!("Failed to parse engine config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scoring.max_score.is_finite() || self.scoring.max_score <= 0.0 {
            return Err(anyhow!(
                "scoring.max_score must be a positive number, got {}",
                self.scoring.max_score
            ));
        }
        if self.limits.exact_tour_max_nodes > MAX_EXACT_TOUR_NODES {
            return Err(anyhow!(
                "limits.exact_tour_max_nodes {} is too large for an exact solve",
                self.limits.exact_tour_max_nodes
            ));
        }
        if self.limits.exact_routing_max_customers > MAX_EXACT_ROUTING_CUSTOMERS {
            return Err(anyhow!(
                "limits.exact_routing_max_customers {} is too large for an exact solve",
                self.limits.exact_routing_max_customers
            ));
        }
        Ok(())
    }
}
