use crate::{cache::OptimumCache, scoring};
use anyhow::{anyhow, Result};
use dash_algorithms as algorithms;
use dash_challenges::{
    shortest_path, transportation, travelling_salesman, vehicle_routing, Evaluation, Optimum,
};
use dash_structs::{
    config::EngineConfig,
    core::{
        Candidate, GradedSubmission, ProblemKind, ReferenceOptimum, RoundPayload, Standing,
        Submission,
    },
};
use log::{debug, info, warn};
use logging_timer::time;
use std::sync::Arc;

/// Entry point for the round collaborator. Holds no scenario state beyond the
/// memoized reference optima.
pub struct Engine {
    config: EngineConfig,
    cache: OptimumCache,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            cache: OptimumCache::new(),
        }
    }
}

fn erase<S>(kind: ProblemKind, optimum: Optimum<S>, wrap: fn(S) -> Candidate) -> ReferenceOptimum {
    ReferenceOptimum {
        kind,
        cost: optimum.cost,
        method: optimum.method,
        candidate: wrap(optimum.solution),
        infeasible_reason: optimum.infeasible_reason,
    }
}

impl Engine {
    /// Refuses configurations whose limits would let an exact solver run past
    /// its tractable size.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: OptimumCache::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &OptimumCache {
        &self.cache
    }

    /// Reference optimum for the round, computed at most once per fingerprint
    /// while caching is enabled.
    pub fn reference_optimum(&self, payload: &RoundPayload) -> Result<Arc<ReferenceOptimum>> {
        if !self.config.cache_optima {
            return self.compute_optimum(payload).map(Arc::new);
        }
        let key = payload.fingerprint()?;
        self.cache.get_or_try_compute(&key, || {
            debug!("optimum cache miss for {}", key);
            self.compute_optimum(payload)
        })
    }

    #[time]
    pub fn compute_optimum(&self, payload: &RoundPayload) -> Result<ReferenceOptimum> {
        let limits = &self.config.limits;
        let kind = payload.kind();
        let optimum = match payload {
            RoundPayload::ShortestPath {
                scenario,
                objective,
            } => {
                let challenge = shortest_path::Challenge::new(scenario, objective)?;
                erase(kind, algorithms::shortest_path::solve(&challenge)?, Candidate::Path)
            }
            RoundPayload::Tour { scenario } => {
                let challenge = travelling_salesman::Challenge::new(scenario)?;
                erase(
                    kind,
                    algorithms::travelling_salesman::solve(&challenge, limits)?,
                    Candidate::Tour,
                )
            }
            RoundPayload::Routing { scenario } => {
                let challenge = vehicle_routing::Challenge::new(scenario)?;
                erase(
                    kind,
                    algorithms::vehicle_routing::solve(&challenge, limits)?,
                    Candidate::Routes,
                )
            }
            RoundPayload::Flow { instance } => {
                let challenge = transportation::Challenge::new(instance)?;
                erase(
                    kind,
                    algorithms::transportation::solve(&challenge)?,
                    Candidate::Shipments,
                )
            }
        };
        match &optimum.infeasible_reason {
            Some(reason) => warn!("{} round has no feasible optimum: {}", kind, reason),
            None => info!(
                "{} round optimum {} found by {} method",
                kind, optimum.cost, optimum.method
            ),
        }
        Ok(optimum)
    }

    /// Cost and every violated constraint of `candidate` within the round.
    pub fn evaluate(&self, payload: &RoundPayload, candidate: &Candidate) -> Result<Evaluation> {
        let kind = payload.kind();
        if !candidate.answers(kind) {
            return Err(anyhow!("Candidate does not answer a {} round", kind));
        }
        let evaluation = match (payload, candidate) {
            (
                RoundPayload::ShortestPath {
                    scenario,
                    objective,
                },
                Candidate::Path(solution),
            ) => shortest_path::Challenge::new(scenario, objective)?.evaluate_solution(solution),
            (RoundPayload::Tour { scenario }, Candidate::Tour(solution)) => {
                travelling_salesman::Challenge::new(scenario)?.evaluate_solution(solution)
            }
            (RoundPayload::Routing { scenario }, Candidate::Routes(solution)) => {
                vehicle_routing::Challenge::new(scenario)?.evaluate_solution(solution)
            }
            (RoundPayload::Flow { instance }, Candidate::Shipments(solution)) => {
                transportation::Challenge::new(instance)?.evaluate_solution(solution)
            }
            _ => return Err(anyhow!("Candidate does not answer a {} round", kind)),
        };
        Ok(evaluation)
    }

    pub fn grade(&self, payload: &RoundPayload, submission: &Submission) -> Result<GradedSubmission> {
        let optimum = self.reference_optimum(payload)?;
        let evaluation = self.evaluate(payload, &submission.candidate)?;
        let score = scoring::score(optimum.cost, &evaluation, self.config.scoring.max_score);
        debug!(
            "graded {}: cost {} score {} with {} violations",
            submission.name,
            evaluation.cost,
            score,
            evaluation.violations.len()
        );
        Ok(GradedSubmission {
            name: submission.name.clone(),
            elapsed_secs: submission.elapsed_secs,
            cost: evaluation.cost,
            violations: evaluation.violations,
            score,
            optimum_cost: optimum.is_feasible().then_some(optimum.cost),
        })
    }

    pub fn standings(&self, graded: &[GradedSubmission]) -> Vec<Standing> {
        scoring::compute_standings(graded, self.config.standings.first_place_points)
    }
}
