use dash_challenges::Evaluation;
use dash_structs::core::{GradedSubmission, Standing};

/// `max_score * optimum / max(candidate, optimum)`, rounded. Infeasible
/// candidates and rounds without a finite positive optimum score zero.
pub fn score(optimum: f64, evaluation: &Evaluation, max_score: f64) -> u32 {
    if !evaluation.is_feasible() || !optimum.is_finite() || optimum <= 0.0 {
        return 0;
    }
    (max_score * optimum / evaluation.cost.max(optimum)).round() as u32
}

/// Best score first, faster submission first on equal scores.
pub fn compute_standings(graded: &[GradedSubmission], first_place_points: u32) -> Vec<Standing> {
    let mut order: Vec<&GradedSubmission> = graded.iter().collect();
    order.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.elapsed_secs.total_cmp(&b.elapsed_secs))
    });
    order
        .into_iter()
        .enumerate()
        .map(|(i, g)| {
            let rank = i + 1;
            Standing {
                rank,
                name: g.name.clone(),
                score: g.score,
                elapsed_secs: g.elapsed_secs,
                points: first_place_points.saturating_sub(rank as u32),
            }
        })
        .collect()
}
