use crate::record::{Goal, PersonalRecord};

/// Heaviest recorded weight for `exercise` (case-insensitive), or 0.
pub fn highest_pr(prs: &[PersonalRecord], exercise: &str) -> f64 {
    prs.iter()
        .filter(|pr| pr.matches_exercise(exercise))
        .map(|pr| pr.weight)
        .fold(0.0, f64::max)
}

/// Percent of `target` reached, clamped to `0..=100`.
pub fn calculate_progress(current: f64, target: f64) -> f64 {
    if target <= 0.0 || target.is_nan() {
        return 0.0;
    }
    let progress = current / target * 100.0;
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Bring every goal's `current` back in line with `prs`.
///
/// Returns true when at least one goal changed, i.e. when the goal
/// collection needs to be written and redrawn.
pub fn recompute_goal_progress(prs: &[PersonalRecord], goals: &mut [Goal]) -> bool {
    let mut changed = false;
    for goal in goals.iter_mut() {
        let best = highest_pr(prs, &goal.exercise);
        if goal.current != best {
            goal.current = best;
            changed = true;
        }
    }
    changed
}
