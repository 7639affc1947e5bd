use crate::models::{Task, TaskInput};

/// Computes the total remuneration for a piece of work.
///
/// `hours * rate + additional_charges`, rounded to the cent with
/// round-half-away-from-zero.
///
/// Inputs are not validated here: callers check that every value is finite
/// and non-negative first. Non-finite inputs propagate to the result.
pub fn calculate(hours: f64, rate: f64, additional_charges: f64) -> f64 {
    let base = hours * rate;
    let total = base + additional_charges;
    (total * 100.0).round() / 100.0
}

/// Total remuneration a draft would be persisted with.
pub fn total_for(input: &TaskInput) -> f64 {
    calculate(input.hours_spent, input.hourly_rate, input.additional_charges)
}

/// Recomputes the total of a stored task from its own fields.
pub fn recompute(task: &Task) -> f64 {
    calculate(task.hours_spent, task.hourly_rate, task.additional_charges)
}

/// True when the stored total disagrees with the formula by at least a cent.
pub fn has_drift(task: &Task) -> bool {
    (recompute(task) - task.total_remuneration).abs() >= 0.005
}
