use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// An employee task record as stored by the remote store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Identifier assigned by the remote store.
    pub id: u64,
    /// Name of the employee who did the work.
    pub employee_name: String,
    /// What was done.
    pub task_description: String,
    /// Day the work was done (ISO 8601).
    pub date: String,
    /// Hours spent on the task.
    pub hours_spent: f64,
    /// Pay per hour.
    pub hourly_rate: f64,
    /// Flat charges added on top of the hourly pay.
    #[serde(default)]
    pub additional_charges: f64,
    /// `hours_spent * hourly_rate + additional_charges`, rounded to the cent.
    #[serde(default)]
    pub total_remuneration: f64,
}

/// A task as entered by the user, before the store has assigned an id.
///
/// The total is never part of the input; it is computed when the draft is
/// turned into a [`TaskPayload`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskInput {
    pub employee_name: String,
    pub task_description: String,
    pub date: String,
    pub hours_spent: f64,
    pub hourly_rate: f64,
    pub additional_charges: f64,
}

impl TaskInput {
    /// Empty draft dated today with zeroed amounts.
    pub fn draft() -> Self {
        Self::draft_on(Local::now().date_naive())
    }

    /// Empty draft dated `date`.
    pub fn draft_on(date: NaiveDate) -> Self {
        TaskInput {
            employee_name: String::new(),
            task_description: String::new(),
            date: date.to_string(),
            hours_spent: 0.0,
            hourly_rate: 0.0,
            additional_charges: 0.0,
        }
    }

    /// Draft pre-filled from an existing record, for full replacement on edit.
    pub fn from_task(task: &Task) -> Self {
        TaskInput {
            employee_name: task.employee_name.clone(),
            task_description: task.task_description.clone(),
            date: task.date.clone(),
            hours_spent: task.hours_spent,
            hourly_rate: task.hourly_rate,
            additional_charges: task.additional_charges,
        }
    }
}

impl Default for TaskInput {
    fn default() -> Self {
        Self::draft()
    }
}

/// Body sent to the remote store on create and update.
///
/// Only built from a validated draft, so text fields are trimmed, the date
/// is normalized to `YYYY-MM-DD`, and the total matches the formula.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskPayload {
    pub employee_name: String,
    pub task_description: String,
    pub date: String,
    pub hours_spent: f64,
    pub hourly_rate: f64,
    pub additional_charges: f64,
    pub total_remuneration: f64,
}
