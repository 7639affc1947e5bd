#![allow(dead_code)]

use std::sync::Mutex;
use async_trait::async_trait;
use emptasks::calculator::calculate;
use emptasks::error::TransportError;
use emptasks::models::{Task, TaskInput, TaskPayload};
use emptasks::store::TaskStore;

/// In-memory store that counts calls and can be told to fail the next one.
#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    calls: usize,
    fail_next: Option<TransportError>,
    fail_next_list: Option<TransportError>,
}

impl FakeStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        FakeStore {
            inner: Mutex::new(Inner { tasks, next_id, ..Inner::default() }),
        }
    }

    /// Number of remote calls made so far.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    pub fn fail_next(&self, err: TransportError) {
        self.inner.lock().unwrap().fail_next = Some(err);
    }

    /// Fails the next `list_tasks` only, so a mutation can succeed and the
    /// reload after it fail.
    pub fn fail_next_list(&self, err: TransportError) {
        self.inner.lock().unwrap().fail_next_list = Some(err);
    }

    /// What the "server" holds right now.
    pub fn remote_tasks(&self) -> Vec<Task> {
        self.inner.lock().unwrap().tasks.clone()
    }

    /// Changes a record behind the client's back.
    pub fn remote_rename(&self, id: u64, employee_name: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(t) = inner.tasks.iter_mut().find(|t| t.id == id) {
            t.employee_name = employee_name.to_string();
        }
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, Inner>, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }
}

fn to_task(id: u64, payload: &TaskPayload) -> Task {
    Task {
        id,
        employee_name: payload.employee_name.clone(),
        task_description: payload.task_description.clone(),
        date: payload.date.clone(),
        hours_spent: payload.hours_spent,
        hourly_rate: payload.hourly_rate,
        additional_charges: payload.additional_charges,
        total_remuneration: payload.total_remuneration,
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, TransportError> {
        let mut inner = self.begin()?;
        match inner.fail_next_list.take() {
            Some(err) => Err(err),
            None => Ok(inner.tasks.clone()),
        }
    }

    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, TransportError> {
        let mut inner = self.begin()?;
        inner.next_id += 1;
        let task = to_task(inner.next_id, payload);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: u64, payload: &TaskPayload) -> Result<Task, TransportError> {
        let mut inner = self.begin()?;
        match inner.tasks.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                *t = to_task(id, payload);
                Ok(t.clone())
            }
            None => Err(TransportError::NotFound { id }),
        }
    }

    async fn delete_task(&self, id: u64) -> Result<(), TransportError> {
        let mut inner = self.begin()?;
        let len_before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        if inner.tasks.len() == len_before {
            return Err(TransportError::NotFound { id });
        }
        Ok(())
    }
}

pub fn task(id: u64, employee_name: &str, hours: f64, rate: f64, charges: f64) -> Task {
    Task {
        id,
        employee_name: employee_name.to_string(),
        task_description: format!("Work by {}", employee_name),
        date: "2024-05-01".to_string(),
        hours_spent: hours,
        hourly_rate: rate,
        additional_charges: charges,
        total_remuneration: calculate(hours, rate, charges),
    }
}

pub fn draft(employee_name: &str, hours: f64, rate: f64, charges: f64) -> TaskInput {
    TaskInput {
        employee_name: employee_name.to_string(),
        task_description: "Inventory count".to_string(),
        date: "2024-05-02".to_string(),
        hours_spent: hours,
        hourly_rate: rate,
        additional_charges: charges,
    }
}

pub fn rejected(status: u16) -> TransportError {
    TransportError::Status { status, message: "rejected".to_string() }
}
