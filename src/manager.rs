//! Task collection manager.
//!
//! Holds the in-memory snapshot of the remote collection. Every mutation is
//! followed by a full [`TaskManager::refresh`] instead of patching the
//! snapshot, so what is shown is exactly what the store reported right after
//! the change. A failed operation leaves the snapshot untouched.
//!
//! A mutation the store accepted is never reported as failed. If the refresh
//! after it fails, the old snapshot is kept and marked stale until the next
//! successful refresh.

use tracing::{error, info, warn};

use crate::calculator::has_drift;
use crate::error::Result;
use crate::models::{Task, TaskInput};
use crate::store::TaskStore;
use crate::validation::to_payload;

pub struct TaskManager<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
    stale: bool,
}

impl<S: TaskStore> TaskManager<S> {
    /// Creates a manager with an empty snapshot. Call [`list`](Self::list)
    /// to load it.
    pub fn new(store: S) -> Self {
        TaskManager {
            store,
            tasks: Vec::new(),
            stale: false,
        }
    }

    /// Creates a manager and loads the collection.
    pub async fn connect(store: S) -> Result<Self> {
        let mut manager = Self::new(store);
        manager.refresh().await?;
        Ok(manager)
    }

    /// The current snapshot.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task in the current snapshot.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// True when a mutation succeeded but the refresh after it did not, so
    /// the snapshot lags behind the store.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches the whole collection and replaces the snapshot with it.
    pub async fn list(&mut self) -> Result<&[Task]> {
        self.refresh().await?;
        Ok(&self.tasks)
    }

    /// Re-synchronizes the snapshot from the store.
    ///
    /// The snapshot is only replaced once the fetch has fully succeeded.
    pub async fn refresh(&mut self) -> Result<()> {
        let tasks = self.store.list_tasks().await.map_err(|e| {
            error!("Failed to fetch tasks: {}", e);
            e
        })?;
        for t in tasks.iter().filter(|t| has_drift(t)) {
            warn!(
                "Task {} has total_remuneration {} which does not match its fields",
                t.id, t.total_remuneration
            );
        }
        self.tasks = tasks;
        self.stale = false;
        Ok(())
    }

    /// Refresh following an accepted mutation. A failure only marks the
    /// snapshot stale; the mutation itself stands.
    async fn resync_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("Change was saved but the task list could not be reloaded: {}", e);
            self.stale = true;
        }
    }

    /// Validates and creates a task, then refreshes the snapshot.
    pub async fn create(&mut self, draft: &TaskInput) -> Result<Task> {
        let payload = to_payload(draft)?;
        let created = self.store.create_task(&payload).await.map_err(|e| {
            error!("Failed to create task: {}", e);
            e
        })?;
        info!(
            "Created task {} for {} (total {:.2})",
            created.id, created.employee_name, created.total_remuneration
        );
        self.resync_after_mutation().await;
        Ok(created)
    }

    /// Validates the draft and replaces task `id` with it, then refreshes.
    pub async fn update(&mut self, id: u64, draft: &TaskInput) -> Result<Task> {
        let payload = to_payload(draft)?;
        let updated = self.store.update_task(id, &payload).await.map_err(|e| {
            error!("Failed to update task {}: {}", id, e);
            e
        })?;
        info!("Updated task {} (total {:.2})", id, updated.total_remuneration);
        self.resync_after_mutation().await;
        Ok(updated)
    }

    /// Removes task `id`, then refreshes.
    ///
    /// No confirmation happens here; front-ends ask the user first.
    pub async fn delete(&mut self, id: u64) -> Result<()> {
        self.store.delete_task(id).await.map_err(|e| {
            error!("Failed to delete task {}: {}", id, e);
            e
        })?;
        info!("Deleted task {}", id);
        self.resync_after_mutation().await;
        Ok(())
    }
}
