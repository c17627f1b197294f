use tokio::task::JoinHandle;
use std::collections::HashMap;
use crate::error::{Error, Result};
use tracing::{info, error};

/// Task Supervisor - Tracks background tasks spawned by the service
///
/// ## Purpose
/// The server owns a small number of long-running tasks (the daily chart
/// warm-up). The supervisor keeps their handles so the binary can detect a
/// task that stopped early and abort everything on shutdown.
///
/// ## Usage
/// ```ignore
/// let mut supervisor = TaskSupervisor::new();
/// supervisor.spawn("daily_warmup", warmup.run());
///
/// if let Err(e) = supervisor.check_health() {
///     error!("Task failure detected: {:?}", e);
/// }
/// ```
pub struct TaskSupervisor {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskSupervisor {
    pub fn new() -> Self {
        TaskSupervisor {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a new background task and register it for monitoring
    pub fn spawn<F>(&mut self, name: impl Into<String>, future: F) -> &mut Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let handle = tokio::spawn(future);

        info!("Spawned background task: {}", name);
        self.tasks.insert(name, handle);
        self
    }

    /// Returns an error naming every task that has already terminated.
    /// Finished tasks are dropped from tracking.
    pub fn check_health(&mut self) -> Result<()> {
        let failed_tasks: Vec<String> = self.tasks.iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(name, _)| name.clone())
            .collect();

        if failed_tasks.is_empty() {
            return Ok(());
        }

        let error_msg = format!("Tasks terminated unexpectedly: {:?}", failed_tasks);
        error!("{}", error_msg);

        for name in &failed_tasks {
            self.tasks.remove(name);
        }

        Err(Error::TaskFailed(error_msg))
    }

    pub fn active_task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Abort all tasks
    pub fn shutdown_all(&mut self) {
        info!("Shutting down {} background tasks", self.tasks.len());

        for (name, handle) in self.tasks.drain() {
            handle.abort();
            info!("Aborted task: {}", name);
        }
    }
}

impl Default for TaskSupervisor {
    fn default() -> Self {
        Self::new()
    }
}
