use crate::plan::WorkUnit;
use std::{fmt, future::Future, sync::Arc};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct FailedUnit {
    pub unit: WorkUnit,
    pub error: String,
}

#[derive(Debug, Default, Clone)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: Vec<FailedUnit>,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn merge(&mut self, other: DispatchSummary) {
        self.succeeded += other.succeeded;
        self.failed.extend(other.failed);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("worker panicked or was cancelled")]
    WorkerFailed(#[source] tokio::task::JoinError),
}

/// Runs independent work units on a fixed number of workers.
#[derive(Debug, Copy, Clone)]
pub struct Dispatcher {
    workers: usize,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Self {
        Dispatcher {
            workers: workers.max(1),
        }
    }

    /// Sizes the pool relative to the core count. Units mostly wait on child
    /// processes, so more workers than cores keeps the CPUs busy.
    pub fn with_workers_per_core(workers_per_core: usize) -> Self {
        Self::new(num_cpus::get() * workers_per_core)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Hands every unit to `handler` exactly once and waits for all of them.
    /// A failing unit is recorded in the summary and doesn't stop the others.
    pub async fn dispatch<F, Fut, E>(
        &self,
        units: Vec<WorkUnit>,
        handler: F,
    ) -> Result<DispatchSummary, DispatchError>
    where
        F: Fn(WorkerId, WorkUnit) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + 'static,
    {
        let worker_count = self.workers.min(units.len());
        tracing::debug!(
            "dispatching {} unit(s) to {} worker(s)",
            units.len(),
            worker_count
        );

        let (work_tx, work_rx) = mpsc::unbounded_channel();
        for unit in units {
            // the receiver outlives this loop, so sending can't fail
            let _ = work_tx.send(unit);
        }
        drop(work_tx);

        let work_rx = Arc::new(Mutex::new(work_rx));
        let handler = Arc::new(handler);
        let handles = (0..worker_count)
            .map(|id| spawn_worker(WorkerId(id), work_rx.clone(), handler.clone()))
            .collect::<Vec<_>>();

        let mut summary = DispatchSummary::default();
        for result in futures::future::join_all(handles).await {
            summary.merge(result.map_err(DispatchError::WorkerFailed)?);
        }
        Ok(summary)
    }
}

fn spawn_worker<F, Fut, E>(
    worker: WorkerId,
    work_rx: Arc<Mutex<mpsc::UnboundedReceiver<WorkUnit>>>,
    handler: Arc<F>,
) -> JoinHandle<DispatchSummary>
where
    F: Fn(WorkerId, WorkUnit) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: std::error::Error + Send + 'static,
{
    tokio::spawn(async move {
        let mut summary = DispatchSummary::default();
        loop {
            let next = {
                let mut rx = work_rx.lock().await;
                rx.recv().await
            };
            let unit = match next {
                Some(unit) => unit,
                None => break,
            };
            match handler(worker, unit.clone()).await {
                Ok(()) => summary.succeeded += 1,
                Err(error) => {
                    let error = error_chain(&error);
                    tracing::error!(
                        "failed to generate {} from {}: {}",
                        unit.destination.display(),
                        unit.source.display(),
                        error
                    );
                    summary.failed.push(FailedUnit { unit, error });
                }
            }
        }
        summary
    })
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
