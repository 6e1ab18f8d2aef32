//! Background execution of synchronization passes.
//!
//! [`SyncRunner`] spawns each pass as its own task and keeps a snapshot of
//! every run it started. Runs are independent: triggering twice starts two
//! overlapping passes with no mutual exclusion or de-duplication.
//!
//! Each run holds a child of the runner's master [`CancellationToken`], so a
//! single run can be cancelled on its own and [`SyncRunner::shutdown`]
//! cancels all of them.
//!
//! Only the most recent finished runs are kept (see
//! [`DEFAULT_RETAINED_RUNS`]); older ones are dropped as new runs finish.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use syncbridge_core::types::Timestamp;
use syncbridge_platforms::{CrmClient, TaskBoardClient};
use tokio::sync::RwLock;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::orchestrator::{sync_contacts, SyncSummary};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Observable state of one run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncRunSnapshot {
    pub id: Uuid,
    pub state: RunState,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    /// Present once the pass completed.
    pub summary: Option<SyncSummary>,
    /// Present when the pass failed.
    pub error: Option<String>,
}

/// Internal bookkeeping for a single run.
struct ManagedRun {
    snapshot: SyncRunSnapshot,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

type RunMap = Arc<RwLock<HashMap<Uuid, ManagedRun>>>;

/// Number of finished runs kept for inspection.
pub const DEFAULT_RETAINED_RUNS: usize = 50;

/// Starts synchronization passes in the background and tracks them.
///
/// Created once at startup; share it behind an `Arc`.
pub struct SyncRunner {
    crm: Arc<dyn CrmClient>,
    board: Arc<dyn TaskBoardClient>,
    runs: RunMap,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
    retained_runs: usize,
}

impl SyncRunner {
    pub fn new(crm: Arc<dyn CrmClient>, board: Arc<dyn TaskBoardClient>) -> Self {
        Self {
            crm,
            board,
            runs: Arc::new(RwLock::new(HashMap::new())),
            cancel: CancellationToken::new(),
            retained_runs: DEFAULT_RETAINED_RUNS,
        }
    }

    /// Keep at most `retained_runs` finished runs. Running ones are never dropped.
    pub fn with_retention(mut self, retained_runs: usize) -> Self {
        self.retained_runs = retained_runs;
        self
    }

    /// Spawn a new pass and return its id without waiting for it.
    pub async fn start(&self) -> Uuid {
        let id = Uuid::new_v4();
        let cancel = self.cancel.child_token();
        let snapshot = SyncRunSnapshot {
            id,
            state: RunState::Running,
            started_at: Utc::now(),
            finished_at: None,
            summary: None,
            error: None,
        };

        // Hold the write lock across the spawn so the task cannot publish
        // its result before the run is registered.
        let mut runs = self.runs.write().await;

        let task = execute(
            Arc::clone(&self.crm),
            Arc::clone(&self.board),
            Arc::clone(&self.runs),
            id,
            cancel.clone(),
            self.retained_runs,
        )
        .instrument(tracing::info_span!("sync_run", run_id = %id));
        let handle = tokio::spawn(task);

        runs.insert(
            id,
            ManagedRun {
                snapshot,
                cancel,
                handle: Some(handle),
            },
        );
        drop(runs);

        tracing::info!(run_id = %id, "Sync run started");
        id
    }

    /// Current state of a run, if it exists.
    pub async fn status(&self, id: Uuid) -> Option<SyncRunSnapshot> {
        self.runs.read().await.get(&id).map(|run| run.snapshot.clone())
    }

    /// All known runs, most recent first.
    pub async fn list(&self) -> Vec<SyncRunSnapshot> {
        let mut snapshots: Vec<_> = self
            .runs
            .read()
            .await
            .values()
            .map(|run| run.snapshot.clone())
            .collect();
        snapshots.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        snapshots
    }

    /// Request cancellation of a run.
    ///
    /// Returns `false` if the run is unknown. Cancelling a finished run is a
    /// no-op.
    pub async fn cancel(&self, id: Uuid) -> bool {
        match self.runs.read().await.get(&id) {
            Some(run) => {
                if run.snapshot.state == RunState::Running {
                    run.cancel.cancel();
                    tracing::info!(run_id = %id, "Sync run cancellation requested");
                }
                true
            }
            None => false,
        }
    }

    /// Wait until a run is no longer running.
    ///
    /// Returns the final snapshot, or `None` if the run is unknown. Only the
    /// first caller joins the task; later callers get the current snapshot.
    pub async fn wait(&self, id: Uuid) -> Option<SyncRunSnapshot> {
        let handle = self.runs.write().await.get_mut(&id)?.handle.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                self.mark_aborted(id, e).await;
            }
        }
        self.status(id).await
    }

    /// Record a task that ended without publishing its result.
    async fn mark_aborted(&self, id: Uuid, err: JoinError) {
        let message = join_failure_message(err);
        tracing::error!(run_id = %id, error = %message, "Sync run task aborted");

        let mut runs = self.runs.write().await;
        if let Some(run) = runs.get_mut(&id) {
            if run.snapshot.state == RunState::Running {
                run.snapshot.state = RunState::Failed;
                run.snapshot.finished_at = Some(Utc::now());
                run.snapshot.error = Some(message);
            }
        }
        prune_finished(&mut runs, self.retained_runs);
    }

    /// Cancel every run and wait for the tasks to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let handles: Vec<_> = self
            .runs
            .write()
            .await
            .iter_mut()
            .filter_map(|(id, run)| run.handle.take().map(|handle| (*id, handle)))
            .collect();

        for (id, handle) in handles {
            if let Err(e) = handle.await {
                self.mark_aborted(id, e).await;
            }
        }
        tracing::info!("Sync runner shut down");
    }
}

/// Body of a spawned run: execute the pass, then publish its result.
async fn execute(
    crm: Arc<dyn CrmClient>,
    board: Arc<dyn TaskBoardClient>,
    runs: RunMap,
    id: Uuid,
    cancel: CancellationToken,
    retained_runs: usize,
) {
    let (state, summary, error) = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::info!("Sync run cancelled");
            (RunState::Cancelled, None, None)
        }
        result = sync_contacts(crm.as_ref(), board.as_ref()) => match result {
            Ok(summary) => (RunState::Completed, Some(summary), None),
            Err(e) => {
                tracing::error!(error = %e, "Sync run failed");
                (RunState::Failed, None, Some(e.to_string()))
            }
        },
    };

    let mut guard = runs.write().await;
    if let Some(run) = guard.get_mut(&id) {
        run.snapshot.state = state;
        run.snapshot.finished_at = Some(Utc::now());
        run.snapshot.summary = summary;
        run.snapshot.error = error;
    }
    prune_finished(&mut guard, retained_runs);
}

/// Drop the oldest finished runs beyond `keep`.
fn prune_finished(runs: &mut HashMap<Uuid, ManagedRun>, keep: usize) {
    let mut finished: Vec<_> = runs
        .values()
        .filter_map(|run| run.snapshot.finished_at.map(|at| (at, run.snapshot.id)))
        .collect();
    if finished.len() <= keep {
        return;
    }

    finished.sort_unstable();
    let excess = finished.len() - keep;
    for (_, id) in finished.into_iter().take(excess) {
        runs.remove(&id);
    }
    tracing::debug!(dropped = excess, "Pruned finished sync runs");
}

/// Text for a task that panicked or was aborted.
fn join_failure_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("Sync run panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("Sync run panicked: {msg}")
    } else {
        "Sync run panicked".to_string()
    }
}
