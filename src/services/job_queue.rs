//! Single-consumer job queue.
//!
//! One scheduler task owns conversion: it sleeps on a [`Notify`] until a
//! mutation wakes it, picks the first queued job, marks it processing under
//! the store lock, and converts it with the lock released. Every mutation,
//! from the scheduler or from callers, goes through the same lock, so
//! selection and clearing never race the scheduler's writes.

use dmg_quantize::PaletteMode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex, Notify};
use tokio::task::JoinHandle;

use crate::error::ExportError;
use crate::models::{JobId, JobView};
use crate::services::converter::Converter;
use crate::services::exporter::{self, Artifact, ExportScope};
use crate::services::job_store::{JobStore, QueueStats, Settled, Work};

/// Lifecycle notification for observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Enqueued { id: JobId, name: String },
    Started { id: JobId, name: String },
    Completed { id: JobId, width: u32, height: u32 },
    Failed { id: JobId, message: String },
    /// A result arrived for a job that was reset or removed meanwhile
    Discarded { id: JobId },
    ModeChanged { mode: PaletteMode, requeued: usize },
    Removed { id: JobId },
    Cleared { count: usize },
}

struct Shared {
    store: Mutex<JobStore>,
    wake: Notify,
    events: broadcast::Sender<QueueEvent>,
    stats: watch::Sender<QueueStats>,
    closed: AtomicBool,
    worker: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn emit(&self, event: QueueEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Handle to the job list and its scheduler. Cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    shared: Arc<Shared>,
}

impl JobQueue {
    /// Create the queue and spawn its scheduler on the current runtime.
    pub fn start(mode: PaletteMode, converter: Arc<dyn Converter>) -> Self {
        let (events, _) = broadcast::channel(256);
        let (stats, _) = watch::channel(QueueStats::default());
        let shared = Arc::new(Shared {
            store: Mutex::new(JobStore::new(mode)),
            wake: Notify::new(),
            events,
            stats,
            closed: AtomicBool::new(false),
            worker: std::sync::Mutex::new(None),
        });

        let handle = tokio::spawn(run_scheduler(shared.clone(), converter));
        if let Ok(mut worker) = shared.worker.lock() {
            *worker = Some(handle);
        }

        tracing::info!(%mode, "Job queue started");
        Self { shared }
    }

    /// Apply a mutation through the single serialized update path.
    async fn mutate<R>(&self, f: impl FnOnce(&mut JobStore) -> R) -> R {
        let mut store = self.shared.store.lock().await;
        let out = f(&mut store);
        self.shared.stats.send_replace(store.stats());
        drop(store);
        self.shared.wake.notify_one();
        out
    }

    async fn read<R>(&self, f: impl FnOnce(&JobStore) -> R) -> R {
        let store = self.shared.store.lock().await;
        f(&store)
    }

    /// Add one queued job
    pub async fn enqueue(&self, name: impl Into<String>, bytes: Vec<u8>) -> JobId {
        let name = name.into();
        let id = self.mutate(|store| store.insert(name.clone(), bytes)).await;
        tracing::debug!(job_id = %id, %name, "Job enqueued");
        self.shared.emit(QueueEvent::Enqueued { id, name });
        id
    }

    /// Add several queued jobs in one update
    pub async fn enqueue_batch(&self, items: Vec<(String, Vec<u8>)>) -> Vec<JobId> {
        let added = self
            .mutate(|store| {
                items
                    .into_iter()
                    .map(|(name, bytes)| (store.insert(name.clone(), bytes), name))
                    .collect::<Vec<_>>()
            })
            .await;

        tracing::debug!(count = added.len(), "Jobs enqueued");
        added
            .into_iter()
            .map(|(id, name)| {
                self.shared.emit(QueueEvent::Enqueued { id, name });
                id
            })
            .collect()
    }

    pub async fn mode(&self) -> PaletteMode {
        self.read(|store| store.mode()).await
    }

    /// Switch palette mode; every job is re-queued unless the mode is unchanged
    pub async fn set_mode(&self, mode: PaletteMode) -> usize {
        let (changed, requeued) = self
            .mutate(|store| (store.mode() != mode, store.set_mode(mode)))
            .await;
        if changed {
            self.announce_mode(mode, requeued);
        }
        requeued
    }

    /// Flip to the other mode in one update, returning it
    pub async fn toggle_mode(&self) -> PaletteMode {
        let (mode, requeued) = self
            .mutate(|store| {
                let mode = store.mode().toggled();
                (mode, store.set_mode(mode))
            })
            .await;
        self.announce_mode(mode, requeued);
        mode
    }

    fn announce_mode(&self, mode: PaletteMode, requeued: usize) {
        tracing::info!(%mode, requeued, "Palette mode changed, re-queued jobs");
        self.shared.emit(QueueEvent::ModeChanged { mode, requeued });
    }

    pub async fn toggle_selected(&self, id: JobId) -> Option<bool> {
        self.mutate(|store| store.toggle_selected(id)).await
    }

    pub async fn set_all_selected(&self, selected: bool) -> usize {
        self.mutate(|store| store.set_all_selected(selected)).await
    }

    pub async fn remove(&self, id: JobId) -> bool {
        let removed = self.mutate(|store| store.remove(id)).await;
        if removed {
            self.shared.emit(QueueEvent::Removed { id });
        }
        removed
    }

    /// Drop done and failed jobs
    pub async fn clear_finished(&self) -> usize {
        let count = self.mutate(|store| store.clear_finished()).await;
        self.shared.emit(QueueEvent::Cleared { count });
        count
    }

    /// Drop every job; in-flight results are discarded when they land
    pub async fn clear_all(&self) -> usize {
        let count = self.mutate(|store| store.clear_all()).await;
        tracing::info!(count, "Cleared all jobs");
        self.shared.emit(QueueEvent::Cleared { count });
        count
    }

    pub async fn snapshot(&self) -> Vec<JobView> {
        self.read(|store| store.views()).await
    }

    pub async fn job(&self, id: JobId) -> Option<JobView> {
        self.read(|store| store.get(id).map(|j| j.view())).await
    }

    pub async fn stats(&self) -> QueueStats {
        self.read(|store| store.stats()).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.shared.events.subscribe()
    }

    /// Resolve once nothing is queued or processing
    pub async fn wait_idle(&self) -> QueueStats {
        let mut rx = self.shared.stats.subscribe();
        let waited = rx.wait_for(|s| s.is_idle()).await.map(|s| *s);
        match waited {
            Ok(stats) => stats,
            Err(_) => self.stats().await,
        }
    }

    /// Export one done job under the current mode's name
    pub async fn export_one(&self, id: JobId) -> Result<Artifact, ExportError> {
        self.read(|store| {
            let job = store.get(id).ok_or(ExportError::NotFound(id))?;
            exporter::export_one(job, store.mode())
        })
        .await
    }

    /// Export the selected or all done jobs as one archive
    pub async fn export_many(&self, scope: ExportScope) -> Result<Artifact, ExportError> {
        self.read(|store| {
            let jobs = exporter::jobs_in_scope(store.jobs(), scope);
            exporter::export_many(&jobs, scope, store.mode())
        })
        .await
    }

    /// Export the jobs in `scope` as individual files
    pub async fn export_each(&self, scope: ExportScope) -> Result<Vec<Artifact>, ExportError> {
        self.read(|store| {
            let jobs = exporter::jobs_in_scope(store.jobs(), scope);
            exporter::export_each(&jobs, store.mode())
        })
        .await
    }

    /// Stop the scheduler after any in-flight conversion settles
    pub async fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.wake.notify_one();
        let handle = self
            .shared
            .worker
            .lock()
            .ok()
            .and_then(|mut worker| worker.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Job scheduler ended abnormally");
            }
        }
    }
}

async fn run_scheduler(shared: Arc<Shared>, converter: Arc<dyn Converter>) {
    tracing::debug!("Job scheduler running");

    loop {
        if shared.closed.load(Ordering::Acquire) {
            break;
        }

        let work = {
            let mut store = shared.store.lock().await;
            let work = store.begin_next();
            if work.is_some() {
                shared.stats.send_replace(store.stats());
            }
            work
        };

        let Some(work) = work else {
            shared.wake.notified().await;
            continue;
        };

        tracing::debug!(job_id = %work.id, name = %work.name, "Processing job");
        shared.emit(QueueEvent::Started {
            id: work.id,
            name: work.name.clone(),
        });

        let outcome = converter.convert(work.source.clone(), work.palette).await;

        // Announce before publishing stats so idle waiters see every event
        let mut store = shared.store.lock().await;
        let settled = store.settle(work.id, work.generation, outcome);
        report_settled(&shared, &work, settled);
        shared.stats.send_replace(store.stats());
    }

    tracing::debug!("Job scheduler stopped");
}

fn report_settled(shared: &Shared, work: &Work, settled: Settled) {
    match settled {
        Settled::Done { width, height } => {
            tracing::info!(job_id = %work.id, name = %work.name, width, height, "Job done");
            shared.emit(QueueEvent::Completed {
                id: work.id,
                width,
                height,
            });
        }
        Settled::Failed(message) => {
            tracing::warn!(job_id = %work.id, name = %work.name, error = %message, "Job failed");
            shared.emit(QueueEvent::Failed {
                id: work.id,
                message,
            });
        }
        Settled::Stale => {
            tracing::debug!(job_id = %work.id, "Discarded stale result");
            shared.emit(QueueEvent::Discarded { id: work.id });
        }
    }
}
