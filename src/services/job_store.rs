//! Arena of jobs keyed by id, with insertion order kept separately.
//!
//! `JobStore` is plain synchronous state. All mutation goes through
//! [`JobQueue`](super::JobQueue), which serializes access behind one lock.

use dmg_quantize::{Palette, PaletteMode};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::models::{ConvertedImage, Job, JobId, JobStatus, JobView};

/// A job handed to the converter
#[derive(Debug, Clone)]
pub struct Work {
    pub id: JobId,
    pub name: String,
    /// Generation observed at pick time; the result is dropped if it changed
    pub generation: u64,
    pub source: Arc<[u8]>,
    pub palette: Palette,
}

/// How a finished conversion landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Done { width: u32, height: u32 },
    Failed(String),
    /// Job was removed or reset while converting; result discarded
    Stale,
}

/// Job counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub queued: usize,
    pub processing: usize,
    pub done: usize,
    pub error: usize,
}

impl QueueStats {
    pub fn total(&self) -> usize {
        self.queued + self.processing + self.done + self.error
    }

    /// Nothing waiting and nothing running
    pub fn is_idle(&self) -> bool {
        self.queued == 0 && self.processing == 0
    }
}

pub struct JobStore {
    jobs: HashMap<JobId, Job>,
    order: Vec<JobId>,
    next_id: u64,
    mode: PaletteMode,
}

impl JobStore {
    pub fn new(mode: PaletteMode) -> Self {
        Self {
            jobs: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            mode,
        }
    }

    pub fn mode(&self) -> PaletteMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Add a queued job at the end of the list
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> JobId {
        let id = JobId::new(self.next_id);
        self.next_id += 1;
        self.jobs.insert(id, Job::new(id, name, bytes));
        self.order.push(id);
        id
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Jobs in insertion order
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.order.iter().filter_map(|id| self.jobs.get(id))
    }

    /// Pick the first queued job and mark it processing.
    ///
    /// Returns `None` if a job is already processing or nothing is queued.
    pub fn begin_next(&mut self) -> Option<Work> {
        if self.jobs.values().any(|j| j.status() == JobStatus::Processing) {
            return None;
        }

        let id = *self
            .order
            .iter()
            .find(|id| self.jobs[*id].status() == JobStatus::Queued)?;
        let palette = self.mode.palette();
        let job = self.jobs.get_mut(&id)?;
        let generation = job.begin();

        Some(Work {
            id,
            name: job.source_name().to_string(),
            generation,
            source: job.source(),
            palette,
        })
    }

    /// Apply a conversion outcome if the job is still the one that was picked.
    pub fn settle(
        &mut self,
        id: JobId,
        generation: u64,
        outcome: Result<ConvertedImage, ConvertError>,
    ) -> Settled {
        let Some(job) = self.jobs.get_mut(&id) else {
            return Settled::Stale;
        };
        if job.generation() != generation || job.status() != JobStatus::Processing {
            return Settled::Stale;
        }

        match outcome {
            Ok(image) => {
                let (width, height) = (image.width, image.height);
                job.complete(image);
                Settled::Done { width, height }
            }
            Err(e) => {
                let message = e.to_string();
                job.fail(message.clone());
                Settled::Failed(message)
            }
        }
    }

    /// Switch palette mode, re-queueing every job. Returns jobs reset.
    ///
    /// Setting the current mode again is a no-op.
    pub fn set_mode(&mut self, mode: PaletteMode) -> usize {
        if mode == self.mode {
            return 0;
        }
        self.mode = mode;
        for job in self.jobs.values_mut() {
            job.reset();
        }
        self.jobs.len()
    }

    /// Flip selection on a done job. `None` if the job is missing.
    pub fn toggle_selected(&mut self, id: JobId) -> Option<bool> {
        let job = self.jobs.get_mut(&id)?;
        let next = !job.is_selected();
        Some(job.set_selected(next))
    }

    /// Select or deselect every done job. Returns how many are now selected.
    pub fn set_all_selected(&mut self, selected: bool) -> usize {
        self.jobs
            .values_mut()
            .map(|j| j.set_selected(selected))
            .filter(|now| *now)
            .count()
    }

    /// Remove a job, releasing its buffers
    pub fn remove(&mut self, id: JobId) -> bool {
        match self.jobs.remove(&id) {
            Some(mut job) => {
                job.release_result();
                self.order.retain(|o| *o != id);
                true
            }
            None => false,
        }
    }

    /// Drop every done or failed job
    pub fn clear_finished(&mut self) -> usize {
        let finished: Vec<JobId> = self
            .jobs()
            .filter(|j| matches!(j.status(), JobStatus::Done | JobStatus::Error))
            .map(|j| j.id())
            .collect();
        for id in &finished {
            self.remove(*id);
        }
        finished.len()
    }

    /// Drop every job
    pub fn clear_all(&mut self) -> usize {
        let count = self.jobs.len();
        for job in self.jobs.values_mut() {
            job.release_result();
        }
        self.jobs.clear();
        self.order.clear();
        count
    }

    pub fn views(&self) -> Vec<JobView> {
        self.jobs().map(Job::view).collect()
    }

    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats::default();
        for job in self.jobs.values() {
            match job.status() {
                JobStatus::Queued => stats.queued += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Done => stats.done += 1,
                JobStatus::Error => stats.error += 1,
            }
        }
        stats
    }
}
