//! Queue factory for integration tests.

use std::ops::Deref;
use std::sync::Arc;

use dmg_quantize::PaletteMode;
use img2dmg::services::{JobQueue, QueueStats, RasterConverter};

/// A real queue backed by the raster converter, shut down on `finish`
pub struct TestQueue {
    queue: JobQueue,
}

impl TestQueue {
    /// Start a queue in the given mode
    pub fn new(mode: PaletteMode) -> Self {
        Self {
            queue: JobQueue::start(mode, Arc::new(RasterConverter::new())),
        }
    }

    /// Enqueue named images and wait until the queue is idle
    pub async fn convert_all(&self, items: Vec<(&str, Vec<u8>)>) -> QueueStats {
        for (name, bytes) in items {
            self.queue.enqueue(name, bytes).await;
        }
        self.queue.wait_idle().await
    }

    /// Stop the scheduler
    pub async fn finish(self) {
        self.queue.shutdown().await;
    }
}

impl Deref for TestQueue {
    type Target = JobQueue;

    fn deref(&self) -> &JobQueue {
        &self.queue
    }
}
