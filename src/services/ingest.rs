//! Accepting user inputs into the queue.
//!
//! Single images are enqueued as-is. Archives are unpacked fully first and
//! enqueued in one batch, so a rejected archive adds no jobs at all.

use std::path::Path;

use crate::error::IngestError;
use crate::models::{extension_of, JobId};
use crate::services::archive;
use crate::services::job_queue::JobQueue;

/// What kind of input a file name denotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A single supported image, with its lowercased extension
    Image(String),
    Archive,
}

/// Classify an input by its extension (case-insensitive).
pub fn classify(name: &str) -> Result<InputKind, IngestError> {
    if archive::is_archive_name(name) {
        return Ok(InputKind::Archive);
    }
    let extension = extension_of(name);
    if archive::is_supported_extension(&extension) {
        Ok(InputKind::Image(extension))
    } else {
        Err(IngestError::UnsupportedInput {
            name: name.to_string(),
        })
    }
}

/// Enqueue one named input, returning the ids of the jobs it produced.
pub async fn ingest(
    queue: &JobQueue,
    name: &str,
    bytes: Vec<u8>,
) -> Result<Vec<JobId>, IngestError> {
    match classify(name)? {
        InputKind::Image(_) => Ok(vec![queue.enqueue(name, bytes).await]),
        InputKind::Archive => {
            let entries = archive::unpack(&bytes).inspect_err(|e| {
                tracing::warn!(archive = %name, error = %e, "Archive rejected");
            })?;
            let items = entries
                .into_iter()
                .map(|entry| (entry.file_name().to_string(), entry.bytes))
                .collect();
            let ids = queue.enqueue_batch(items).await;
            tracing::info!(archive = %name, jobs = ids.len(), "Archive accepted");
            Ok(ids)
        }
    }
}

/// Read a file from disk and enqueue it.
pub async fn ingest_path(queue: &JobQueue, path: &Path) -> Result<Vec<JobId>, IngestError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Reject by name before touching the disk
    classify(&name)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IngestError::Read {
            name: path.display().to_string(),
            message: e.to_string(),
        })?;
    ingest(queue, &name, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("a.PNG").unwrap(), InputKind::Image("png".into()));
        assert_eq!(classify("b.jpeg").unwrap(), InputKind::Image("jpeg".into()));
        assert_eq!(classify("batch.zip").unwrap(), InputKind::Archive);
        assert_eq!(
            classify("anim.gif").unwrap_err(),
            IngestError::UnsupportedInput {
                name: "anim.gif".into()
            }
        );
    }
}
