use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Opaque job identifier, allocated in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Externally visible job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Encoded output of one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    /// PNG bytes
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Owned handle to a job's output buffer.
///
/// A job holds at most one. Dropping it through [`ResultBuffer::release`]
/// is the only way the store discards output.
#[derive(Debug)]
pub struct ResultBuffer {
    image: ConvertedImage,
}

impl ResultBuffer {
    fn new(image: ConvertedImage) -> Self {
        Self { image }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.image.bytes
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Free the buffer, returning how many bytes were released.
    pub fn release(self) -> usize {
        self.image.bytes.len()
    }
}

/// Internal lifecycle state; result and error exist only in their states
#[derive(Debug)]
enum JobState {
    Queued,
    Processing,
    Done(ResultBuffer),
    Error(String),
}

/// One image's conversion request
#[derive(Debug)]
pub struct Job {
    id: JobId,
    source_name: String,
    extension: String,
    source: Arc<[u8]>,
    state: JobState,
    selected: bool,
    generation: u64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl Job {
    pub fn new(id: JobId, source_name: impl Into<String>, source: Vec<u8>) -> Self {
        let source_name = source_name.into();
        let extension = extension_of(&source_name);
        Self {
            id,
            source_name,
            extension,
            source: source.into(),
            state: JobState::Queued,
            selected: false,
            generation: 0,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Shared view of the source bytes for an in-flight conversion
    pub fn source(&self) -> Arc<[u8]> {
        self.source.clone()
    }

    pub fn status(&self) -> JobStatus {
        match self.state {
            JobState::Queued => JobStatus::Queued,
            JobState::Processing => JobStatus::Processing,
            JobState::Done(_) => JobStatus::Done,
            JobState::Error(_) => JobStatus::Error,
        }
    }

    pub fn result(&self) -> Option<&ResultBuffer> {
        match &self.state {
            JobState::Done(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            JobState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Selection only counts while the job is done
    pub fn is_selected(&self) -> bool {
        self.selected && self.status() == JobStatus::Done
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// Move to processing. Returns the generation the result must match.
    pub fn begin(&mut self) -> u64 {
        self.release_result();
        self.state = JobState::Processing;
        self.generation
    }

    /// Attach a finished result.
    pub fn complete(&mut self, image: ConvertedImage) {
        self.release_result();
        self.state = JobState::Done(ResultBuffer::new(image));
    }

    /// Record a conversion failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.release_result();
        self.state = JobState::Error(message.into());
    }

    /// Back to queued with a fresh generation; any result is released.
    pub fn reset(&mut self) {
        self.release_result();
        self.state = JobState::Queued;
        self.selected = false;
        self.generation += 1;
    }

    /// Set selection; ignored unless the job is done. Returns the new value.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.status() == JobStatus::Done {
            self.selected = selected;
        }
        self.is_selected()
    }

    /// Release the current result buffer, if any, leaving the job queued.
    /// Returns bytes freed.
    pub fn release_result(&mut self) -> usize {
        let state = std::mem::replace(&mut self.state, JobState::Queued);
        match state {
            JobState::Done(buffer) => {
                let freed = buffer.release();
                tracing::debug!(job_id = %self.id, freed, "Released result buffer");
                freed
            }
            other => {
                self.state = other;
                0
            }
        }
    }

    /// Read-only summary
    pub fn view(&self) -> JobView {
        let result = self.result();
        JobView {
            id: self.id,
            source_name: self.source_name.clone(),
            extension: self.extension.clone(),
            status: self.status(),
            width: result.map(|r| r.width()),
            height: result.map(|r| r.height()),
            output_size: result.map(|r| r.bytes().len()),
            error: self.error_message().map(str::to_string),
            selected: self.is_selected(),
            created_at: self.created_at,
        }
    }
}

/// Snapshot of a job for display and reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobView {
    pub id: JobId,
    pub source_name: String,
    pub extension: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub selected: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Lowercased substring after the last `.`, or empty
pub fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Name without its final extension
pub fn base_name(name: &str) -> &str {
    name.rsplit_once('.').map(|(base, _)| base).unwrap_or(name)
}
