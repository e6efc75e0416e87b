use thiserror::Error;

use crate::models::JobId;

/// Failure converting a single image. Recorded on the job, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Conversion worker failed: {0}")]
    Worker(String),
}

/// Archive-level failure. Rejects the whole archive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("Archive contains no files")]
    Empty,

    #[error("Unsupported file type '{extension}' in archive (first entry: {name})")]
    UnsupportedExtension { name: String, extension: String },

    #[error("Archive mixes file types: expected '{expected}', found '{found}' ({name})")]
    MixedExtension {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Could not read archive: {0}")]
    Read(String),

    #[error("Could not write archive: {0}")]
    Write(String),
}

/// Failure turning finished jobs into artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,

    #[error("Job {0} is not finished")]
    NotReady(JobId),

    #[error("Job {0} not found")]
    NotFound(JobId),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Failure accepting a user-supplied input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Unsupported input file: {name}")]
    UnsupportedInput { name: String },

    #[error("Could not read {name}: {message}")]
    Read { name: String, message: String },

    #[error("Archive rejected: {0}")]
    Archive(#[from] ArchiveError),
}
