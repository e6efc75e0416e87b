pub mod archive;
pub mod converter;
pub mod exporter;
pub mod ingest;
pub mod job_queue;
pub mod job_store;

pub use archive::{pack, unpack, ArchiveEntry, SUPPORTED_EXTENSIONS};
pub use converter::{Converter, RasterConverter};
pub use exporter::{Artifact, ExportScope};
pub use ingest::{ingest, ingest_path, InputKind};
pub use job_queue::{JobQueue, QueueEvent};
pub use job_store::{JobStore, QueueStats, Settled, Work};
