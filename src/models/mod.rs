pub mod config;
pub mod job;

pub use config::{AppConfig, CONFIG_ENV};
pub use job::{base_name, extension_of, ConvertedImage, Job, JobId, JobStatus, JobView, ResultBuffer};
