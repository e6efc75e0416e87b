//! Export of finished jobs as PNG files or a single ZIP.
//!
//! Names always use the palette mode active at export time, not the mode a
//! job was converted under.

use dmg_quantize::PaletteMode;
use std::collections::HashMap;
use std::fmt;

use crate::error::ExportError;
use crate::models::{base_name, Job, JobStatus};
use crate::services::archive;

/// Prefix of batch archive names
pub const ARCHIVE_PREFIX: &str = "img2dmg";

/// Extension of every exported image
pub const OUTPUT_EXTENSION: &str = "png";

/// Which finished jobs a batch export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Done jobs the user selected
    Selected,
    /// Every done job
    All,
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportScope::Selected => f.write_str("selected"),
            ExportScope::All => f.write_str("all"),
        }
    }
}

/// A named file ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `<basename><mode suffix>.png`
pub fn export_file_name(source_name: &str, mode: PaletteMode) -> String {
    format!(
        "{}{}.{}",
        base_name(source_name),
        mode.file_suffix(),
        OUTPUT_EXTENSION
    )
}

/// `img2dmg-<scope><archive suffix>.zip`
pub fn archive_file_name(scope: ExportScope, mode: PaletteMode) -> String {
    format!("{ARCHIVE_PREFIX}-{scope}{}.zip", mode.archive_suffix())
}

/// Done jobs belonging to `scope`, in the order given
pub fn jobs_in_scope<'a>(
    jobs: impl IntoIterator<Item = &'a Job>,
    scope: ExportScope,
) -> Vec<&'a Job> {
    jobs.into_iter()
        .filter(|j| j.status() == JobStatus::Done)
        .filter(|j| scope == ExportScope::All || j.is_selected())
        .collect()
}

/// Export one finished job as a PNG artifact.
pub fn export_one(job: &Job, mode: PaletteMode) -> Result<Artifact, ExportError> {
    let result = job.result().ok_or(ExportError::NotReady(job.id()))?;
    Ok(Artifact {
        file_name: export_file_name(job.source_name(), mode),
        bytes: result.bytes().to_vec(),
    })
}

/// Pack finished jobs into one archive.
///
/// Entry names that collide get `-2`, `-3`, ... before the extension.
pub fn export_many(
    jobs: &[&Job],
    scope: ExportScope,
    mode: PaletteMode,
) -> Result<Artifact, ExportError> {
    if jobs.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut entries = Vec::with_capacity(jobs.len());
    for job in jobs {
        let result = job.result().ok_or(ExportError::NotReady(job.id()))?;
        let name = unique_name(&mut seen, export_file_name(job.source_name(), mode));
        entries.push((name, result.bytes()));
    }

    let bytes = archive::pack(entries)?;
    let file_name = archive_file_name(scope, mode);

    tracing::info!(
        file = %file_name,
        jobs = jobs.len(),
        size = bytes.len(),
        "Exported archive"
    );

    Ok(Artifact { file_name, bytes })
}

/// Export each job as its own artifact, disambiguating names like [`export_many`].
pub fn export_each(jobs: &[&Job], mode: PaletteMode) -> Result<Vec<Artifact>, ExportError> {
    if jobs.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    jobs.iter()
        .map(|job| {
            let mut artifact = export_one(job, mode)?;
            artifact.file_name = unique_name(&mut seen, artifact.file_name);
            Ok(artifact)
        })
        .collect()
}

fn unique_name(seen: &mut HashMap<String, usize>, name: String) -> String {
    let count = seen.entry(name.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        return name;
    }
    let candidate = format!("{}-{}.{}", base_name(&name), count, OUTPUT_EXTENSION);
    // The suffixed name could itself collide with a real export name
    unique_name(seen, candidate)
}
