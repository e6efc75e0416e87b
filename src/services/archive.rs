//! ZIP ingestion and egress.
//!
//! Ingestion is all-or-nothing: every entry is validated and read before
//! anything is returned, so a rejected archive never yields partial output.

use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::ArchiveError;
use crate::models::extension_of;

/// Image extensions accepted as input, lowercase, without the dot
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Ceiling on the read buffer reserved up front for one entry
const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

/// Declared sizes come from the archive itself; only a bounded hint is trusted
fn prealloc_hint(declared: u64, compressed: u64) -> usize {
    declared
        .min(compressed.saturating_mul(4))
        .min(MAX_PREALLOC) as usize
}

/// Whether a lowercased extension is an accepted image type
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}

/// Whether a file name looks like a ZIP archive
pub fn is_archive_name(name: &str) -> bool {
    extension_of(name) == "zip"
}

/// One named blob inside an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full path inside the archive
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Final path component of the entry name
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Read every file entry of a homogeneous image archive.
///
/// Directory entries are skipped. The first file entry fixes the extension;
/// it must be a supported image type and every later entry must match it
/// (case-insensitive).
pub fn unpack(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    if bytes.is_empty() {
        return Err(ArchiveError::Empty);
    }

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ArchiveError::Read(e.to_string()))?;

    let mut entries = Vec::new();
    let mut expected: Option<String> = None;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ArchiveError::Read(e.to_string()))?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let extension = extension_of(&name);

        match &expected {
            None => {
                if !is_supported_extension(&extension) {
                    return Err(ArchiveError::UnsupportedExtension { name, extension });
                }
                expected = Some(extension);
            }
            Some(first) if *first != extension => {
                return Err(ArchiveError::MixedExtension {
                    name,
                    expected: first.clone(),
                    found: extension,
                });
            }
            Some(_) => {}
        }

        let mut buf = Vec::with_capacity(prealloc_hint(file.size(), file.compressed_size()));
        file.read_to_end(&mut buf)
            .map_err(|e| ArchiveError::Read(format!("{name}: {e}")))?;
        entries.push(ArchiveEntry::new(name, buf));
    }

    if entries.is_empty() {
        return Err(ArchiveError::Empty);
    }

    tracing::debug!(
        entries = entries.len(),
        extension = expected.as_deref().unwrap_or_default(),
        "Unpacked archive"
    );

    Ok(entries)
}

/// Build a ZIP containing each `(name, bytes)` pair at its given name.
pub fn pack<I, N, B>(entries: I) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator<Item = (N, B)>,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0usize;
    for (name, bytes) in entries {
        writer
            .start_file(name.as_ref(), options)
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        writer
            .write_all(bytes.as_ref())
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        count += 1;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ArchiveError::Write(e.to_string()))?;
    let bytes = cursor.into_inner();

    tracing::debug!(entries = count, size = bytes.len(), "Packed archive");
    Ok(bytes)
}
