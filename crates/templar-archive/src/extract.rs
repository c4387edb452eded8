use std::io::{Cursor, Read};

use templar_repo::{Location, Repository};
use tracing::debug;
use zip::ZipArchive;

use crate::charset::EntryEncoding;
use crate::error::{Error, Result};
use crate::sanitize::normalize_entry_name;

/// What an extraction wrote and what it dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub folders: usize,
    pub skipped: usize,
}

/// Stream every entry of `raw` into the store under `target`, in archive
/// order.
///
/// Entry names are decoded under `encoding` (the caller has already probed
/// it) and normalized; entries whose names fail normalization are skipped
/// silently. Directory entries become idempotent folder creations, file
/// entries are read fully and written create-or-overwrite with their parent
/// folders brought into existence first. Any read or write failure aborts
/// the extraction, leaving partial writes for the caller to roll back.
pub fn extract_into<R: Repository>(
    raw: &[u8],
    encoding: EntryEncoding,
    target: &Location,
    repo: &R,
) -> Result<ExtractSummary> {
    let mut archive = ZipArchive::new(Cursor::new(raw))?;
    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = encoding
            .decode(entry.name_raw())
            .ok_or(Error::UndecodableName { index })?;

        let Some(normalized) = normalize_entry_name(&name) else {
            debug!(entry = %name, "dropping unsafe archive entry");
            summary.skipped += 1;
            continue;
        };

        let location = target.join(&normalized);
        if name.ends_with('/') {
            repo.make_folders(&location)?;
            summary.folders += 1;
        } else {
            let mut content = Vec::new();
            entry.read_to_end(&mut content).map_err(|source| Error::EntryRead {
                entry: name.clone(),
                source,
            })?;
            if let Some(parent) = location.parent() {
                repo.make_folders(&parent)?;
            }
            if repo.exists(&location)? {
                repo.set_content(&location, &content)?;
            } else {
                repo.create(&location, &content)?;
            }
            summary.files += 1;
        }
    }

    Ok(summary)
}
