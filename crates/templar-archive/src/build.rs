use std::io::{self, Cursor, Seek, Write};

use templar_repo::{Location, Repository};
use tracing::debug;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{Error, Result};

/// Serialize the store subtree under `source_root` into a ZIP stream.
///
/// Folders become explicit `name/` entries with no content, files are
/// DEFLATE-compressed and streamed from the store, all in the store's
/// listing order. A location that is neither file nor folder by the time it
/// is classified (a stale listing entry) is skipped. On error the partially
/// written stream is the caller's to discard.
pub fn build_archive<R: Repository, W: Write + Seek>(
    repo: &R,
    source_root: &Location,
    writer: W,
) -> Result<W> {
    build_archive_filtered(repo, source_root, writer, |_| true)
}

/// [`build_archive`] restricted to root-relative paths `keep` accepts.
/// Sidecar metadata stored inside a subtree is excluded this way.
pub fn build_archive_filtered<R: Repository, W: Write + Seek>(
    repo: &R,
    source_root: &Location,
    writer: W,
    keep: impl Fn(&str) -> bool,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for location in repo.list_descendants(source_root, true)? {
        let Some(relative) = location.relative_to(source_root).map(str::to_owned) else {
            continue;
        };
        if relative.is_empty() || !keep(&relative) {
            continue;
        }

        if repo.is_folder(&location)? {
            zip.add_directory(format!("{relative}/"), options)?;
        } else if repo.is_file(&location)? {
            zip.start_file(relative.as_str(), options)?;
            let mut content = repo.get_content(&location)?;
            io::copy(&mut content, &mut zip).map_err(|source| Error::EntryWrite {
                entry: relative,
                source,
            })?;
        } else {
            debug!(%location, "skipping unclassifiable store entry");
        }
    }

    Ok(zip.finish()?)
}

/// [`build_archive`] into a fresh in-memory buffer.
pub fn build_archive_bytes<R: Repository>(repo: &R, source_root: &Location) -> Result<Vec<u8>> {
    let cursor = build_archive(repo, source_root, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}
