use std::borrow::Cow;
use std::io::Cursor;

use tracing::debug;
use zip::ZipArchive;

/// Encodings a ZIP directory's entry names may be written in.
///
/// Archive producers disagree on whether entry names are flagged as UTF-8,
/// and legacy tooling frequently gets the flag wrong, so the directory is
/// trial-opened with each candidate instead of trusting archive metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryEncoding {
    Utf8,
    /// DOS code page 866, the single-byte encoding legacy producers emit.
    Ibm866,
}

impl EntryEncoding {
    /// Probe order: the Unicode encoding first, the legacy fallback second.
    pub const CANDIDATES: [EntryEncoding; 2] = [EntryEncoding::Utf8, EntryEncoding::Ibm866];

    /// Strictly decode raw entry-name bytes. `None` on any invalid sequence;
    /// names are never decoded lossily.
    pub fn decode(self, raw: &[u8]) -> Option<String> {
        match self {
            EntryEncoding::Utf8 => std::str::from_utf8(raw).ok().map(str::to_owned),
            EntryEncoding::Ibm866 => encoding_rs::IBM866
                .decode_without_bom_handling_and_without_replacement(raw)
                .map(Cow::into_owned),
        }
    }

    /// Encode a string in this encoding, for payloads stored alongside an
    /// archive that was read under it.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            EntryEncoding::Utf8 => text.as_bytes().to_vec(),
            EntryEncoding::Ibm866 => encoding_rs::IBM866.encode(text).0.into_owned(),
        }
    }
}

/// Whether `raw` opens as a ZIP archive with at least one entry and every
/// entry name strictly decodable under `encoding`. Structural and decode
/// failures both answer `false`; this never errors.
pub fn can_open(raw: &[u8], encoding: EntryEncoding) -> bool {
    let mut archive = match ZipArchive::new(Cursor::new(raw)) {
        Ok(archive) => archive,
        Err(_) => return false,
    };
    if archive.len() == 0 {
        return false;
    }
    for index in 0..archive.len() {
        let entry = match archive.by_index_raw(index) {
            Ok(entry) => entry,
            Err(_) => return false,
        };
        if encoding.decode(entry.name_raw()).is_none() {
            return false;
        }
    }
    true
}

/// First candidate encoding able to enumerate the archive, or `None` when
/// the buffer is not readable as a ZIP under any candidate.
pub fn detect_encoding(raw: &[u8]) -> Option<EntryEncoding> {
    let found = EntryEncoding::CANDIDATES
        .into_iter()
        .find(|&encoding| can_open(raw, encoding));
    match found {
        Some(encoding) => debug!(?encoding, "archive entry encoding selected"),
        None => debug!("no candidate encoding can enumerate the archive"),
    }
    found
}
