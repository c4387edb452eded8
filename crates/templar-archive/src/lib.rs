//! ZIP template import and export.
//!
//! # Architecture
//!
//! - `sanitize.rs` - entry-name normalization (zip-slip prevention)
//! - `charset.rs` - entry-name encoding probe
//! - `extract.rs` - archive-to-store extraction
//! - `build.rs` - store-to-archive serialization

pub use build::{build_archive, build_archive_bytes, build_archive_filtered};
pub use charset::{EntryEncoding, can_open, detect_encoding};
pub use error::{Error, Result};
pub use extract::{ExtractSummary, extract_into};
pub use sanitize::normalize_entry_name;

mod build;
mod charset;
mod error;
mod extract;
mod sanitize;
