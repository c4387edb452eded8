//! Template archive orchestration.
//!
//! Imports ZIP-packaged project templates into a hierarchical content store
//! and exports stored subtrees back into ZIP streams. A save runs as a
//! compensated sequence - recreate the target folder, signal the platform
//! registrar, write the optional integrity sidecar, extract - and any
//! failure inside the sequence rolls the folder back, so later callers see
//! either the full new generation or nothing.

pub use error::{Error, Result, StepError};
pub use registrar::{NoopRegistrar, RegistrarError, TemplateRegistrar};
pub use store::{TemplateStore, TemplateStoreOptions};

mod error;
mod registrar;
mod store;
