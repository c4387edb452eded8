use crate::registrar::RegistrarError;

/// Failure of one step inside a save or download sequence.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Repository(#[from] templar_repo::Error),

    #[error(transparent)]
    Archive(#[from] templar_archive::Error),

    #[error("registrar '{name}' failed: {source}")]
    Registrar {
        name: &'static str,
        source: RegistrarError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The template service boundary taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Identifier rejected before any store interaction.
    #[error("invalid identifier: {reason}")]
    InvalidIdentifier { reason: &'static str },

    /// No candidate encoding can enumerate the archive; the store was never
    /// touched.
    #[error("archive for template '{id}' is not readable under any supported entry encoding")]
    UnreadableArchive { id: String },

    /// The requested template or project subtree does not exist.
    #[error("'{id}' does not exist in the store")]
    NotFound { id: String },

    /// A step of the sequence failed; for saves the template folder has been
    /// rolled back.
    #[error("failed to process template '{id}'")]
    Processing {
        id: String,
        #[source]
        source: StepError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
