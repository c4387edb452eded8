use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is not readable: {0}")]
    Codec(#[from] zip::result::ZipError),

    #[error("entry #{index} name does not decode under the selected encoding")]
    UndecodableName { index: usize },

    #[error("failed to read archive entry '{entry}': {source}")]
    EntryRead { entry: String, source: io::Error },

    #[error("failed to write archive entry '{entry}': {source}")]
    EntryWrite { entry: String, source: io::Error },

    #[error(transparent)]
    Repository(#[from] templar_repo::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
