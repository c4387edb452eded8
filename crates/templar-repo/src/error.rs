use std::io;

use crate::location::Location;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no object at '{0}'")]
    NotFound(Location),

    #[error("an object already exists at '{0}'")]
    AlreadyExists(Location),

    #[error("'{0}' is not a file")]
    NotAFile(Location),

    #[error("'{0}' is not a folder")]
    NotAFolder(Location),

    #[error("a file blocks the folder path at '{0}'")]
    FileInTheWay(Location),

    #[error("repository i/o failed at '{location}': {source}")]
    Io {
        location: Location,
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(location: Location, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(location),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(location),
            _ => Self::Io { location, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
