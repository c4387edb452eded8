use std::io::Read;

use crate::error::Result;
use crate::location::Location;

/// Operations the template service consumes from a hierarchical content
/// store.
///
/// Adapters must answer existence and type queries truthfully at call time.
/// All operations are synchronous; remote adapters block on their transport.
pub trait Repository {
    fn exists(&self, location: &Location) -> Result<bool>;

    fn is_file(&self, location: &Location) -> Result<bool>;

    fn is_folder(&self, location: &Location) -> Result<bool>;

    /// Create a new file, bringing missing ancestor folders into existence.
    /// Fails if an object already exists at `location`.
    fn create(&self, location: &Location, content: &[u8]) -> Result<()>;

    /// Overwrite the content of an existing file.
    fn set_content(&self, location: &Location, content: &[u8]) -> Result<()>;

    /// Create the folder at `location` and any missing ancestors. Idempotent.
    fn make_folders(&self, location: &Location) -> Result<()>;

    /// Delete the object at `location`, recursively for folders.
    fn delete(&self, location: &Location) -> Result<()>;

    /// Open the content of a file for reading.
    fn get_content(&self, location: &Location) -> Result<Box<dyn Read + '_>>;

    /// Every location under `root` in store order, folders before their
    /// contents; direct children only unless `recursive`.
    fn list_descendants(&self, root: &Location, recursive: bool) -> Result<Vec<Location>>;
}
