use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use crate::connection::Repository;
use crate::error::{Error, Result};
use crate::location::Location;

/// Local-filesystem store adapter rooted at a directory.
///
/// The natural stand-in for the platform repository when running outside the
/// platform. Locations map to paths under the root; because a [`Location`]
/// is always a normalized relative path, the mapping cannot escape it.
#[derive(Clone, Debug)]
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &Location) -> PathBuf {
        if location.is_root() {
            self.root.clone()
        } else {
            self.root.join(location.as_str())
        }
    }

    fn walk(&self, folder: &Location, recursive: bool, out: &mut Vec<Location>) -> Result<()> {
        let entries = fs::read_dir(self.resolve(folder))
            .map_err(|source| Error::io(folder.clone(), source))?;
        let mut entries: Vec<_> = entries
            .collect::<io::Result<_>>()
            .map_err(|source| Error::io(folder.clone(), source))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                // Non-UTF-8 names cannot be addressed as locations.
                continue;
            };
            let location = folder.join(name);
            let is_dir = entry
                .file_type()
                .map_err(|source| Error::io(location.clone(), source))?
                .is_dir();
            out.push(location.clone());
            if is_dir && recursive {
                self.walk(&location, recursive, out)?;
            }
        }
        Ok(())
    }
}

impl Repository for FsRepository {
    fn exists(&self, location: &Location) -> Result<bool> {
        Ok(self.resolve(location).exists())
    }

    fn is_file(&self, location: &Location) -> Result<bool> {
        Ok(self.resolve(location).is_file())
    }

    fn is_folder(&self, location: &Location) -> Result<bool> {
        Ok(self.resolve(location).is_dir())
    }

    fn create(&self, location: &Location, content: &[u8]) -> Result<()> {
        let path = self.resolve(location);
        if path.exists() {
            return Err(Error::AlreadyExists(location.clone()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::io(location.clone(), source))?;
        }
        fs::write(&path, content).map_err(|source| Error::io(location.clone(), source))
    }

    fn set_content(&self, location: &Location, content: &[u8]) -> Result<()> {
        let path = self.resolve(location);
        if !path.exists() {
            return Err(Error::NotFound(location.clone()));
        }
        if !path.is_file() {
            return Err(Error::NotAFile(location.clone()));
        }
        fs::write(&path, content).map_err(|source| Error::io(location.clone(), source))
    }

    fn make_folders(&self, location: &Location) -> Result<()> {
        let path = self.resolve(location);
        if path.is_file() {
            return Err(Error::FileInTheWay(location.clone()));
        }
        fs::create_dir_all(&path).map_err(|source| Error::io(location.clone(), source))
    }

    fn delete(&self, location: &Location) -> Result<()> {
        let path = self.resolve(location);
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(_) => return Err(Error::NotFound(location.clone())),
        };
        if metadata.is_dir() {
            fs::remove_dir_all(&path).map_err(|source| Error::io(location.clone(), source))
        } else {
            fs::remove_file(&path).map_err(|source| Error::io(location.clone(), source))
        }
    }

    fn get_content(&self, location: &Location) -> Result<Box<dyn Read + '_>> {
        let path = self.resolve(location);
        if path.is_dir() {
            return Err(Error::NotAFile(location.clone()));
        }
        let file = File::open(&path).map_err(|source| Error::io(location.clone(), source))?;
        Ok(Box::new(file))
    }

    fn list_descendants(&self, root: &Location, recursive: bool) -> Result<Vec<Location>> {
        let path = self.resolve(root);
        if path.is_file() {
            return Err(Error::NotAFolder(root.clone()));
        }
        if !path.is_dir() {
            return Err(Error::NotFound(root.clone()));
        }
        let mut out = Vec::new();
        self.walk(root, recursive, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_then_overwrite_then_read() {
        let dir = tempdir().unwrap();
        let repo = FsRepository::new(dir.path());
        let loc = Location::new("nested/file.txt");

        repo.create(&loc, b"first").unwrap();
        repo.set_content(&loc, b"second").unwrap();

        let mut content = Vec::new();
        repo.get_content(&loc).unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, b"second");
    }

    #[test]
    fn delete_folder_removes_contents() {
        let dir = tempdir().unwrap();
        let repo = FsRepository::new(dir.path());

        repo.create(&Location::new("t/a/one.txt"), b"1").unwrap();
        repo.delete(&Location::new("t")).unwrap();

        assert!(!repo.exists(&Location::new("t")).unwrap());
        assert!(matches!(
            repo.delete(&Location::new("t")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn listing_is_sorted_and_parents_come_first() {
        let dir = tempdir().unwrap();
        let repo = FsRepository::new(dir.path());

        repo.create(&Location::new("r/b/two.txt"), b"2").unwrap();
        repo.create(&Location::new("r/a.txt"), b"1").unwrap();

        let all = repo.list_descendants(&Location::new("r"), true).unwrap();
        assert_eq!(
            all,
            vec![
                Location::new("r/a.txt"),
                Location::new("r/b"),
                Location::new("r/b/two.txt"),
            ]
        );
    }
}
