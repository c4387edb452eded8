use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::connection::Repository;
use crate::error::{Error, Result};
use crate::location::Location;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Folder,
    File(Vec<u8>),
}

/// In-memory store adapter.
///
/// Listing order is the key order of the backing map, which supplies the
/// enumeration determinism callers rely on. Clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    nodes: Arc<Mutex<BTreeMap<String, Node>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, BTreeMap<String, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_folders(nodes: &mut BTreeMap<String, Node>, path: &str) -> Result<()> {
    if path.is_empty() {
        return Ok(());
    }
    let mut prefix = String::with_capacity(path.len());
    for segment in path.split('/') {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        match nodes.get(&prefix) {
            Some(Node::File(_)) => return Err(Error::FileInTheWay(Location::new(&prefix))),
            Some(Node::Folder) => {}
            None => {
                nodes.insert(prefix.clone(), Node::Folder);
            }
        }
    }
    Ok(())
}

impl Repository for MemoryRepository {
    fn exists(&self, location: &Location) -> Result<bool> {
        Ok(location.is_root() || self.tree().contains_key(location.as_str()))
    }

    fn is_file(&self, location: &Location) -> Result<bool> {
        Ok(matches!(
            self.tree().get(location.as_str()),
            Some(Node::File(_))
        ))
    }

    fn is_folder(&self, location: &Location) -> Result<bool> {
        Ok(location.is_root()
            || matches!(self.tree().get(location.as_str()), Some(Node::Folder)))
    }

    fn create(&self, location: &Location, content: &[u8]) -> Result<()> {
        if location.is_root() {
            return Err(Error::AlreadyExists(location.clone()));
        }
        let mut nodes = self.tree();
        if nodes.contains_key(location.as_str()) {
            return Err(Error::AlreadyExists(location.clone()));
        }
        if let Some(parent) = location.parent() {
            ensure_folders(&mut nodes, parent.as_str())?;
        }
        nodes.insert(location.as_str().to_owned(), Node::File(content.to_vec()));
        Ok(())
    }

    fn set_content(&self, location: &Location, content: &[u8]) -> Result<()> {
        match self.tree().get_mut(location.as_str()) {
            Some(Node::File(existing)) => {
                *existing = content.to_vec();
                Ok(())
            }
            Some(Node::Folder) => Err(Error::NotAFile(location.clone())),
            None => Err(Error::NotFound(location.clone())),
        }
    }

    fn make_folders(&self, location: &Location) -> Result<()> {
        ensure_folders(&mut self.tree(), location.as_str())
    }

    fn delete(&self, location: &Location) -> Result<()> {
        let mut nodes = self.tree();
        if location.is_root() {
            nodes.clear();
            return Ok(());
        }
        let existed = nodes.remove(location.as_str()).is_some();
        let prefix = format!("{}/", location.as_str());
        let children: Vec<String> = nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| key.clone())
            .collect();
        if !existed && children.is_empty() {
            return Err(Error::NotFound(location.clone()));
        }
        for key in children {
            nodes.remove(&key);
        }
        Ok(())
    }

    fn get_content(&self, location: &Location) -> Result<Box<dyn Read + '_>> {
        match self.tree().get(location.as_str()) {
            Some(Node::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(Node::Folder) => Err(Error::NotAFile(location.clone())),
            None => Err(Error::NotFound(location.clone())),
        }
    }

    fn list_descendants(&self, root: &Location, recursive: bool) -> Result<Vec<Location>> {
        let nodes = self.tree();
        if !root.is_root() {
            match nodes.get(root.as_str()) {
                Some(Node::Folder) => {}
                Some(Node::File(_)) => return Err(Error::NotAFolder(root.clone())),
                None => return Err(Error::NotFound(root.clone())),
            }
        }
        let prefix = if root.is_root() {
            String::new()
        } else {
            format!("{}/", root.as_str())
        };
        let mut out = Vec::new();
        for key in nodes.keys() {
            let Some(rest) = key.strip_prefix(prefix.as_str()) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if recursive || !rest.contains('/') {
                out.push(Location::new(key));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_duplicates() {
        let repo = MemoryRepository::new();
        let loc = Location::new("a/b.txt");
        repo.create(&loc, b"one").unwrap();
        assert!(matches!(
            repo.create(&loc, b"two"),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn create_brings_ancestors_into_existence() {
        let repo = MemoryRepository::new();
        repo.create(&Location::new("a/b/c.txt"), b"x").unwrap();
        assert!(repo.is_folder(&Location::new("a")).unwrap());
        assert!(repo.is_folder(&Location::new("a/b")).unwrap());
        assert!(repo.is_file(&Location::new("a/b/c.txt")).unwrap());
    }

    #[test]
    fn folders_cannot_shadow_files() {
        let repo = MemoryRepository::new();
        repo.create(&Location::new("a"), b"file").unwrap();
        assert!(matches!(
            repo.make_folders(&Location::new("a/b")),
            Err(Error::FileInTheWay(_))
        ));
    }

    #[test]
    fn delete_removes_whole_subtree() {
        let repo = MemoryRepository::new();
        repo.create(&Location::new("t/x/one.txt"), b"1").unwrap();
        repo.create(&Location::new("t/two.txt"), b"2").unwrap();
        repo.create(&Location::new("tsibling.txt"), b"s").unwrap();

        repo.delete(&Location::new("t")).unwrap();

        assert!(!repo.exists(&Location::new("t")).unwrap());
        assert!(!repo.exists(&Location::new("t/x/one.txt")).unwrap());
        assert!(repo.exists(&Location::new("tsibling.txt")).unwrap());
    }

    #[test]
    fn delete_missing_is_an_error() {
        let repo = MemoryRepository::new();
        assert!(matches!(
            repo.delete(&Location::new("ghost")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn list_descendants_orders_folders_before_contents() {
        let repo = MemoryRepository::new();
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

        let direct = repo.list_descendants(&Location::new("r"), false).unwrap();
        assert_eq!(direct, vec![Location::new("r/a.txt"), Location::new("r/b")]);
    }
}
