use std::fmt;

/// Path-addressed identity inside the hierarchical content store.
///
/// Always a forward-slash separated path relative to the store root, with no
/// leading or trailing slash. The empty path is the root itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(String);

impl Location {
    /// The store root.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Build a location from a slash-separated relative path. Redundant and
    /// boundary slashes are folded away.
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        Self(segments.join("/"))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a relative path.
    pub fn join(&self, rel: impl AsRef<str>) -> Self {
        let rel = Self::new(rel);
        if self.is_root() {
            return rel;
        }
        if rel.is_root() {
            return self.clone();
        }
        Self(format!("{}/{}", self.0, rel.0))
    }

    /// Last path segment, empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Containing folder, `None` for the root.
    pub fn parent(&self) -> Option<Location> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some((head, _)) => Some(Self(head.to_owned())),
            None => Some(Self::root()),
        }
    }

    /// Path of `self` relative to `root`, when `self` is `root` itself or a
    /// descendant of it. The root yields the empty string.
    pub fn relative_to(&self, root: &Location) -> Option<&str> {
        if root.is_root() {
            return Some(&self.0);
        }
        let rest = self.0.strip_prefix(root.as_str())?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix('/')
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_folds_redundant_slashes() {
        assert_eq!(Location::new("a//b/").as_str(), "a/b");
        assert_eq!(Location::new("/a/b").as_str(), "a/b");
        assert!(Location::new("///").is_root());
    }

    #[test]
    fn join_from_root_and_nested() {
        let root = Location::root();
        let a = root.join("a");
        assert_eq!(a.as_str(), "a");
        assert_eq!(a.join("b/c").as_str(), "a/b/c");
        assert_eq!(a.join("").as_str(), "a");
    }

    #[test]
    fn name_and_parent() {
        let loc = Location::new("a/b/c.txt");
        assert_eq!(loc.name(), "c.txt");
        assert_eq!(loc.parent(), Some(Location::new("a/b")));
        assert_eq!(Location::new("a").parent(), Some(Location::root()));
        assert_eq!(Location::root().parent(), None);
    }

    #[test]
    fn relative_to_descendants_only() {
        let root = Location::new("templates/t1");
        assert_eq!(Location::new("templates/t1/x/y").relative_to(&root), Some("x/y"));
        assert_eq!(Location::new("templates/t1").relative_to(&root), Some(""));
        assert_eq!(Location::new("templates/t2/x").relative_to(&root), None);
        // A sibling sharing the prefix string is not a descendant.
        assert_eq!(Location::new("templates/t10").relative_to(&root), None);
    }

    #[test]
    fn display_prepends_slash() {
        assert_eq!(Location::new("a/b").to_string(), "/a/b");
        assert_eq!(Location::root().to_string(), "/");
    }
}
