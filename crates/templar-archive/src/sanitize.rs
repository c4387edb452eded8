/// Normalize an archive entry name into a safe store-relative path.
///
/// Backslashes fold to forward slashes and leading slashes are stripped.
/// Returns `None` for names that are empty after stripping or that contain a
/// literal `..` segment; such entries must be dropped, never written. `.`
/// segments pass through untouched - the store resolves no symlinks, so the
/// `..` check is the whole safety bar.
///
/// This is the only barrier between untrusted entry names and the store's
/// path space; it runs on every entry before any store call.
pub fn normalize_entry_name(raw: &str) -> Option<String> {
    let name = raw.replace('\\', "/");
    let name = name.trim_start_matches('/');
    if name.is_empty() || name.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_fold_to_forward_slashes() {
        assert_eq!(
            normalize_entry_name("\\dir\\file.txt").as_deref(),
            Some("dir/file.txt")
        );
    }

    #[test]
    fn leading_slashes_are_stripped() {
        assert_eq!(normalize_entry_name("///a/b.txt").as_deref(), Some("a/b.txt"));
        assert_eq!(normalize_entry_name("/top.txt").as_deref(), Some("top.txt"));
    }

    #[test]
    fn parent_segments_are_rejected() {
        assert_eq!(normalize_entry_name("a/../../etc/passwd"), None);
        assert_eq!(normalize_entry_name("../evil.txt"), None);
        assert_eq!(normalize_entry_name("a/b/.."), None);
        assert_eq!(normalize_entry_name("..\\evil.txt"), None);
    }

    #[test]
    fn dotdot_inside_a_segment_is_not_traversal() {
        assert_eq!(normalize_entry_name("a..b/c.txt").as_deref(), Some("a..b/c.txt"));
        assert_eq!(normalize_entry_name("notes..txt").as_deref(), Some("notes..txt"));
    }

    #[test]
    fn current_dir_segments_pass_through() {
        assert_eq!(normalize_entry_name("./a.txt").as_deref(), Some("./a.txt"));
    }

    #[test]
    fn empty_results_are_rejected() {
        assert_eq!(normalize_entry_name(""), None);
        assert_eq!(normalize_entry_name("/"), None);
        assert_eq!(normalize_entry_name("\\\\"), None);
    }

    #[test]
    fn directory_markers_keep_their_trailing_slash() {
        assert_eq!(normalize_entry_name("dir/sub/").as_deref(), Some("dir/sub/"));
    }
}
