//! Path utilities
//!
//! Files of a tree are keyed by their immediate parent directory and file name,
//! so `old/a/x.xml` and `new/a/x.xml` meet under the key `a/x.xml`.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Key of a file found under `root`
///
/// Files directly under the root use their bare name, anything deeper uses
/// `<parent-dir-name>/<file-name>`. Returns `None` for paths outside the root
/// or without a file name.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root).ok()?;
    let file_name = path.file_name()?.to_string_lossy();
    let parent = path.parent()?;

    if parent == root {
        return Some(file_name.into_owned());
    }

    let parent_name = parent.file_name()?.to_string_lossy();
    Some(format!("{}/{}", parent_name, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("a/b/c/d.xml");
        assert_eq!(normalize_path(path), "a/b/c/d.xml");
    }

    #[test]
    fn test_key_directly_under_root() {
        let root = Path::new("/old");
        assert_eq!(
            relative_key(root, Path::new("/old/readme.txt")),
            Some("readme.txt".to_string())
        );
    }

    #[test]
    fn test_key_uses_immediate_parent() {
        let root = Path::new("/old");
        assert_eq!(
            relative_key(root, Path::new("/old/a/b/page.html")),
            Some("b/page.html".to_string())
        );
    }

    #[test]
    fn test_key_outside_root() {
        let root = Path::new("/old");
        assert_eq!(relative_key(root, Path::new("/new/x.txt")), None);
    }

    #[test]
    fn test_key_of_root_itself() {
        let root = Path::new("/old");
        assert_eq!(relative_key(root, root), None);
    }
}
