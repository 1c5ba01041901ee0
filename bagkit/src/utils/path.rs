use std::path::{Component, Path, PathBuf};

/// Returns the directory that contains `path`.
///
/// A bare file name such as `manifest-md5.txt` lives in the current
/// directory, so this yields `.` instead of an empty path.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Whether the directory that would contain `path` exists.
pub fn parent_exists(path: &Path) -> bool {
    parent_dir(path).is_dir()
}

/// The final path component as UTF-8, or `None` when there is none.
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Lexically normalizes a path without touching the filesystem.
///
/// Examples:
/// - "a/./b.txt" -> "a/b.txt"
/// - "a/b/../c.txt" -> "a/c.txt"
/// - "../a" -> "../a"
/// - "" -> "."
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // ".." 不能越过根目录
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
