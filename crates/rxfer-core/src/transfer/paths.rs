//! Path resolution against the configured roots.
//!
//! All work here is lexical; nothing touches the filesystem, so the same
//! helpers serve remote paths (which only exist on the server) and local ones.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Lexically normalise a path: drop `.` segments and repeated separators,
/// fold `name/..`, keep leading `..` on relative paths, and render an empty
/// result as `.`.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for comp in path.as_ref().components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Join `rel` onto `root` and normalise. An empty `rel` yields `root` itself.
pub fn resolve(root: &Path, rel: impl AsRef<Path>) -> PathBuf {
    let rel = rel.as_ref();
    if rel.as_os_str().is_empty() {
        return normalize_path(root);
    }
    normalize_path(root.join(rel))
}

/// Render a path with forward slashes regardless of the local convention.
pub fn to_posix(path: &Path) -> String {
    let s = path.to_string_lossy();
    if MAIN_SEPARATOR == '\\' {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Final component as a string, if the path has one (`.`, `..` and `/` do not).
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Parent directory; a bare name has `.` as its parent and a root is its own parent.
pub fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => path.to_path_buf(),
    }
}
