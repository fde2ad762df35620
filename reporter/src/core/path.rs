//! Helpers for shortening coverage file paths.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Deepest directory containing every path in `paths`.
///
/// Duplicates are ignored. A single file yields its parent directory; an
/// empty input yields an empty path.
pub fn common_parent<P: AsRef<Path>>(paths: &[P]) -> PathBuf {
    let unique: BTreeSet<&Path> = paths.iter().map(AsRef::as_ref).collect();
    let mut dirs = unique
        .iter()
        .map(|path| path.parent().unwrap_or_else(|| Path::new("")));

    let Some(first) = dirs.next() else {
        return PathBuf::new();
    };
    let mut common: Vec<Component<'_>> = first.components().collect();
    for dir in dirs {
        let shared = common
            .iter()
            .zip(dir.components())
            .take_while(|(left, right)| *left == right)
            .count();
        common.truncate(shared);
    }
    common.into_iter().collect()
}

/// `path` relative to `base`, or `path` unchanged when it lies outside `base`.
pub fn relative_to(path: &Path, base: &Path) -> String {
    if base.as_os_str().is_empty() {
        return path.display().to_string();
    }
    match path.strip_prefix(base) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
